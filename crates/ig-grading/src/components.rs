//! Grade component ledger
//!
//! Sheet updates (component scores, final comment, notes, attachments) and
//! the work-type/company info endpoint. Frozen once the record is submitted.

use chrono::{DateTime, Utc};

use ig_contracts::{Contract, GradeSheetContract};
use ig_core::config::GradingConfig;
use ig_core::error::{DomainError, DomainResult};
use ig_models::component::{ComponentType, GradeComponent};
use ig_models::grade::{GradingFile, InternshipGrade, WorkType};
use ig_models::requests::{GradeSheetUpdate, WorkInfoUpdate};
use uuid::Uuid;

use crate::{lifecycle, recompute_derived};

fn default_weight(config: &GradingConfig, kind: ComponentType) -> f64 {
    match kind {
        ComponentType::SupervisorScore => config.supervisor_weight,
        ComponentType::CompanyScore => config.company_weight,
    }
}

/// Apply a grade-sheet update: upsert components by type, overwrite the
/// provided free-text fields, and replace the attachment list. Derived
/// fields are recomputed from the post-update state.
pub fn update_sheet(
    grade: &mut InternshipGrade,
    update: GradeSheetUpdate,
    config: &GradingConfig,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    lifecycle::ensure_editable(grade)?;
    GradeSheetContract.validate(&update)?;

    if let Some(patches) = update.grade_components {
        for patch in patches {
            match grade.component_mut(patch.kind) {
                Some(component) => {
                    component.score = patch.score;
                    if let Some(weight) = patch.weight {
                        component.weight = weight;
                    }
                    if patch.comment.is_some() {
                        component.comment = patch.comment;
                    }
                    component.graded_at = Some(now);
                }
                None => {
                    let weight = patch
                        .weight
                        .unwrap_or_else(|| default_weight(config, patch.kind));
                    let mut component = GradeComponent::new(patch.kind, weight);
                    component.score = patch.score;
                    component.comment = patch.comment;
                    component.graded_at = Some(now);
                    grade.grade_components.push(component);
                }
            }
        }
    }

    if let Some(comment) = update.supervisor_final_comment {
        grade.supervisor_final_comment = Some(comment);
    }
    if let Some(notes) = update.grading_notes {
        grade.grading_notes = Some(notes);
    }
    if let Some(files) = update.grading_files {
        let previous = std::mem::take(&mut grade.grading_files);
        grade.grading_files = files
            .into_iter()
            .map(|file| {
                // keep the original upload stamp for entries that survived
                let existing = file
                    .id
                    .as_deref()
                    .and_then(|id| previous.iter().find(|p| p.id == id));
                match existing {
                    Some(kept) => GradingFile {
                        id: kept.id.clone(),
                        file_name: file.file_name,
                        file_url: file.file_url,
                        uploaded_at: kept.uploaded_at,
                    },
                    None => GradingFile {
                        id: Uuid::new_v4().to_string(),
                        file_name: file.file_name,
                        file_url: file.file_url,
                        uploaded_at: now,
                    },
                }
            })
            .collect();
    }

    lifecycle::note_sheet_saved(grade);
    recompute_derived(grade);
    Ok(())
}

/// Change the work type and its dependent fields.
///
/// Company details belong to `thuc_tap`, the project topic to `do_an`; the
/// irrelevant field is cleared on switch and rejected when supplied.
pub fn update_work_info(grade: &mut InternshipGrade, input: WorkInfoUpdate) -> DomainResult<()> {
    lifecycle::ensure_editable(grade)?;

    match input.work_type {
        WorkType::ThucTap => {
            if input.project_topic.is_some() {
                return Err(DomainError::invalid(
                    "projectTopic",
                    "is only relevant for do_an records",
                ));
            }
            grade.work_type = WorkType::ThucTap;
            if input.company.is_some() {
                grade.company = input.company;
            }
            grade.project_topic = None;
        }
        WorkType::DoAn => {
            if input.company.is_some() {
                return Err(DomainError::invalid(
                    "company",
                    "is only relevant for thuc_tap records",
                ));
            }
            grade.work_type = WorkType::DoAn;
            if input.project_topic.is_some() {
                grade.project_topic = input.project_topic;
            }
            grade.company = None;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grade, now, scored_component};
    use ig_models::grade::GradeStatus;
    use ig_models::requests::{ComponentPatch, GradingFileRef};

    fn config() -> GradingConfig {
        GradingConfig {
            supervisor_weight: 0.6,
            company_weight: 0.4,
            default_page_size: 20,
        }
    }

    fn patch(kind: ComponentType, score: f64) -> ComponentPatch {
        ComponentPatch {
            kind,
            score,
            weight: None,
            comment: None,
        }
    }

    #[test]
    fn test_upsert_creates_with_default_weights() {
        let mut g = grade();
        g.status = GradeStatus::InProgress;

        update_sheet(
            &mut g,
            GradeSheetUpdate {
                grade_components: Some(vec![
                    patch(ComponentType::SupervisorScore, 8.0),
                    patch(ComponentType::CompanyScore, 6.0),
                ]),
                ..Default::default()
            },
            &config(),
            now(),
        )
        .unwrap();

        assert_eq!(g.grade_components.len(), 2);
        assert!((g.final_grade.unwrap() - 7.2).abs() < 1e-9);
        assert!(g.grade_components.iter().all(|c| c.graded_at.is_some()));
    }

    #[test]
    fn test_upsert_updates_existing_component() {
        let mut g = grade();
        g.status = GradeStatus::InProgress;
        g.grade_components = vec![scored_component(ComponentType::SupervisorScore, 5.0, 0.6)];

        update_sheet(
            &mut g,
            GradeSheetUpdate {
                grade_components: Some(vec![patch(ComponentType::SupervisorScore, 9.0)]),
                ..Default::default()
            },
            &config(),
            now(),
        )
        .unwrap();

        assert_eq!(g.grade_components.len(), 1);
        assert!((g.grade_components[0].score - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_scores_promote_draft_completed() {
        let mut g = grade();
        g.status = GradeStatus::InProgress;

        update_sheet(
            &mut g,
            GradeSheetUpdate {
                grade_components: Some(vec![
                    patch(ComponentType::SupervisorScore, 8.0),
                    patch(ComponentType::CompanyScore, 7.5),
                ]),
                ..Default::default()
            },
            &config(),
            now(),
        )
        .unwrap();

        assert_eq!(g.status, GradeStatus::DraftCompleted);
    }

    #[test]
    fn test_partial_scores_do_not_promote() {
        let mut g = grade();
        g.status = GradeStatus::InProgress;
        // company component exists but has not been graded yet
        g.grade_components = vec![GradeComponent::new(ComponentType::CompanyScore, 0.4)];

        update_sheet(
            &mut g,
            GradeSheetUpdate {
                grade_components: Some(vec![patch(ComponentType::SupervisorScore, 8.0)]),
                ..Default::default()
            },
            &config(),
            now(),
        )
        .unwrap();

        assert_eq!(g.status, GradeStatus::InProgress);
        assert!(g.final_grade.is_none());
    }

    #[test]
    fn test_sheet_frozen_after_submission() {
        let mut g = grade();
        g.status = GradeStatus::Submitted;
        g.grade_components = vec![scored_component(ComponentType::SupervisorScore, 8.0, 0.6)];
        let before = g.grade_components.clone();

        let err = update_sheet(
            &mut g,
            GradeSheetUpdate {
                grade_components: Some(vec![patch(ComponentType::SupervisorScore, 1.0)]),
                supervisor_final_comment: Some("sneaky edit".into()),
                ..Default::default()
            },
            &config(),
            now(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden { .. }));
        // nothing was applied
        assert!((g.grade_components[0].score - before[0].score).abs() < f64::EPSILON);
        assert!(g.supervisor_final_comment.is_none());
    }

    #[test]
    fn test_sheet_editable_again_after_rejection() {
        let mut g = grade();
        g.status = GradeStatus::Rejected;

        update_sheet(
            &mut g,
            GradeSheetUpdate {
                grade_components: Some(vec![patch(ComponentType::SupervisorScore, 7.0)]),
                ..Default::default()
            },
            &config(),
            now(),
        )
        .unwrap();
        assert!((g.grade_components[0].score - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grading_files_replace_keeps_known_stamps() {
        let mut g = grade();
        g.status = GradeStatus::InProgress;
        let old_stamp = now() - chrono::Duration::days(3);
        g.grading_files = vec![GradingFile {
            id: "gf-1".into(),
            file_name: "rubric.pdf".into(),
            file_url: "https://files.example/rubric.pdf".into(),
            uploaded_at: old_stamp,
        }];

        update_sheet(
            &mut g,
            GradeSheetUpdate {
                grading_files: Some(vec![
                    GradingFileRef {
                        id: Some("gf-1".into()),
                        file_name: "rubric-v2.pdf".into(),
                        file_url: "https://files.example/rubric-v2.pdf".into(),
                    },
                    GradingFileRef {
                        id: None,
                        file_name: "evidence.zip".into(),
                        file_url: "https://files.example/evidence.zip".into(),
                    },
                ]),
                ..Default::default()
            },
            &config(),
            now(),
        )
        .unwrap();

        assert_eq!(g.grading_files.len(), 2);
        assert_eq!(g.grading_files[0].uploaded_at, old_stamp);
        assert_eq!(g.grading_files[1].uploaded_at, now());
    }

    #[test]
    fn test_work_info_switch_clears_other_side() {
        let mut g = grade();
        g.company = Some(Default::default());

        update_work_info(
            &mut g,
            WorkInfoUpdate {
                work_type: WorkType::DoAn,
                company: None,
                project_topic: Some("Realtime chat platform".into()),
            },
        )
        .unwrap();

        assert_eq!(g.work_type, WorkType::DoAn);
        assert!(g.company.is_none());
        assert_eq!(g.project_topic.as_deref(), Some("Realtime chat platform"));
    }

    #[test]
    fn test_work_info_rejects_mismatched_fields() {
        let mut g = grade();
        let err = update_work_info(
            &mut g,
            WorkInfoUpdate {
                work_type: WorkType::DoAn,
                company: Some(Default::default()),
                project_topic: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[test]
    fn test_work_info_blocked_after_submission() {
        let mut g = grade();
        g.status = GradeStatus::Approved;
        assert!(matches!(
            update_work_info(
                &mut g,
                WorkInfoUpdate {
                    work_type: WorkType::ThucTap,
                    company: None,
                    project_topic: None,
                },
            ),
            Err(DomainError::Forbidden { .. })
        ));
    }
}
