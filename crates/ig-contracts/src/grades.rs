//! Contracts for grade-sheet mutations and the submit transition

use ig_core::error::ValidationErrors;
use ig_models::grade::InternshipGrade;
use ig_models::requests::GradeSheetUpdate;

use crate::base::{Contract, ValidationResult};

/// Contract for `PUT .../grades` payloads.
///
/// Scores and weights are range-checked; weight *sums* are deliberately not
/// hard-blocked. A malformed sum yields a meaningless final grade, which is
/// the caller's problem to surface.
pub struct GradeSheetContract;

impl Contract<GradeSheetUpdate> for GradeSheetContract {
    fn validate(&self, input: &GradeSheetUpdate) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if let Some(components) = &input.grade_components {
            for patch in components {
                if !(0.0..=10.0).contains(&patch.score) {
                    errors.add("score", format!("must be within 0..=10, got {}", patch.score));
                }
                if let Some(weight) = patch.weight {
                    if !(0.0..=1.0).contains(&weight) {
                        errors.add("weight", format!("must be within 0..=1, got {}", weight));
                    }
                }
            }

            // Duplicate component types would make the ledger ambiguous
            let mut seen = Vec::new();
            for patch in components {
                if seen.contains(&patch.kind) {
                    errors.add("gradeComponents", "contains duplicate component types");
                    break;
                }
                seen.push(patch.kind);
            }
        }

        if let Some(files) = &input.grading_files {
            for file in files {
                if file.file_name.trim().is_empty() {
                    errors.add("gradingFiles", "file name can't be blank");
                }
                if file.file_url.trim().is_empty() {
                    errors.add("gradingFiles", "file url can't be blank");
                }
            }
        }

        errors.into_result()
    }
}

/// Contract guarding the submit-to-BCN transition.
///
/// Validated against the aggregate as it would be persisted, never against
/// what the client claims.
pub struct SubmitContract;

impl Contract<InternshipGrade> for SubmitContract {
    fn validate(&self, grade: &InternshipGrade) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if grade.grade_components.is_empty() {
            errors.add("gradeComponents", "must be present before submitting");
        }
        for component in &grade.grade_components {
            if component.score <= 0.0 {
                errors.add(
                    "gradeComponents",
                    format!("{:?} has no score yet", component.kind),
                );
            }
        }

        let comment_blank = grade
            .supervisor_final_comment
            .as_deref()
            .map(|c| c.trim().is_empty())
            .unwrap_or(true);
        if comment_blank {
            errors.add("supervisorFinalComment", "can't be blank");
        }

        errors.into_result()
    }
}
