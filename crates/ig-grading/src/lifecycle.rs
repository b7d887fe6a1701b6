//! Lifecycle state machine
//!
//! The single transition table every mutation handler consults. The UI may
//! mirror these rules to disable buttons, but nothing downstream trusts it:
//! each guard is re-derived here on every call.

use chrono::{DateTime, Utc};
use tracing::debug;

use ig_contracts::{Contract, SubmitContract};
use ig_core::error::{DomainError, DomainResult};
use ig_models::grade::{GradeStatus, InternshipGrade};
use ig_models::milestone::MilestoneStatus;

/// Explicit transition table. Everything not listed is disallowed.
pub fn can_transition(from: GradeStatus, to: GradeStatus) -> bool {
    use GradeStatus::*;
    matches!(
        (from, to),
        (NotStarted, InProgress)
            | (InProgress, DraftCompleted)
            | (InProgress | DraftCompleted | Rejected, Submitted)
            | (Submitted, Approved)
            | (Submitted, Rejected)
    )
}

/// Reject supervisor-side mutation once the record left the editable states.
pub fn ensure_editable(grade: &InternshipGrade) -> DomainResult<()> {
    if grade.status.is_editable() {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "record is read-only while {}",
            grade.status
        )))
    }
}

/// First milestone activity signals that work has begun: any milestone
/// leaving `pending` promotes a not-started record to in-progress.
pub fn note_milestone_activity(grade: &mut InternshipGrade, new_status: MilestoneStatus) {
    if grade.status == GradeStatus::NotStarted && new_status != MilestoneStatus::Pending {
        debug!(grade_id = %grade.id, "promoting not_started record to in_progress");
        grade.status = GradeStatus::InProgress;
    }
}

/// Saving a fully-scored sheet promotes in-progress to draft-completed.
/// Informational only; the record stays editable.
pub fn note_sheet_saved(grade: &mut InternshipGrade) {
    if grade.status == GradeStatus::InProgress && grade.all_components_scored() {
        debug!(grade_id = %grade.id, "all components scored, marking draft_completed");
        grade.status = GradeStatus::DraftCompleted;
    }
}

/// Submit-to-BCN transition.
///
/// Wrong starting state is a `Conflict`; a failing guard (zero score, blank
/// final comment) is `ValidationFailed`. On success stamps `submittedAt` and
/// flips `submittedToBCN`.
pub fn submit(grade: &mut InternshipGrade, now: DateTime<Utc>) -> DomainResult<()> {
    if !grade.status.can_submit() {
        return Err(DomainError::conflict(format!(
            "cannot submit a record while {}",
            grade.status
        )));
    }

    SubmitContract.validate(grade)?;

    debug!(grade_id = %grade.id, from = %grade.status, "submitting grade to BCN");
    grade.status = GradeStatus::Submitted;
    grade.submitted_at = Some(now);
    grade.submitted_to_bcn = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{grade, now, scored_component};
    use ig_models::component::ComponentType;

    fn submittable() -> InternshipGrade {
        let mut g = grade();
        g.status = GradeStatus::InProgress;
        g.grade_components = vec![
            scored_component(ComponentType::SupervisorScore, 8.0, 0.6),
            scored_component(ComponentType::CompanyScore, 7.0, 0.4),
        ];
        g.supervisor_final_comment = Some("Completed all objectives".into());
        g
    }

    #[test]
    fn test_transition_table() {
        use GradeStatus::*;
        assert!(can_transition(NotStarted, InProgress));
        assert!(can_transition(InProgress, DraftCompleted));
        assert!(can_transition(InProgress, Submitted));
        assert!(can_transition(DraftCompleted, Submitted));
        assert!(can_transition(Rejected, Submitted));
        assert!(can_transition(Submitted, Approved));
        assert!(can_transition(Submitted, Rejected));

        assert!(!can_transition(NotStarted, Submitted));
        assert!(!can_transition(Approved, Submitted));
        assert!(!can_transition(Submitted, InProgress));
        assert!(!can_transition(Approved, Rejected));
    }

    #[test]
    fn test_milestone_activity_promotes_once() {
        let mut g = grade();
        note_milestone_activity(&mut g, MilestoneStatus::InProgress);
        assert_eq!(g.status, GradeStatus::InProgress);

        // further activity leaves later states alone
        g.status = GradeStatus::DraftCompleted;
        note_milestone_activity(&mut g, MilestoneStatus::Completed);
        assert_eq!(g.status, GradeStatus::DraftCompleted);
    }

    #[test]
    fn test_pending_does_not_promote() {
        let mut g = grade();
        note_milestone_activity(&mut g, MilestoneStatus::Pending);
        assert_eq!(g.status, GradeStatus::NotStarted);
    }

    #[test]
    fn test_sheet_save_promotion_needs_full_scores() {
        let mut g = grade();
        g.status = GradeStatus::InProgress;
        g.grade_components = vec![
            scored_component(ComponentType::SupervisorScore, 8.0, 0.6),
            scored_component(ComponentType::CompanyScore, 0.0, 0.4),
        ];
        note_sheet_saved(&mut g);
        assert_eq!(g.status, GradeStatus::InProgress);

        g.grade_components[1].score = 7.0;
        note_sheet_saved(&mut g);
        assert_eq!(g.status, GradeStatus::DraftCompleted);
    }

    #[test]
    fn test_submit_happy_path() {
        let mut g = submittable();
        submit(&mut g, now()).unwrap();
        assert_eq!(g.status, GradeStatus::Submitted);
        assert_eq!(g.submitted_at, Some(now()));
        assert!(g.submitted_to_bcn);
    }

    #[test]
    fn test_submit_with_zero_score_is_validation_failure() {
        let mut g = submittable();
        g.grade_components[0].score = 0.0;
        match submit(&mut g, now()) {
            Err(DomainError::ValidationFailed(_)) => {}
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
        assert_eq!(g.status, GradeStatus::InProgress);
        assert!(g.submitted_at.is_none());
    }

    #[test]
    fn test_submit_with_blank_comment_is_validation_failure() {
        let mut g = submittable();
        g.supervisor_final_comment = None;
        assert!(matches!(
            submit(&mut g, now()),
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_submit_from_wrong_state_is_conflict() {
        let mut g = submittable();
        g.status = GradeStatus::NotStarted;
        assert!(matches!(
            submit(&mut g, now()),
            Err(DomainError::Conflict { .. })
        ));

        g.status = GradeStatus::Submitted;
        assert!(matches!(
            submit(&mut g, now()),
            Err(DomainError::Conflict { .. })
        ));
    }

    #[test]
    fn test_resubmit_after_rejection() {
        let mut g = submittable();
        g.status = GradeStatus::Rejected;
        g.rejected_at = Some(now());

        submit(&mut g, now()).unwrap();
        assert_eq!(g.status, GradeStatus::Submitted);
        // the rejection timestamp is never retroactively cleared
        assert!(g.rejected_at.is_some());
    }

    #[test]
    fn test_ensure_editable() {
        let mut g = grade();
        for status in [
            GradeStatus::NotStarted,
            GradeStatus::InProgress,
            GradeStatus::DraftCompleted,
            GradeStatus::Rejected,
        ] {
            g.status = status;
            assert!(ensure_editable(&g).is_ok());
        }
        for status in [GradeStatus::Submitted, GradeStatus::Approved] {
            g.status = status;
            assert!(matches!(
                ensure_editable(&g),
                Err(DomainError::Forbidden { .. })
            ));
        }
    }
}
