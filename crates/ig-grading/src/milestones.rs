//! Milestone registry
//!
//! Operations on the ordered milestone list of one grade record. All of them
//! refuse to run once the record is submitted or approved.

use chrono::{DateTime, Utc};
use tracing::debug;

use ig_contracts::{Contract, CreateMilestoneContract, MilestoneDetailsContract};
use ig_core::error::{DomainError, DomainResult, ValidationErrors};
use ig_core::traits::Role;
use ig_models::grade::InternshipGrade;
use ig_models::milestone::{FileSubmission, Milestone, MilestoneStatus, MilestoneType, UploaderRole};
use ig_models::requests::{MilestoneDetailsPatch, NewFileSubmission, NewMilestone};

use crate::{lifecycle, recompute_derived};

/// Append a custom milestone.
///
/// Gated on the start milestone being completed; input problems are
/// validation failures, the gate is a precondition failure.
pub fn add_custom(grade: &mut InternshipGrade, input: NewMilestone) -> DomainResult<String> {
    lifecycle::ensure_editable(grade)?;
    CreateMilestoneContract.validate(&input)?;

    if !grade.start_milestone_completed() {
        return Err(DomainError::precondition(
            "complete the start milestone before adding custom milestones",
        ));
    }

    let due_date = input
        .due_date
        .ok_or_else(|| DomainError::Internal("validated milestone lost its due date".into()))?;
    let milestone = Milestone::custom(input.title.trim(), due_date, input.description);
    let id = milestone.id.clone();
    debug!(grade_id = %grade.id, milestone_id = %id, "adding custom milestone");
    grade.milestones.push(milestone);

    recompute_derived(grade);
    Ok(id)
}

/// Overwrite provided detail fields; never touches status.
pub fn edit_details(
    grade: &mut InternshipGrade,
    milestone_id: &str,
    patch: MilestoneDetailsPatch,
) -> DomainResult<()> {
    lifecycle::ensure_editable(grade)?;
    MilestoneDetailsContract.validate(&patch)?;

    let milestone = grade
        .milestone_mut(milestone_id)
        .ok_or_else(|| DomainError::not_found("Milestone", milestone_id))?;

    if let Some(title) = patch.title {
        milestone.title = title.trim().to_string();
    }
    if let Some(description) = patch.description {
        milestone.description = Some(description);
    }
    if let Some(due_date) = patch.due_date {
        milestone.due_date = Some(due_date);
    }
    Ok(())
}

/// Remove a custom milestone. The start milestone is never deletable,
/// whatever its status.
pub fn delete(grade: &mut InternshipGrade, milestone_id: &str) -> DomainResult<()> {
    lifecycle::ensure_editable(grade)?;

    let milestone = grade
        .milestone(milestone_id)
        .ok_or_else(|| DomainError::not_found("Milestone", milestone_id))?;
    if milestone.kind == MilestoneType::Start {
        return Err(DomainError::forbidden("the start milestone can't be deleted"));
    }

    grade.milestones.retain(|m| m.id != milestone_id);
    recompute_derived(grade);
    Ok(())
}

/// Set a milestone's status, stamping `completedAt` on the first completion
/// and promoting the owning record out of `not_started` on any pending-exit.
pub fn update_status(
    grade: &mut InternshipGrade,
    milestone_id: &str,
    status: MilestoneStatus,
    supervisor_notes: Option<String>,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    lifecycle::ensure_editable(grade)?;

    {
        let milestone = grade
            .milestone_mut(milestone_id)
            .ok_or_else(|| DomainError::not_found("Milestone", milestone_id))?;

        milestone.status = status;
        if status == MilestoneStatus::Completed && milestone.completed_at.is_none() {
            milestone.completed_at = Some(now);
        }
        if let Some(notes) = supervisor_notes {
            milestone.supervisor_notes = Some(notes);
        }
    }

    lifecycle::note_milestone_activity(grade, status);
    recompute_derived(grade);
    Ok(())
}

/// Append a file submission with a fresh id.
pub fn attach_file(
    grade: &mut InternshipGrade,
    milestone_id: &str,
    input: NewFileSubmission,
    uploaded_by: UploaderRole,
    now: DateTime<Utc>,
) -> DomainResult<String> {
    lifecycle::ensure_editable(grade)?;

    let mut errors = ValidationErrors::new();
    if input.file_name.trim().is_empty() {
        errors.add("fileName", "can't be blank");
    }
    if input.file_url.trim().is_empty() {
        errors.add("fileUrl", "can't be blank");
    }
    errors.into_result()?;

    let milestone = grade
        .milestone_mut(milestone_id)
        .ok_or_else(|| DomainError::not_found("Milestone", milestone_id))?;

    let file = FileSubmission::new(input.file_name, input.file_url, uploaded_by, now);
    let id = file.id.clone();
    milestone.file_submissions.push(file);
    Ok(id)
}

/// Remove a file submission. Students may only delete their own uploads.
pub fn remove_file(
    grade: &mut InternshipGrade,
    milestone_id: &str,
    file_id: &str,
    requester: Role,
) -> DomainResult<()> {
    lifecycle::ensure_editable(grade)?;

    let milestone = grade
        .milestone_mut(milestone_id)
        .ok_or_else(|| DomainError::not_found("Milestone", milestone_id))?;
    let file = milestone
        .file(file_id)
        .ok_or_else(|| DomainError::not_found("FileSubmission", file_id))?;

    if requester == Role::Student && file.uploaded_by != UploaderRole::Student {
        return Err(DomainError::forbidden(
            "students may only delete files they uploaded",
        ));
    }

    milestone.file_submissions.retain(|f| f.id != file_id);
    Ok(())
}
