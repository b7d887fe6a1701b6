//! Review/approval gate
//!
//! The department-head (BCN) decision on a submitted record. Only `submitted`
//! accepts actions; anything else is a conflict, not a silent no-op.

use chrono::{DateTime, Utc};
use tracing::debug;

use ig_contracts::{Contract, ReviewContract};
use ig_core::error::{DomainError, DomainResult};
use ig_models::grade::{GradeStatus, InternshipGrade};
use ig_models::requests::{ReviewAction, ReviewRequest};

/// Approve or reject a submitted grade record.
pub fn review(
    grade: &mut InternshipGrade,
    request: &ReviewRequest,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if grade.status != GradeStatus::Submitted {
        return Err(DomainError::conflict(format!(
            "cannot review a record while {}",
            grade.status
        )));
    }

    ReviewContract.validate(request)?;

    match request.action {
        ReviewAction::Approve => {
            debug!(grade_id = %grade.id, "grade approved");
            grade.status = GradeStatus::Approved;
            grade.approved_at = Some(now);
            if request.bcn_comment.is_some() {
                grade.bcn_comment = request.bcn_comment.clone();
            }
        }
        ReviewAction::Reject => {
            debug!(grade_id = %grade.id, "grade rejected");
            grade.status = GradeStatus::Rejected;
            grade.rejected_at = Some(now);
            grade.bcn_comment = request.bcn_comment.clone();
        }
    }
    Ok(())
}
