//! API handlers

pub mod grades;
pub mod milestones;
pub mod review;

use ig_core::traits::Role;
use ig_db::GradeRepository;
use ig_models::grade::InternshipGrade;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;

/// Load the aggregate addressed by a student id, or 404.
pub(crate) async fn load_by_student(
    repo: &GradeRepository,
    student_id: &str,
) -> ApiResult<InternshipGrade> {
    repo.find_by_student(student_id)
        .await?
        .ok_or_else(|| ApiError::not_found("InternshipGrade", student_id))
}

/// Students may only read their own record; supervisors and BCN read any.
pub(crate) fn ensure_can_view(user: &AuthenticatedUser, student_id: &str) -> ApiResult<()> {
    if user.role == Role::Student && user.id != student_id {
        return Err(ApiError::forbidden(
            "students may only access their own grade record",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::CurrentUser;

    #[test]
    fn test_student_scoped_to_own_record() {
        let student = AuthenticatedUser(CurrentUser::new("sv-1", Role::Student));
        assert!(ensure_can_view(&student, "sv-1").is_ok());
        assert!(ensure_can_view(&student, "sv-2").is_err());

        let supervisor = AuthenticatedUser(CurrentUser::new("gv-1", Role::Supervisor));
        assert!(ensure_can_view(&supervisor, "sv-2").is_ok());
    }
}
