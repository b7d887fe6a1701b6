//! Milestone handlers: status updates, creation, details, deletion, files.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use ig_core::traits::Role;
use ig_db::GradeRepository;
use ig_grading::milestones;
use ig_models::grade::InternshipGrade;
use ig_models::milestone::UploaderRole;
use ig_models::requests::{
    MilestoneDetailsPatch, MilestoneStatusUpdate, NewFileSubmission, NewMilestone,
};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};
use crate::handlers::{ensure_can_view, load_by_student};

/// PUT /grades/students/:studentId/milestones/:milestoneId
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((student_id, milestone_id)): Path<(String, String)>,
    Json(update): Json<MilestoneStatusUpdate>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Supervisor)?;
    let repo = GradeRepository::new(state.pool()?.clone());

    let mut grade = load_by_student(&repo, &student_id).await?;
    milestones::update_status(
        &mut grade,
        &milestone_id,
        update.status,
        update.supervisor_notes,
        Utc::now(),
    )?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}

/// POST /grades/students/:studentId/milestones
pub async fn create_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(student_id): Path<String>,
    Json(input): Json<NewMilestone>,
) -> ApiResult<(StatusCode, Json<InternshipGrade>)> {
    user.require(Role::Supervisor)?;
    let repo = GradeRepository::new(state.pool()?.clone());

    let mut grade = load_by_student(&repo, &student_id).await?;
    milestones::add_custom(&mut grade, input)?;

    let saved = repo.save(&grade).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /grades/students/:studentId/milestones/:milestoneId/details
pub async fn edit_details(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((student_id, milestone_id)): Path<(String, String)>,
    Json(patch): Json<MilestoneDetailsPatch>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Supervisor)?;
    let repo = GradeRepository::new(state.pool()?.clone());

    let mut grade = load_by_student(&repo, &student_id).await?;
    milestones::edit_details(&mut grade, &milestone_id, patch)?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}

/// DELETE /grades/students/:studentId/milestones/:milestoneId
pub async fn delete_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((student_id, milestone_id)): Path<(String, String)>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Supervisor)?;
    let repo = GradeRepository::new(state.pool()?.clone());

    let mut grade = load_by_student(&repo, &student_id).await?;
    milestones::delete(&mut grade, &milestone_id)?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}

/// POST /grades/students/:studentId/milestones/:milestoneId/files
pub async fn attach_file(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((student_id, milestone_id)): Path<(String, String)>,
    Json(input): Json<NewFileSubmission>,
) -> ApiResult<(StatusCode, Json<InternshipGrade>)> {
    user.require_one_of(&[Role::Student, Role::Supervisor])?;
    ensure_can_view(&user, &student_id)?;

    let uploaded_by = UploaderRole::from_role(user.role)
        .ok_or_else(|| ApiError::forbidden("reviewers do not upload milestone files"))?;

    let repo = GradeRepository::new(state.pool()?.clone());
    let mut grade = load_by_student(&repo, &student_id).await?;
    milestones::attach_file(&mut grade, &milestone_id, input, uploaded_by, Utc::now())?;

    let saved = repo.save(&grade).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /grades/students/:studentId/milestones/:milestoneId/files/:fileId
pub async fn remove_file(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((student_id, milestone_id, file_id)): Path<(String, String, String)>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require_one_of(&[Role::Student, Role::Supervisor])?;
    ensure_can_view(&user, &student_id)?;

    let repo = GradeRepository::new(state.pool()?.clone());
    let mut grade = load_by_student(&repo, &student_id).await?;
    milestones::remove_file(&mut grade, &milestone_id, &file_id, user.role)?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}
