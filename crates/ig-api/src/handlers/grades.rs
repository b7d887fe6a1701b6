//! Grade record handlers: snapshots, listings, sheet updates, submission.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use ig_core::pagination::CollectionResponse;
use ig_core::traits::Role;
use ig_db::GradeRepository;
use ig_grading::{components, lifecycle};
use ig_models::grade::{GradeStatus, InternshipGrade};
use ig_models::requests::{GradeSheetUpdate, WorkInfoUpdate};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser, Pagination};
use crate::handlers::{ensure_can_view, load_by_student};

/// GET /grades/student/my-progress
pub async fn my_progress(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Student)?;
    let repo = GradeRepository::new(state.pool()?.clone());
    let grade = load_by_student(&repo, &user.id).await?;
    Ok(Json(grade))
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    status: Option<String>,
}

/// GET /grades/supervisor/students?status=
pub async fn supervisor_students(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filter): Query<StatusFilter>,
    pagination: Pagination,
) -> ApiResult<Json<CollectionResponse<InternshipGrade>>> {
    user.require(Role::Supervisor)?;

    let status = match filter.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(GradeStatus::parse(raw).ok_or_else(|| {
            ApiError::bad_request(format!("unknown status filter {:?}", raw))
        })?),
    };

    let repo = GradeRepository::new(state.pool()?.clone());
    let grades = repo.find_by_supervisor(&user.id, status, &pagination).await?;
    let total = repo.count_by_supervisor(&user.id, status).await?;

    Ok(Json(CollectionResponse::new(grades, total, &pagination)))
}

/// GET /grades/students/:studentId
pub async fn grade_detail(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(student_id): Path<String>,
) -> ApiResult<Json<InternshipGrade>> {
    ensure_can_view(&user, &student_id)?;
    let repo = GradeRepository::new(state.pool()?.clone());
    let grade = load_by_student(&repo, &student_id).await?;
    Ok(Json(grade))
}

/// PUT /grades/students/:studentId/grades
pub async fn update_grade_sheet(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(student_id): Path<String>,
    Json(update): Json<GradeSheetUpdate>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Supervisor)?;
    let repo = GradeRepository::new(state.pool()?.clone());

    let mut grade = load_by_student(&repo, &student_id).await?;
    components::update_sheet(&mut grade, update, &state.config.grading, Utc::now())?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}

/// POST /grades/students/:studentId/submit
pub async fn submit_grade(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(student_id): Path<String>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Supervisor)?;
    let repo = GradeRepository::new(state.pool()?.clone());

    let mut grade = load_by_student(&repo, &student_id).await?;
    lifecycle::submit(&mut grade, Utc::now())?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}

/// PUT /grades/students/:studentId/work-info
pub async fn update_work_info(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(student_id): Path<String>,
    Json(update): Json<WorkInfoUpdate>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Supervisor)?;
    let repo = GradeRepository::new(state.pool()?.clone());

    let mut grade = load_by_student(&repo, &student_id).await?;
    components::update_work_info(&mut grade, update)?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}
