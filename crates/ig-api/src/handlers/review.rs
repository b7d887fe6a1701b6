//! BCN review handlers: submitted queue, detail, approve/reject.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use ig_core::pagination::CollectionResponse;
use ig_core::traits::Role;
use ig_db::GradeRepository;
use ig_grading::review;
use ig_models::grade::InternshipGrade;
use ig_models::requests::ReviewRequest;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser, Pagination};

/// GET /grades/bcn/submitted-grades
pub async fn submitted_grades(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    pagination: Pagination,
) -> ApiResult<Json<CollectionResponse<InternshipGrade>>> {
    user.require(Role::Bcn)?;

    let repo = GradeRepository::new(state.pool()?.clone());
    let grades = repo.find_submitted(&pagination).await?;
    let total = repo.count_submitted().await?;

    Ok(Json(CollectionResponse::new(grades, total, &pagination)))
}

/// GET /grades/bcn/grades/:id
pub async fn grade_detail(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Bcn)?;

    let repo = GradeRepository::new(state.pool()?.clone());
    let grade = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("InternshipGrade", &id))?;
    Ok(Json(grade))
}

/// POST /grades/bcn/grades/:id/review
pub async fn review_grade(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> ApiResult<Json<InternshipGrade>> {
    user.require(Role::Bcn)?;

    let repo = GradeRepository::new(state.pool()?.clone());
    let mut grade = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("InternshipGrade", &id))?;

    review::review(&mut grade, &request, Utc::now())?;

    let saved = repo.save(&grade).await?;
    Ok(Json(saved))
}
