//! API routes
//!
//! The request surface consumed by the dashboard client.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{grades, milestones, review};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/grades", grades_router())
}

fn grades_router() -> Router<AppState> {
    Router::new()
        .route("/student/my-progress", get(grades::my_progress))
        .route("/supervisor/students", get(grades::supervisor_students))
        .route("/students/:student_id", get(grades::grade_detail))
        .route("/students/:student_id/grades", put(grades::update_grade_sheet))
        .route("/students/:student_id/submit", post(grades::submit_grade))
        .route("/students/:student_id/work-info", put(grades::update_work_info))
        .route(
            "/students/:student_id/milestones",
            post(milestones::create_milestone),
        )
        .route(
            "/students/:student_id/milestones/:milestone_id",
            put(milestones::update_status).delete(milestones::delete_milestone),
        )
        .route(
            "/students/:student_id/milestones/:milestone_id/details",
            put(milestones::edit_details),
        )
        .route(
            "/students/:student_id/milestones/:milestone_id/files",
            post(milestones::attach_file),
        )
        .route(
            "/students/:student_id/milestones/:milestone_id/files/:file_id",
            delete(milestones::remove_file),
        )
        .route("/bcn/submitted-grades", get(review::submitted_grades))
        .route("/bcn/grades/:id", get(review::grade_detail))
        .route("/bcn/grades/:id/review", post(review::review_grade))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use ig_core::config::AppConfig;
    use tower::ServiceExt;

    fn test_app(require_auth: bool) -> Router {
        let mut config = AppConfig::default();
        config.server.require_authentication = require_auth;
        router().with_state(AppState::new(config, None))
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let app = test_app(true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/grades/student/my-progress")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let app = test_app(true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/grades/bcn/submitted-grades")
                    .header("x-user-id", "gv-1")
                    .header("x-user-role", "supervisor")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_status_filter_is_bad_request() {
        let app = test_app(true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/grades/supervisor/students?status=paused")
                    .header("x-user-id", "gv-1")
                    .header("x-user-role", "supervisor")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dev_mode_reaches_handler_without_headers() {
        // auth off: the request gets past the extractor and fails only on
        // the missing database
        let app = test_app(false);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/grades/supervisor/students")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
