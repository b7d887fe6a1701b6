//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use sqlx::PgPool;
use std::sync::Arc;

use ig_core::config::AppConfig;
use ig_core::pagination::PaginationParams;
use ig_core::traits::{Role, UserContext};

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Option<PgPool>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }

    pub fn pool(&self) -> Result<&PgPool, ApiError> {
        self.db
            .as_ref()
            .ok_or_else(|| ApiError::internal("database is not configured"))
    }
}

/// The acting user of a request.
///
/// Identity and role are injected by the authenticating gateway as
/// `x-user-id` / `x-user-role` headers; this service only enforces what the
/// role is allowed to do.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

impl UserContext for CurrentUser {
    fn user_id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Role {
        self.role
    }
}

/// Authenticated user extractor
pub struct AuthenticatedUser(pub CurrentUser);

impl AuthenticatedUser {
    /// Reject any role other than the required one
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.0.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "this action requires the {} role",
                role
            )))
        }
    }

    /// Reject roles outside the allowed set
    pub fn require_one_of(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "this action is not available to the {} role",
                self.0.role
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());
        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
            .and_then(Role::parse);

        match (id, role) {
            (Some(id), Some(role)) => Ok(AuthenticatedUser(CurrentUser::new(id, role))),
            _ if !app_state.config.server.require_authentication => {
                // dev mode: act as a supervisor so local flows stay usable
                Ok(AuthenticatedUser(CurrentUser::new("dev", Role::Supervisor)))
            }
            _ => Err(ApiError::unauthorized(
                "x-user-id and x-user-role headers are required",
            )),
        }
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pagination extractor
pub struct Pagination(pub PaginationParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(PaginationParams::default()));
        Ok(Pagination(params))
    }
}

impl std::ops::Deref for Pagination {
    type Target = PaginationParams;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
