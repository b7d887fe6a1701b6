//! # ig-api
//!
//! REST API for InternGrade RS.
//!
//! Thin axum handlers over the domain core: load the aggregate, run the
//! domain operation, persist under the optimistic lock, return the full
//! recomputed record. Guards are never delegated to the client.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, AuthenticatedUser, CurrentUser};
pub use routes::router;
