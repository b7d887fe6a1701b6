//! # ig-db
//!
//! Database layer for InternGrade RS.
//!
//! This crate provides PostgreSQL access using SQLx:
//!
//! - Connection pool management
//! - The grade-record repository (one aggregate row per record, embedded
//!   milestones/components as JSONB, optimistic locking via `lock_version`)
//!
//! The table definition lives in `sql/schema.sql`.
//!
//! ## Example
//!
//! ```ignore
//! use ig_db::{Database, DatabaseConfig, GradeRepository};
//!
//! let config = DatabaseConfig::from_env();
//! let db = Database::connect(&config).await?;
//!
//! let repo = GradeRepository::new(db.pool().clone());
//! let grade = repo.find_by_student("sv-1").await?;
//! ```

pub mod grades;
pub mod pool;
pub mod repository;

pub use grades::{GradeRepository, GradeRow};
pub use pool::{Database, DatabaseConfig, PoolStats};
pub use repository::{RepositoryError, RepositoryResult};
