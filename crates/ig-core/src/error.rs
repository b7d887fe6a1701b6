//! Core error types for InternGrade RS
//!
//! One variant per caller-visible error category; every mutation handler maps
//! its failure into exactly one of these.

use std::collections::HashMap;
use thiserror::Error;

/// Error type for all grade-lifecycle operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("Precondition failed: {message}")]
    PreconditionFailed { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Single-field validation failure shortcut
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::ValidationFailed(errors)
    }
}

/// Validation errors collection
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// Convert into a result: Ok when empty, Err(self) otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// HTTP status code mapping for errors
impl DomainError {
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::NotFound { .. } => 404,
            DomainError::ValidationFailed(_) => 422,
            DomainError::PreconditionFailed { .. } => 412,
            DomainError::Forbidden { .. } => 403,
            DomainError::Conflict { .. } => 409,
            DomainError::Database(_) | DomainError::Internal(_) | DomainError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::ValidationFailed(_) => "validation_failed",
            DomainError::PreconditionFailed { .. } => "precondition_failed",
            DomainError::Forbidden { .. } => "forbidden",
            DomainError::Conflict { .. } => "conflict",
            DomainError::Database(_) => "database_error",
            DomainError::Internal(_) => "internal_error",
            DomainError::Config(_) => "configuration_error",
        }
    }
}

/// Standard Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_accumulate() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("title", "can't be blank");
        errors.add("title", "is too short");
        errors.add_base("record is locked");

        assert!(errors.has_error("title"));
        assert_eq!(errors.get("title").map(Vec::len), Some(2));
        assert_eq!(errors.full_messages().len(), 3);
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationErrors::new();
        a.add("score", "must be positive");
        let mut b = ValidationErrors::new();
        b.add("score", "out of range");
        b.add_base("submit blocked");

        a.merge(b);
        assert_eq!(a.get("score").map(Vec::len), Some(2));
        assert_eq!(a.base_errors.len(), 1);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::not_found("Grade", "g1").status_code(), 404);
        assert_eq!(DomainError::precondition("start pending").status_code(), 412);
        assert_eq!(DomainError::forbidden("locked").status_code(), 403);
        assert_eq!(DomainError::conflict("stale write").status_code(), 409);
        assert_eq!(
            DomainError::invalid("title", "can't be blank").status_code(),
            422
        );
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            DomainError::not_found("Grade", "g1").error_code(),
            DomainError::invalid("x", "y").error_code(),
            DomainError::precondition("p").error_code(),
            DomainError::forbidden("f").error_code(),
            DomainError::conflict("c").error_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
