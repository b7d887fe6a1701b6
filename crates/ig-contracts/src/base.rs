//! Base contract system

use ig_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the input or entity
    fn validate(&self, subject: &T) -> ValidationResult;
}

/// Present and non-blank after trimming
pub(crate) fn require_present(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
) {
    match value {
        Some(v) if !v.trim().is_empty() => {}
        _ => errors.add(field, "can't be blank"),
    }
}
