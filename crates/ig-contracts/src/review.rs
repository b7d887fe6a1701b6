//! Contract for the BCN review action

use ig_core::error::ValidationErrors;
use ig_models::requests::{ReviewAction, ReviewRequest};

use crate::base::{Contract, ValidationResult};

/// A rejection must carry a comment; an approval may omit it.
pub struct ReviewContract;

impl Contract<ReviewRequest> for ReviewContract {
    fn validate(&self, input: &ReviewRequest) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if input.action == ReviewAction::Reject {
            let blank = input
                .bcn_comment
                .as_deref()
                .map(|c| c.trim().is_empty())
                .unwrap_or(true);
            if blank {
                errors.add("bcnComment", "can't be blank when rejecting");
            }
        }

        errors.into_result()
    }
}
