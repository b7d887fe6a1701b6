//! Contracts for milestone mutations

use ig_core::error::ValidationErrors;
use ig_models::requests::{MilestoneDetailsPatch, NewMilestone};

use crate::base::{require_present, Contract, ValidationResult};

/// Contract for creating a custom milestone.
///
/// The start-milestone gate is a lifecycle precondition, not input
/// validation; it is enforced by the registry, not here.
pub struct CreateMilestoneContract;

impl Contract<NewMilestone> for CreateMilestoneContract {
    fn validate(&self, input: &NewMilestone) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        require_present(&mut errors, "title", Some(input.title.as_str()));
        if input.due_date.is_none() {
            errors.add("dueDate", "can't be blank");
        }
        if let Some(desc) = &input.description {
            if desc.len() > 4000 {
                errors.add("description", "is too long (maximum 4000 characters)");
            }
        }

        errors.into_result()
    }
}

/// Contract for editing milestone title/description/dueDate
pub struct MilestoneDetailsContract;

impl Contract<MilestoneDetailsPatch> for MilestoneDetailsContract {
    fn validate(&self, input: &MilestoneDetailsPatch) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &input.title {
            require_present(&mut errors, "title", Some(title.as_str()));
        }
        if input.title.is_none() && input.description.is_none() && input.due_date.is_none() {
            errors.add_base("no fields to update");
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
    }

    #[test]
    fn test_create_requires_title_and_due_date() {
        let contract = CreateMilestoneContract;

        let empty = NewMilestone {
            title: "".into(),
            description: None,
            due_date: None,
        };
        let errors = contract.validate(&empty).unwrap_err();
        assert!(errors.has_error("title"));
        assert!(errors.has_error("dueDate"));

        let ok = NewMilestone {
            title: "Weekly check-in".into(),
            description: Some("Progress sync".into()),
            due_date: Some(due()),
        };
        assert!(contract.validate(&ok).is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let contract = CreateMilestoneContract;
        let blank = NewMilestone {
            title: "   ".into(),
            description: None,
            due_date: Some(due()),
        };
        assert!(contract.validate(&blank).is_err());
    }

    #[test]
    fn test_details_patch_rejects_empty_patch() {
        let contract = MilestoneDetailsContract;
        let errors = contract
            .validate(&MilestoneDetailsPatch::default())
            .unwrap_err();
        assert!(!errors.base_errors.is_empty());
    }

    #[test]
    fn test_details_patch_rejects_blank_title() {
        let contract = MilestoneDetailsContract;
        let patch = MilestoneDetailsPatch {
            title: Some("".into()),
            ..Default::default()
        };
        assert!(contract.validate(&patch).is_err());

        let patch = MilestoneDetailsPatch {
            due_date: Some(due()),
            ..Default::default()
        };
        assert!(contract.validate(&patch).is_ok());
    }
}
