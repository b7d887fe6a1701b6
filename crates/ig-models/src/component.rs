//! Grade component model
//!
//! Weighted scoring inputs contributing to the final grade. Components are
//! freely editable until the record is submitted, then frozen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which scoring input this component is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    SupervisorScore,
    CompanyScore,
}

impl ComponentType {
    /// The party expected to grade this component
    pub fn default_grader(&self) -> GradedBy {
        match self {
            ComponentType::SupervisorScore => GradedBy::Supervisor,
            ComponentType::CompanyScore => GradedBy::Company,
        }
    }
}

/// Who entered the score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GradedBy {
    Supervisor,
    Company,
}

/// One weighted scoring input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeComponent {
    #[serde(rename = "type")]
    pub kind: ComponentType,

    /// Score on the 0-10 scale; 0 means "not yet graded"
    #[validate(range(min = 0.0, max = 10.0))]
    pub score: f64,

    /// Fraction of the final grade; weights across a record should sum to 1
    #[validate(range(min = 0.0, max = 1.0))]
    pub weight: f64,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,

    pub graded_by: GradedBy,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub graded_at: Option<DateTime<Utc>>,
}

impl GradeComponent {
    pub fn new(kind: ComponentType, weight: f64) -> Self {
        Self {
            kind,
            score: 0.0,
            weight,
            comment: None,
            graded_by: kind.default_grader(),
            graded_at: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_fresh_component_is_unscored() {
        let c = GradeComponent::new(ComponentType::SupervisorScore, 0.6);
        assert!(!c.is_scored());
        assert_eq!(c.graded_by, GradedBy::Supervisor);
        assert!(c.graded_at.is_none());
    }

    #[test]
    fn test_validate_ranges() {
        let mut c = GradeComponent::new(ComponentType::CompanyScore, 0.4);
        c.score = 8.5;
        assert!(c.validate().is_ok());

        c.score = 11.0;
        assert!(c.validate().is_err());

        c.score = 8.5;
        c.weight = 1.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_component_wire_names() {
        let c = GradeComponent::new(ComponentType::SupervisorScore, 0.6);
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["type"], "supervisor_score");
        assert_eq!(value["gradedBy"], "supervisor");
    }
}
