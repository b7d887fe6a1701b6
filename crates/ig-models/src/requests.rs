//! Write models: request payloads accepted by the mutation endpoints.
//!
//! Deserialization gives shape; the contracts crate gives the cross-field
//! rules. Nothing here is trusted for derived fields.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::component::ComponentType;
use crate::grade::{CompanyInfo, WorkType};
use crate::milestone::MilestoneStatus;

/// POST /grades/students/:studentId/milestones
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// PUT /grades/students/:studentId/milestones/:milestoneId/details
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDetailsPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// PUT /grades/students/:studentId/milestones/:milestoneId
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneStatusUpdate {
    pub status: MilestoneStatus,
    #[serde(default)]
    pub supervisor_notes: Option<String>,
}

/// POST .../milestones/:id/files
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileSubmission {
    pub file_name: String,
    pub file_url: String,
}

/// One component entry of a grade-sheet update, keyed by its type
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub score: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Grading-sheet attachment reference; entries without an id are new uploads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingFileRef {
    #[serde(default)]
    pub id: Option<String>,
    pub file_name: String,
    pub file_url: String,
}

/// PUT /grades/students/:studentId/grades
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GradeSheetUpdate {
    #[serde(default)]
    pub grade_components: Option<Vec<ComponentPatch>>,
    #[serde(default)]
    pub supervisor_final_comment: Option<String>,
    #[serde(default)]
    pub grading_notes: Option<String>,
    #[serde(default)]
    pub grading_files: Option<Vec<GradingFileRef>>,
}

/// PUT /grades/students/:studentId/work-info
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkInfoUpdate {
    pub work_type: WorkType,
    #[serde(default)]
    pub company: Option<CompanyInfo>,
    #[serde(default)]
    pub project_topic: Option<String>,
}

/// Review action taken by the department head
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// POST /grades/bcn/grades/:id/review
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub action: ReviewAction,
    #[serde(default)]
    pub bcn_comment: Option<String>,
}
