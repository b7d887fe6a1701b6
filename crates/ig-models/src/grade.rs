//! Internship grade aggregate
//!
//! One record per (student, internship subject) pair. The aggregate embeds
//! its milestones and grade components; all derived fields are recomputed
//! server-side after every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use ig_core::traits::{Entity, Identifiable, Lockable, Timestamped};

use crate::component::{ComponentType, GradeComponent};
use crate::milestone::{Milestone, MilestoneStatus, MilestoneType};

/// Lifecycle state of a grade record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    #[default]
    NotStarted,
    InProgress,
    DraftCompleted,
    Submitted,
    Approved,
    Rejected,
}

impl GradeStatus {
    /// States in which the supervisor may still mutate the record.
    /// `rejected` re-enters edit rights; the label stays until resubmission.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            GradeStatus::NotStarted
                | GradeStatus::InProgress
                | GradeStatus::DraftCompleted
                | GradeStatus::Rejected
        )
    }

    /// States from which a submit-to-BCN transition is allowed
    pub fn can_submit(&self) -> bool {
        matches!(
            self,
            GradeStatus::InProgress | GradeStatus::DraftCompleted | GradeStatus::Rejected
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GradeStatus::NotStarted => "not_started",
            GradeStatus::InProgress => "in_progress",
            GradeStatus::DraftCompleted => "draft_completed",
            GradeStatus::Submitted => "submitted",
            GradeStatus::Approved => "approved",
            GradeStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(GradeStatus::NotStarted),
            "in_progress" => Some(GradeStatus::InProgress),
            "draft_completed" => Some(GradeStatus::DraftCompleted),
            "submitted" => Some(GradeStatus::Submitted),
            "approved" => Some(GradeStatus::Approved),
            "rejected" => Some(GradeStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of internship work
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    /// Company internship; company fields are relevant
    ThucTap,
    /// Capstone project; projectTopic is relevant
    DoAn,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::ThucTap => "thuc_tap",
            WorkType::DoAn => "do_an",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "thuc_tap" => Some(WorkType::ThucTap),
            "do_an" => Some(WorkType::DoAn),
            _ => None,
        }
    }
}

/// Letter grade derived from the numeric final grade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "D+")]
    DPlus,
    D,
    F,
}

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A+" => Some(LetterGrade::APlus),
            "A" => Some(LetterGrade::A),
            "B+" => Some(LetterGrade::BPlus),
            "B" => Some(LetterGrade::B),
            "C+" => Some(LetterGrade::CPlus),
            "C" => Some(LetterGrade::C),
            "D+" => Some(LetterGrade::DPlus),
            "D" => Some(LetterGrade::D),
            "F" => Some(LetterGrade::F),
            _ => None,
        }
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a user (student or supervisor)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Reference to the internship subject
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
}

/// Geolocation of a company site
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Company contact info for thuc_tap work
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

/// Grading-sheet attachment (not tied to a milestone)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingFile {
    pub id: String,
    pub file_name: String,
    pub file_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Internship grade record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipGrade {
    pub id: String,

    /// Legacy document id, carried through for older clients
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub legacy_id: Option<String>,

    pub student: PersonRef,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub supervisor: Option<PersonRef>,
    pub subject: SubjectRef,

    pub work_type: WorkType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub company: Option<CompanyInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project_topic: Option<String>,

    pub status: GradeStatus,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub grade_components: Vec<GradeComponent>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub final_grade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub letter_grade: Option<LetterGrade>,
    #[serde(default)]
    pub progress_percentage: i32,

    #[serde(rename = "submittedToBCN", default)]
    pub submitted_to_bcn: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rejected_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub supervisor_final_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grading_notes: Option<String>,
    #[serde(default)]
    pub grading_files: Vec<GradingFile>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bcn_comment: Option<String>,

    #[serde(default)]
    pub lock_version: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InternshipGrade {
    /// Create a fresh record with its start milestone seeded
    pub fn new(
        student: PersonRef,
        subject: SubjectRef,
        work_type: WorkType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            legacy_id: None,
            student,
            supervisor: None,
            subject,
            work_type,
            company: None,
            project_topic: None,
            status: GradeStatus::NotStarted,
            milestones: vec![Milestone::start()],
            grade_components: Vec::new(),
            final_grade: None,
            letter_grade: None,
            progress_percentage: 0,
            submitted_to_bcn: false,
            submitted_at: None,
            approved_at: None,
            rejected_at: None,
            supervisor_final_comment: None,
            grading_notes: None,
            grading_files: Vec::new(),
            bcn_comment: None,
            lock_version: 0,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }

    pub fn milestone_mut(&mut self, milestone_id: &str) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.id == milestone_id)
    }

    /// The distinguished start milestone. Exactly one exists per record.
    pub fn start_milestone(&self) -> Option<&Milestone> {
        self.milestones
            .iter()
            .find(|m| m.kind == MilestoneType::Start)
    }

    pub fn start_milestone_completed(&self) -> bool {
        self.start_milestone()
            .map(|m| m.status == MilestoneStatus::Completed)
            .unwrap_or(false)
    }

    pub fn component_mut(&mut self, kind: ComponentType) -> Option<&mut GradeComponent> {
        self.grade_components.iter_mut().find(|c| c.kind == kind)
    }

    /// All components carry a positive score (and at least one exists)
    pub fn all_components_scored(&self) -> bool {
        !self.grade_components.is_empty()
            && self.grade_components.iter().all(|c| c.score > 0.0)
    }
}

impl Identifiable for InternshipGrade {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for InternshipGrade {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Lockable for InternshipGrade {
    fn lock_version(&self) -> i32 {
        self.lock_version
    }
}

impl Entity for InternshipGrade {
    const TYPE_NAME: &'static str = "InternshipGrade";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grade() -> InternshipGrade {
        InternshipGrade::new(
            PersonRef {
                id: "sv-1".into(),
                name: "Nguyen Van A".into(),
                email: "a@student.edu.vn".into(),
            },
            SubjectRef {
                id: "subj-1".into(),
                title: "Company Internship".into(),
            },
            WorkType::ThucTap,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_record_seeds_start_milestone() {
        let grade = sample_grade();
        assert_eq!(grade.status, GradeStatus::NotStarted);
        assert_eq!(grade.milestones.len(), 1);
        assert_eq!(grade.start_milestone().unwrap().kind, MilestoneType::Start);
        assert!(!grade.start_milestone_completed());
    }

    #[test]
    fn test_status_serde_strings() {
        let json = serde_json::to_string(&GradeStatus::DraftCompleted).unwrap();
        assert_eq!(json, "\"draft_completed\"");
        let back: GradeStatus = serde_json::from_str("\"not_started\"").unwrap();
        assert_eq!(back, GradeStatus::NotStarted);
    }

    #[test]
    fn test_submitted_to_bcn_wire_name() {
        let grade = sample_grade();
        let value = serde_json::to_value(&grade).unwrap();
        assert!(value.get("submittedToBCN").is_some());
        assert!(value.get("workType").is_some());
    }

    #[test]
    fn test_letter_grade_round_trip() {
        for letter in [
            LetterGrade::APlus,
            LetterGrade::A,
            LetterGrade::BPlus,
            LetterGrade::B,
            LetterGrade::CPlus,
            LetterGrade::C,
            LetterGrade::DPlus,
            LetterGrade::D,
            LetterGrade::F,
        ] {
            assert_eq!(LetterGrade::parse(letter.as_str()), Some(letter));
        }
        let json = serde_json::to_string(&LetterGrade::APlus).unwrap();
        assert_eq!(json, "\"A+\"");
    }

    #[test]
    fn test_editable_states() {
        assert!(GradeStatus::NotStarted.is_editable());
        assert!(GradeStatus::InProgress.is_editable());
        assert!(GradeStatus::DraftCompleted.is_editable());
        assert!(GradeStatus::Rejected.is_editable());
        assert!(!GradeStatus::Submitted.is_editable());
        assert!(!GradeStatus::Approved.is_editable());
    }
}
