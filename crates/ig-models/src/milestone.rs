//! Milestone model
//!
//! Milestones are dated checkpoints inside one grade record. The `start`
//! milestone is seeded at record creation and gates custom milestones.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ig_core::traits::Role;

/// Milestone kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneType {
    /// The one seeded checkpoint that gates everything else
    Start,
    /// Supervisor-created checkpoint
    Custom,
}

/// Milestone progress state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Completed => "completed",
            MilestoneStatus::Overdue => "overdue",
        }
    }
}

/// Who uploaded a milestone file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploaderRole {
    Student,
    Supervisor,
}

impl UploaderRole {
    /// Map an acting request role onto an uploader tag
    pub fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::Student => Some(UploaderRole::Student),
            Role::Supervisor => Some(UploaderRole::Supervisor),
            Role::Bcn => None,
        }
    }
}

/// Coarse attachment category derived from the file name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Document,
    Spreadsheet,
    Presentation,
    Archive,
    Other,
}

impl FileCategory {
    pub fn from_file_name(name: &str) -> Self {
        let mime = mime_guess::from_path(name).first_or_octet_stream();
        if mime.type_() == mime::IMAGE {
            Self::Image
        } else if mime.type_() == mime::VIDEO {
            Self::Video
        } else if mime.type_() == mime::AUDIO {
            Self::Audio
        } else {
            let essence = mime.essence_str();
            if essence.contains("pdf")
                || essence.contains("msword")
                || essence.contains("wordprocessingml")
                || mime.type_() == mime::TEXT
            {
                Self::Document
            } else if essence.contains("spreadsheet") || essence.contains("excel") {
                Self::Spreadsheet
            } else if essence.contains("presentation") || essence.contains("powerpoint") {
                Self::Presentation
            } else if essence.contains("zip") || essence.contains("tar") || essence.contains("rar")
            {
                Self::Archive
            } else {
                Self::Other
            }
        }
    }
}

/// File attached to a milestone by the student or supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSubmission {
    pub id: String,
    pub file_name: String,
    pub file_url: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: UploaderRole,
    /// Derived from the file name; informational only
    pub category: FileCategory,
}

impl FileSubmission {
    pub fn new(
        file_name: impl Into<String>,
        file_url: impl Into<String>,
        uploaded_by: UploaderRole,
        now: DateTime<Utc>,
    ) -> Self {
        let file_name = file_name.into();
        let category = FileCategory::from_file_name(&file_name);
        Self {
            id: Uuid::new_v4().to_string(),
            file_name,
            file_url: file_url.into(),
            uploaded_at: now,
            uploaded_by,
            category,
        }
    }
}

/// A dated checkpoint within a grade record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MilestoneType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub due_date: Option<NaiveDate>,
    pub status: MilestoneStatus,
    /// Set once, on the first transition into `completed`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub supervisor_notes: Option<String>,
    #[serde(default)]
    pub file_submissions: Vec<FileSubmission>,
    pub is_custom: bool,
}

impl Milestone {
    /// The seeded start milestone of a fresh record
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: MilestoneType::Start,
            title: "Start".to_string(),
            description: None,
            due_date: None,
            status: MilestoneStatus::Pending,
            completed_at: None,
            supervisor_notes: None,
            file_submissions: Vec::new(),
            is_custom: false,
        }
    }

    pub fn custom(
        title: impl Into<String>,
        due_date: NaiveDate,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: MilestoneType::Custom,
            title: title.into(),
            description,
            due_date: Some(due_date),
            status: MilestoneStatus::Pending,
            completed_at: None,
            supervisor_notes: None,
            file_submissions: Vec::new(),
            is_custom: true,
        }
    }

    pub fn file(&self, file_id: &str) -> Option<&FileSubmission> {
        self.file_submissions.iter().find(|f| f.id == file_id)
    }
}
