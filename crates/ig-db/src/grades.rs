//! Grade record repository
//!
//! One aggregate row per record. Milestones, components, and the embedded
//! references are JSONB columns so every mutation is a single atomic
//! read-modify-write, guarded by the `lock_version` optimistic check.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use ig_core::pagination::PaginationParams;
use ig_models::component::GradeComponent;
use ig_models::grade::{
    CompanyInfo, GradeStatus, GradingFile, InternshipGrade, LetterGrade, PersonRef, SubjectRef,
    WorkType,
};
use ig_models::milestone::Milestone;

use crate::repository::{RepositoryError, RepositoryResult};

/// Grade record database row
#[derive(Debug, Clone, FromRow)]
pub struct GradeRow {
    pub id: String,
    pub legacy_id: Option<String>,
    pub student: Json<PersonRef>,
    pub supervisor: Option<Json<PersonRef>>,
    pub subject: Json<SubjectRef>,
    pub work_type: String,
    pub company: Option<Json<CompanyInfo>>,
    pub project_topic: Option<String>,
    pub status: String,
    pub milestones: Json<Vec<Milestone>>,
    pub grade_components: Json<Vec<GradeComponent>>,
    pub final_grade: Option<f64>,
    pub letter_grade: Option<String>,
    pub progress_percentage: i32,
    pub submitted_to_bcn: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub supervisor_final_comment: Option<String>,
    pub grading_notes: Option<String>,
    pub grading_files: Json<Vec<GradingFile>>,
    pub bcn_comment: Option<String>,
    pub lock_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GradeRow {
    /// Convert the row into the domain aggregate, rejecting malformed
    /// stored values rather than trusting them.
    pub fn into_model(self) -> RepositoryResult<InternshipGrade> {
        let status = GradeStatus::parse(&self.status)
            .ok_or_else(|| RepositoryError::Corrupt(format!("unknown status {:?}", self.status)))?;
        let work_type = WorkType::parse(&self.work_type).ok_or_else(|| {
            RepositoryError::Corrupt(format!("unknown work type {:?}", self.work_type))
        })?;
        let letter_grade = match self.letter_grade.as_deref() {
            None => None,
            Some(raw) => Some(LetterGrade::parse(raw).ok_or_else(|| {
                RepositoryError::Corrupt(format!("unknown letter grade {:?}", raw))
            })?),
        };

        Ok(InternshipGrade {
            id: self.id,
            legacy_id: self.legacy_id,
            student: self.student.0,
            supervisor: self.supervisor.map(|s| s.0),
            subject: self.subject.0,
            work_type,
            company: self.company.map(|c| c.0),
            project_topic: self.project_topic,
            status,
            milestones: self.milestones.0,
            grade_components: self.grade_components.0,
            final_grade: self.final_grade,
            letter_grade,
            progress_percentage: self.progress_percentage,
            submitted_to_bcn: self.submitted_to_bcn,
            submitted_at: self.submitted_at,
            approved_at: self.approved_at,
            rejected_at: self.rejected_at,
            supervisor_final_comment: self.supervisor_final_comment,
            grading_notes: self.grading_notes,
            grading_files: self.grading_files.0,
            bcn_comment: self.bcn_comment,
            lock_version: self.lock_version,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        })
    }
}

const COLUMNS: &str = r#"id, legacy_id, student, supervisor, subject, work_type, company,
       project_topic, status, milestones, grade_components, final_grade,
       letter_grade, progress_percentage, submitted_to_bcn, submitted_at,
       approved_at, rejected_at, supervisor_final_comment, grading_notes,
       grading_files, bcn_comment, lock_version, created_at, updated_at"#;

/// Grade record repository
pub struct GradeRepository {
    pool: PgPool,
}

impl GradeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<InternshipGrade>> {
        let row = sqlx::query_as::<_, GradeRow>(&format!(
            "SELECT {} FROM internship_grades WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(GradeRow::into_model).transpose()
    }

    /// One record per student; the student id is the natural lookup key.
    pub async fn find_by_student(
        &self,
        student_id: &str,
    ) -> RepositoryResult<Option<InternshipGrade>> {
        let row = sqlx::query_as::<_, GradeRow>(&format!(
            "SELECT {} FROM internship_grades WHERE student->>'id' = $1",
            COLUMNS
        ))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(GradeRow::into_model).transpose()
    }

    /// Records assigned to a supervisor, optionally filtered by status.
    pub async fn find_by_supervisor(
        &self,
        supervisor_id: &str,
        status: Option<GradeStatus>,
        pagination: &PaginationParams,
    ) -> RepositoryResult<Vec<InternshipGrade>> {
        let rows = sqlx::query_as::<_, GradeRow>(&format!(
            r#"
            SELECT {}
            FROM internship_grades
            WHERE supervisor->>'id' = $1
              AND ($2::text IS NULL OR status = $2)
            ORDER BY updated_at DESC
            LIMIT $3 OFFSET $4
            "#,
            COLUMNS
        ))
        .bind(supervisor_id)
        .bind(status.map(|s| s.as_str()))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(GradeRow::into_model).collect()
    }

    pub async fn count_by_supervisor(
        &self,
        supervisor_id: &str,
        status: Option<GradeStatus>,
    ) -> RepositoryResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM internship_grades
            WHERE supervisor->>'id' = $1
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(supervisor_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Records waiting for (or past) BCN review.
    pub async fn find_submitted(
        &self,
        pagination: &PaginationParams,
    ) -> RepositoryResult<Vec<InternshipGrade>> {
        let rows = sqlx::query_as::<_, GradeRow>(&format!(
            r#"
            SELECT {}
            FROM internship_grades
            WHERE status = 'submitted'
            ORDER BY submitted_at ASC
            LIMIT $1 OFFSET $2
            "#,
            COLUMNS
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(GradeRow::into_model).collect()
    }

    pub async fn count_submitted(&self) -> RepositoryResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM internship_grades WHERE status = 'submitted'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn insert(&self, grade: &InternshipGrade) -> RepositoryResult<InternshipGrade> {
        let row = sqlx::query_as::<_, GradeRow>(&format!(
            r#"
            INSERT INTO internship_grades (
                id, legacy_id, student, supervisor, subject, work_type, company,
                project_topic, status, milestones, grade_components, final_grade,
                letter_grade, progress_percentage, submitted_to_bcn, submitted_at,
                approved_at, rejected_at, supervisor_final_comment, grading_notes,
                grading_files, bcn_comment, lock_version, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, 0, now(), now()
            )
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&grade.id)
        .bind(&grade.legacy_id)
        .bind(Json(&grade.student))
        .bind(grade.supervisor.as_ref().map(Json))
        .bind(Json(&grade.subject))
        .bind(grade.work_type.as_str())
        .bind(grade.company.as_ref().map(Json))
        .bind(&grade.project_topic)
        .bind(grade.status.as_str())
        .bind(Json(&grade.milestones))
        .bind(Json(&grade.grade_components))
        .bind(grade.final_grade)
        .bind(grade.letter_grade.map(|l| l.as_str()))
        .bind(grade.progress_percentage)
        .bind(grade.submitted_to_bcn)
        .bind(grade.submitted_at)
        .bind(grade.approved_at)
        .bind(grade.rejected_at)
        .bind(&grade.supervisor_final_comment)
        .bind(&grade.grading_notes)
        .bind(Json(&grade.grading_files))
        .bind(&grade.bcn_comment)
        .fetch_one(&self.pool)
        .await?;

        row.into_model()
    }

    /// Persist a mutated aggregate.
    ///
    /// The write succeeds only against the `lock_version` the aggregate was
    /// loaded with; a stale version is a conflict, never a silent overwrite.
    pub async fn save(&self, grade: &InternshipGrade) -> RepositoryResult<InternshipGrade> {
        let row = sqlx::query_as::<_, GradeRow>(&format!(
            r#"
            UPDATE internship_grades SET
                student = $3,
                supervisor = $4,
                subject = $5,
                work_type = $6,
                company = $7,
                project_topic = $8,
                status = $9,
                milestones = $10,
                grade_components = $11,
                final_grade = $12,
                letter_grade = $13,
                progress_percentage = $14,
                submitted_to_bcn = $15,
                submitted_at = $16,
                approved_at = $17,
                rejected_at = $18,
                supervisor_final_comment = $19,
                grading_notes = $20,
                grading_files = $21,
                bcn_comment = $22,
                lock_version = lock_version + 1,
                updated_at = now()
            WHERE id = $1 AND lock_version = $2
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&grade.id)
        .bind(grade.lock_version)
        .bind(Json(&grade.student))
        .bind(grade.supervisor.as_ref().map(Json))
        .bind(Json(&grade.subject))
        .bind(grade.work_type.as_str())
        .bind(grade.company.as_ref().map(Json))
        .bind(&grade.project_topic)
        .bind(grade.status.as_str())
        .bind(Json(&grade.milestones))
        .bind(Json(&grade.grade_components))
        .bind(grade.final_grade)
        .bind(grade.letter_grade.map(|l| l.as_str()))
        .bind(grade.progress_percentage)
        .bind(grade.submitted_to_bcn)
        .bind(grade.submitted_at)
        .bind(grade.approved_at)
        .bind(grade.rejected_at)
        .bind(&grade.supervisor_final_comment)
        .bind(&grade.grading_notes)
        .bind(Json(&grade.grading_files))
        .bind(&grade.bcn_comment)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_model(),
            None => {
                if self.exists(&grade.id).await? {
                    Err(RepositoryError::Conflict(format!(
                        "grade {} was modified concurrently",
                        grade.id
                    )))
                } else {
                    Err(RepositoryError::NotFound(grade.id.clone()))
                }
            }
        }
    }

    pub async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM internship_grades WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(found > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ig_models::milestone::MilestoneStatus;

    fn sample_row() -> GradeRow {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let student = PersonRef {
            id: "sv-9".into(),
            name: "Pham Van D".into(),
            email: "d@student.edu.vn".into(),
        };
        let subject = SubjectRef {
            id: "subj-2".into(),
            title: "Capstone Project".into(),
        };
        let grade = InternshipGrade::new(student.clone(), subject.clone(), WorkType::DoAn, now);

        GradeRow {
            id: grade.id.clone(),
            legacy_id: Some("64a0c0ffee".into()),
            student: Json(student),
            supervisor: None,
            subject: Json(subject),
            work_type: "do_an".into(),
            company: None,
            project_topic: Some("Course registration assistant".into()),
            status: "in_progress".into(),
            milestones: Json(grade.milestones.clone()),
            grade_components: Json(vec![]),
            final_grade: None,
            letter_grade: None,
            progress_percentage: 0,
            submitted_to_bcn: false,
            submitted_at: None,
            approved_at: None,
            rejected_at: None,
            supervisor_final_comment: None,
            grading_notes: None,
            grading_files: Json(vec![]),
            bcn_comment: None,
            lock_version: 3,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_into_model() {
        let row = sample_row();
        let id = row.id.clone();
        let model = row.into_model().unwrap();

        assert_eq!(model.id, id);
        assert_eq!(model.status, GradeStatus::InProgress);
        assert_eq!(model.work_type, WorkType::DoAn);
        assert_eq!(model.legacy_id.as_deref(), Some("64a0c0ffee"));
        assert_eq!(model.lock_version, 3);
        assert_eq!(model.milestones.len(), 1);
        assert_eq!(model.milestones[0].status, MilestoneStatus::Pending);
    }

    #[test]
    fn test_row_with_unknown_status_is_rejected() {
        let mut row = sample_row();
        row.status = "paused".into();
        assert!(matches!(
            row.into_model(),
            Err(RepositoryError::Corrupt(_))
        ));
    }

    #[test]
    fn test_row_with_unknown_letter_is_rejected() {
        let mut row = sample_row();
        row.letter_grade = Some("E".into());
        assert!(matches!(
            row.into_model(),
            Err(RepositoryError::Corrupt(_))
        ));
    }
}
