//! # ig-grading
//!
//! The domain core: lifecycle state machine, milestone registry, progress and
//! final-grade calculators, and the review gate. Everything here is pure
//! in-memory mutation over [`ig_models::InternshipGrade`]; persistence and
//! transport live elsewhere.
//!
//! Every operation validates first and mutates only on success, so a returned
//! error always means the aggregate is untouched.

pub mod components;
pub mod lifecycle;
pub mod milestones;
pub mod progress;
pub mod review;
pub mod scoring;

use ig_models::grade::InternshipGrade;

/// Recompute every derived field from the current aggregate state.
///
/// Idempotent; called after each successful mutation and never skipped, so
/// derived fields always reflect the post-write state.
pub fn recompute_derived(grade: &mut InternshipGrade) {
    grade.progress_percentage = progress::progress_percentage(&grade.milestones);
    let (final_grade, letter_grade) = scoring::derive(&grade.grade_components);
    grade.final_grade = final_grade;
    grade.letter_grade = letter_grade;
}
