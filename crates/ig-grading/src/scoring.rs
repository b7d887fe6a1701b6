//! Final grade calculator
//!
//! Weighted mean over the grade components plus the fixed letter cutoffs.
//! Pure functions; no side effects beyond what the caller stores.

use ig_models::component::GradeComponent;
use ig_models::grade::LetterGrade;

/// Weighted mean of all component scores.
///
/// Guards against a zero total weight by returning 0.
pub fn weighted_mean(components: &[GradeComponent]) -> f64 {
    let total_weight: f64 = components.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = components.iter().map(|c| c.score * c.weight).sum();
    weighted_sum / total_weight
}

/// Fixed letter cutoffs, highest first; first match wins.
pub fn letter_for(final_grade: f64) -> LetterGrade {
    if final_grade >= 9.0 {
        LetterGrade::APlus
    } else if final_grade >= 8.5 {
        LetterGrade::A
    } else if final_grade >= 8.0 {
        LetterGrade::BPlus
    } else if final_grade >= 7.0 {
        LetterGrade::B
    } else if final_grade >= 6.5 {
        LetterGrade::CPlus
    } else if final_grade >= 5.5 {
        LetterGrade::C
    } else if final_grade >= 5.0 {
        LetterGrade::DPlus
    } else if final_grade >= 4.0 {
        LetterGrade::D
    } else {
        LetterGrade::F
    }
}

/// Derive the stored (finalGrade, letterGrade) pair.
///
/// Meaningful only once every component carries a positive score; until then
/// both stay absent.
pub fn derive(components: &[GradeComponent]) -> (Option<f64>, Option<LetterGrade>) {
    if components.is_empty() || components.iter().any(|c| c.score <= 0.0) {
        return (None, None);
    }
    let final_grade = weighted_mean(components);
    (Some(final_grade), Some(letter_for(final_grade)))
}
