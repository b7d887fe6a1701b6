//! Progress calculator
//!
//! Completion ratio over the milestone list, rounded to a whole percent.

use ig_models::milestone::{Milestone, MilestoneStatus};

/// `round(100 * completed / total)`, 0 when there are no milestones.
pub fn progress_percentage(milestones: &[Milestone]) -> i32 {
    if milestones.is_empty() {
        return 0;
    }
    let completed = milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::Completed)
        .count();
    (100.0 * completed as f64 / milestones.len() as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::due;
    use ig_models::milestone::Milestone;

    fn milestones(total: usize, completed: usize) -> Vec<Milestone> {
        (0..total)
            .map(|i| {
                let mut m = Milestone::custom(format!("m{}", i), due(), None);
                if i < completed {
                    m.status = MilestoneStatus::Completed;
                }
                m
            })
            .collect()
    }

    #[test]
    fn test_empty_list_is_zero() {
        assert_eq!(progress_percentage(&[]), 0);
    }

    #[test]
    fn test_one_of_four_is_25() {
        assert_eq!(progress_percentage(&milestones(4, 1)), 25);
    }

    #[test]
    fn test_rounding() {
        // 1/3 -> 33, 2/3 -> 67
        assert_eq!(progress_percentage(&milestones(3, 1)), 33);
        assert_eq!(progress_percentage(&milestones(3, 2)), 67);
    }

    #[test]
    fn test_completing_never_decreases() {
        let mut ms = milestones(5, 2);
        let before = progress_percentage(&ms);

        // complete each remaining milestone one at a time
        let mut last = before;
        for i in 0..ms.len() {
            if ms[i].status != MilestoneStatus::Completed {
                ms[i].status = MilestoneStatus::Completed;
                let next = progress_percentage(&ms);
                assert!(next >= last);
                last = next;
            }
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_non_completed_states_do_not_count() {
        let mut ms = milestones(2, 0);
        ms[0].status = MilestoneStatus::InProgress;
        ms[1].status = MilestoneStatus::Overdue;
        assert_eq!(progress_percentage(&ms), 0);
    }
}
