//! Implementation checklist
//!
//! Quadrant-independent: the same nine items close every report.

use crate::types::{ChecklistCategory, ChecklistItem, ChecklistStatus};

fn item(category: ChecklistCategory, item: &str, description: &str) -> ChecklistItem {
    ChecklistItem {
        category,
        item: item.to_string(),
        description: Some(description.to_string()),
        status: ChecklistStatus::Pending,
    }
}

/// The fixed checklist, rule-of-four items first
pub fn checklist() -> Vec<ChecklistItem> {
    use ChecklistCategory::{EssentialStates, FourRule};

    vec![
        item(FourRule, "Clear priority defined", "Visual hierarchy established"),
        item(
            FourRule,
            "Logical sequence (context → options → action → feedback)",
            "Natural interaction flow",
        ),
        item(FourRule, "Consistent grouping", "Related elements grouped together"),
        item(FourRule, "Controlled emphasis (one highlight per block)", "Directed visual focus"),
        item(EssentialStates, "Empty state designed", "First run and no-data scenarios"),
        item(EssentialStates, "Loading state defined", "Feedback while processing"),
        item(EssentialStates, "Partial state handled", "Incomplete or in-progress data"),
        item(EssentialStates, "Error state with recovery", "Failures handled with next actions"),
        item(EssentialStates, "Clear success state", "Completion confirmed"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_has_nine_items() {
        let items = checklist();
        assert_eq!(items.len(), 9);
        let four_rule = items
            .iter()
            .filter(|i| i.category == ChecklistCategory::FourRule)
            .count();
        assert_eq!(four_rule, 4);
        assert_eq!(items.len() - four_rule, 5);
    }

    #[test]
    fn test_checklist_is_idempotent() {
        assert_eq!(checklist(), checklist());
    }

    #[test]
    fn test_checklist_grouped_and_pending() {
        let items = checklist();
        assert!(items[..4].iter().all(|i| i.category == ChecklistCategory::FourRule));
        assert!(items[4..]
            .iter()
            .all(|i| i.category == ChecklistCategory::EssentialStates));
        assert!(items.iter().all(|i| i.status == ChecklistStatus::Pending));
    }
}
