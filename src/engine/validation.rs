// ==========================================
// Panel Load Engineering - validation engine
// ==========================================
// Responsibility: inspect line items before aggregation and raise
// error/warning issues
// Red line: issues are data, never exceptions; warnings never block
// ==========================================

use crate::domain::types::{ValidationSeverity, VoltageType};
use crate::domain::LineItem;
use serde::{Deserialize, Serialize};

// ==========================================
// ValidationIssue - one finding against one line item
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub line_item_id: i64,
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

/// Validate line items for a voltage table before running calculations.
///
/// Issues come back in input item order. An empty list means valid.
pub fn validate_line_items(line_items: &[LineItem], voltage_type: VoltageType) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let three_phase = voltage_type.is_three_phase();

    for item in line_items {
        // Quantity must be positive
        if item.qty <= 0 {
            issues.push(ValidationIssue {
                line_item_id: item.id,
                field: "qty".to_string(),
                message: format!(
                    "Quantity must be greater than 0 (row: {})",
                    item.display_handle()
                ),
                severity: ValidationSeverity::Error,
            });
        }

        // Utilization is a ratio 0.0 - 1.0
        if item.utilization_pct < 0.0 || item.utilization_pct > 1.0 {
            issues.push(ValidationIssue {
                line_item_id: item.id,
                field: "utilization_pct".to_string(),
                message: format!(
                    "Utilization must be between 0% and 100% (row: {})",
                    item.display_handle()
                ),
                severity: ValidationSeverity::Error,
            });
        }

        // Three-phase tables: items should carry a phase assignment;
        // imbalance figures stay advisory without one
        if three_phase && item.phase_assignment.is_none() {
            issues.push(ValidationIssue {
                line_item_id: item.id,
                field: "phase_assignment".to_string(),
                message: format!(
                    "Phase assignment required for 3-phase table (row: {})",
                    item.display_handle()
                ),
                severity: ValidationSeverity::Warning,
            });
        }

        // Manual entries need a wattage from somewhere; the catalog side
        // is only checkable during resolution
        let has_override_wattage = matches!(item.wattage_override, Some(w) if w > 0.0);
        if item.part_id.is_none() && !has_override_wattage {
            issues.push(ValidationIssue {
                line_item_id: item.id,
                field: "wattage_override".to_string(),
                message: format!(
                    "Manual entry has no wattage specified (row: {})",
                    item.display_handle()
                ),
                severity: ValidationSeverity::Warning,
            });
        }
    }

    issues
}

/// True when any issue is an error (not just warnings). Callers must
/// withhold the "calculated" status while this holds.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues
        .iter()
        .any(|i| i.severity == ValidationSeverity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PhaseAssignment;

    fn item(id: i64) -> LineItem {
        LineItem {
            id,
            voltage_table_id: 1,
            part_id: Some(1),
            manual_part_number: Some(format!("P-{}", id)),
            description: None,
            qty: 1,
            utilization_pct: 1.0,
            amperage_override: None,
            wattage_override: None,
            heat_dissipation_override: None,
            power_group: None,
            phase_assignment: Some(PhaseAssignment::L1),
            sort_order: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_clean_items_produce_no_issues() {
        let items = vec![item(1), item(2)];
        let issues = validate_line_items(&items, VoltageType::Vac480Three);
        assert!(issues.is_empty());
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_bad_qty_is_error() {
        let mut it = item(1);
        it.qty = 0;
        let issues = validate_line_items(&[it], VoltageType::Dc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ValidationSeverity::Error);
        assert_eq!(issues[0].field, "qty");
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_utilization_out_of_range_is_error() {
        let mut it = item(1);
        it.utilization_pct = 1.5;
        let issues = validate_line_items(&[it], VoltageType::Dc);
        assert!(has_errors(&issues));
        assert_eq!(issues[0].field, "utilization_pct");
    }

    #[test]
    fn test_missing_phase_on_three_phase_is_warning_only() {
        let mut it = item(1);
        it.phase_assignment = None;
        let issues = validate_line_items(&[it], VoltageType::Vac480Three);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ValidationSeverity::Warning);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_missing_phase_ignored_on_single_phase() {
        let mut it = item(1);
        it.phase_assignment = None;
        let issues = validate_line_items(&[it], VoltageType::Vac120Single);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_manual_entry_without_wattage_is_warning() {
        let mut it = item(1);
        it.part_id = None;
        let issues = validate_line_items(&[it], VoltageType::Dc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ValidationSeverity::Warning);
        assert_eq!(issues[0].field, "wattage_override");

        // A positive override clears the warning; a zero override does not
        let mut ok = item(2);
        ok.part_id = None;
        ok.wattage_override = Some(25.0);
        assert!(validate_line_items(&[ok], VoltageType::Dc).is_empty());

        let mut zero = item(3);
        zero.part_id = None;
        zero.wattage_override = Some(0.0);
        assert_eq!(validate_line_items(&[zero], VoltageType::Dc).len(), 1);
    }

    #[test]
    fn test_issue_order_follows_item_order() {
        let mut a = item(1);
        a.qty = -1;
        let mut b = item(2);
        b.utilization_pct = 2.0;
        let issues = validate_line_items(&[a, b], VoltageType::Dc);
        assert_eq!(issues[0].line_item_id, 1);
        assert_eq!(issues[1].line_item_id, 2);
    }
}
