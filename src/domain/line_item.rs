// ==========================================
// Panel Load Engineering - load calculation entities
// ==========================================
// Responsibility: projects, voltage tables and their line items
// ==========================================

use crate::domain::types::{PhaseAssignment, VoltageType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// LoadProject - one load calculation project
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProject {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Optional link into the BOM world (a package this panel belongs to)
    pub bom_package_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ==========================================
// VoltageTable - one voltage/phase grouping of line items
// ==========================================
// A locked table must not accept structural edits; enforcement lives in
// the consuming layer, the core only carries the flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoltageTable {
    pub id: i64,
    pub project_id: i64,
    pub location_id: Option<i64>,
    pub voltage_type: VoltageType,
    pub is_locked: bool,
    pub sort_order: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ==========================================
// LineItem - N units of a part or manual entry
// ==========================================
// At least one of part_id / manual_part_number should be present for a
// meaningful item; resolution tolerates either being absent and yields a
// zero electrical contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub voltage_table_id: i64,
    pub part_id: Option<i64>,
    pub manual_part_number: Option<String>,
    pub description: Option<String>,
    pub qty: i64,
    /// Duty-cycle/load factor, stored as a ratio 0.0 - 1.0
    pub utilization_pct: f64,
    /// Overrides replace the catalog value when Some; Some(0.0) is a
    /// valid override, distinct from "no override"
    pub amperage_override: Option<f64>,
    pub wattage_override: Option<f64>,
    pub heat_dissipation_override: Option<f64>,
    /// Free-text grouping label
    pub power_group: Option<String>,
    pub phase_assignment: Option<PhaseAssignment>,
    pub sort_order: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LineItem {
    /// A human-readable handle for validation messages: part number, then
    /// description, then the numeric id.
    pub fn display_handle(&self) -> String {
        self.manual_part_number
            .clone()
            .or_else(|| self.description.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

// ==========================================
// NewLineItem - bulk insert payload
// ==========================================
// sort_order carries the caller's row order explicitly; insertion order
// is not relied on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineItem {
    pub voltage_table_id: i64,
    pub part_id: Option<i64>,
    pub manual_part_number: Option<String>,
    pub description: Option<String>,
    pub qty: i64,
    pub utilization_pct: f64,
    pub amperage_override: Option<f64>,
    pub wattage_override: Option<f64>,
    pub heat_dissipation_override: Option<f64>,
    pub power_group: Option<String>,
    pub phase_assignment: Option<PhaseAssignment>,
    pub sort_order: i64,
}
