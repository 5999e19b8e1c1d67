// ==========================================
// Panel Load Engineering - parts catalog entities
// ==========================================
// Responsibility: manufacturer part references and their electrical
// variants, one variant per (part, voltage type)
// ==========================================

use crate::domain::types::VoltageType;
use serde::{Deserialize, Serialize};

// ==========================================
// CatalogPart - manufacturer + part number reference
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPart {
    pub id: i64,
    pub part_number: String,
    pub manufacturer_name: String,
    pub description: Option<String>,
}

// ==========================================
// ElectricalVariant - ratings for one voltage type
// ==========================================
// Invariant: at most one variant per (part_id, voltage_type); the
// database enforces it with a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricalVariant {
    pub id: i64,
    pub part_id: i64,
    pub voltage_type: VoltageType,
    pub amperage: Option<f64>,
    pub wattage: Option<f64>,
    pub heat_dissipation_btu: Option<f64>,
    /// Default duty-cycle suggested for new line items of this variant
    pub default_utilization_pct: Option<f64>,
}
