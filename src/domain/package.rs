// ==========================================
// Panel Load Engineering - BOM package entities
// ==========================================
// Responsibility: job projects and their packages, locations and items
// (the entity graph moved by project package export/import)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// JobProject - top-level job identity
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProject {
    pub id: i64,
    pub project_number: String,
    pub created_at: Option<DateTime<Utc>>,
}

// ==========================================
// BomPackage - one deliverable package within a job
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomPackage {
    pub id: i64,
    pub job_project_id: i64,
    pub package_name: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: String,
    pub metadata: Option<String>,
}

// ==========================================
// BomLocation - physical location within a package
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLocation {
    pub id: i64,
    pub package_id: i64,
    pub name: String,
    pub export_name: Option<String>,
    pub sort_order: i64,
}

// ==========================================
// BomItem - one BOM line within a package/location
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomItem {
    pub id: i64,
    pub package_id: i64,
    pub location_id: i64,
    /// Imported items reference parts by number only; part_id stays NULL
    /// because numeric ids are not portable across databases
    pub part_id: Option<i64>,
    pub part_number: String,
    pub description: String,
    pub secondary_description: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: Option<f64>,
    pub manufacturer: Option<String>,
    pub supplier: Option<String>,
    pub category: Option<String>,
    pub reference_designator: Option<String>,
    pub is_spare: bool,
    pub metadata: Option<String>,
    pub sort_order: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ==========================================
// NewBomItem - bulk insert payload
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBomItem {
    pub package_id: i64,
    pub location_id: i64,
    pub part_id: Option<i64>,
    pub part_number: String,
    pub description: String,
    pub secondary_description: Option<String>,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: Option<f64>,
    pub manufacturer: Option<String>,
    pub supplier: Option<String>,
    pub category: Option<String>,
    pub reference_designator: Option<String>,
    pub is_spare: bool,
    pub metadata: Option<String>,
    pub sort_order: i64,
}
