// ==========================================
// Panel Load Engineering - core library
// ==========================================
// Electrical load calculation for panel/enclosure design
// Stack: Rust + SQLite
// Positioning: engineering decision support (operator keeps final say)
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer: entities and types
pub mod domain;

// Repository layer: data access
pub mod repository;

// Engine layer: business rules
pub mod engine;

// Import layer: external data
pub mod importer;

// Package I/O layer: portable job project documents
pub mod package_io;

// Configuration layer
pub mod config;

// Database infrastructure (connection init, unified PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-export core types
// ==========================================

// Domain types
pub use domain::types::{
    ImportStep, MatchState, PhaseAssignment, ValidationSeverity, VoltageType,
};

// Domain entities
pub use domain::{
    BomItem, BomLocation, BomPackage, CatalogPart, ElectricalVariant, JobProject, LineItem,
    LoadProject, NewBomItem, NewLineItem, VoltageTable,
};

// Engines
pub use engine::{
    calculate_table_results, match_all_rows, resolve_line_item, validate_line_items,
    CatalogLookup, CatalogSnapshot, ElectricalSpecSource, ManualEntry, MatchResult, PhaseLoading,
    ResolvedLineItem, TableCalculationResult, ValidationIssue,
};

// Import pipeline
pub use importer::{ImportError, ImportSession, PreviewLineItem};

// Package I/O
pub use package_io::{
    export_job_project, import_job_project, PackageIoError, ProjectPackageFile,
};

// Configuration
pub use config::MatchingConfig;

// ==========================================
// Constants
// ==========================================

// System version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Panel Load Engineering";

// ==========================================
// Compile-time visibility check
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
