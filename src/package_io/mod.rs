// ==========================================
// Panel Load Engineering - project package I/O layer
// ==========================================
// Responsibility: portable export/import of a whole job project
// (packages, locations, items) as a versioned document
// ==========================================

pub mod exporter;
pub mod importer;
pub mod schema;

// Re-export core types
pub use exporter::{export_job_project, export_job_project_json};
pub use importer::{
    import_job_project, import_job_project_json, PackageImportSummary, MAX_COLLISION_ATTEMPTS,
};
pub use schema::{
    ItemEntry, JobProjectEntry, LocationEntry, PackageEntry, PackageIoError, PackageIoResult,
    PackageMetadata, ProjectPackageFile, PACKAGE_FORMAT, PACKAGE_VERSION,
};
