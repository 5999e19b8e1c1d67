// ==========================================
// Panel Load Engineering - project package document schema
// ==========================================
// Responsibility: the portable, versioned job-project document and its
// schema validator
// Red line: locations and items reference their parents by name string,
// never by database id (ids are not portable across databases)
// ==========================================

use crate::repository::error::RepositoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Fixed format tag; a document with any other tag is rejected.
pub const PACKAGE_FORMAT: &str = "ats-chd-project-package";
/// Current schema version.
pub const PACKAGE_VERSION: &str = "1";

/// Project package module error type
#[derive(Error, Debug)]
pub enum PackageIoError {
    #[error("invalid package document: {0}")]
    InvalidDocument(String),

    #[error("job project not found: id={0}")]
    JobProjectNotFound(i64),

    #[error("could not find a free name for '{0}' within the attempt limit")]
    NameCollisionExhausted(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias
pub type PackageIoResult<T> = Result<T, PackageIoError>;

// ==========================================
// Document sections
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub exported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProjectEntry {
    pub project_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageEntry {
    pub package_name: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: String,
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    /// Owning package, by name
    pub package_name: String,
    pub name: String,
    pub export_name: Option<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Owning package, by name
    pub package_name: String,
    /// Owning location, by name
    pub location_name: String,
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

// ==========================================
// ProjectPackageFile - the full document
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPackageFile {
    pub format: String,
    pub version: String,
    pub metadata: PackageMetadata,
    pub job_project: JobProjectEntry,
    pub packages: Vec<PackageEntry>,
    pub locations: Vec<LocationEntry>,
    pub items: Vec<ItemEntry>,
}

impl ProjectPackageFile {
    /// Schema validation, applied at both the export and import
    /// boundaries. A document failing here must never reach a write.
    pub fn validate(&self) -> PackageIoResult<()> {
        if self.format != PACKAGE_FORMAT {
            return Err(PackageIoError::InvalidDocument(format!(
                "unexpected format tag: {}",
                self.format
            )));
        }
        if self.version != PACKAGE_VERSION {
            return Err(PackageIoError::InvalidDocument(format!(
                "unsupported schema version: {}",
                self.version
            )));
        }
        if self.job_project.project_number.trim().is_empty() {
            return Err(PackageIoError::InvalidDocument(
                "job project number is empty".to_string(),
            ));
        }

        let mut package_names = HashSet::new();
        for package in &self.packages {
            if package.package_name.trim().is_empty() {
                return Err(PackageIoError::InvalidDocument(
                    "package with empty name".to_string(),
                ));
            }
            if !package_names.insert(package.package_name.as_str()) {
                return Err(PackageIoError::InvalidDocument(format!(
                    "duplicate package name: {}",
                    package.package_name
                )));
            }
        }

        let mut location_keys = HashSet::new();
        for location in &self.locations {
            if !package_names.contains(location.package_name.as_str()) {
                return Err(PackageIoError::InvalidDocument(format!(
                    "location '{}' references unknown package '{}'",
                    location.name, location.package_name
                )));
            }
            location_keys.insert((location.package_name.as_str(), location.name.as_str()));
        }

        for item in &self.items {
            if !location_keys.contains(&(item.package_name.as_str(), item.location_name.as_str()))
            {
                return Err(PackageIoError::InvalidDocument(format!(
                    "item '{}' references unknown location '{}' in package '{}'",
                    item.part_number, item.location_name, item.package_name
                )));
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> PackageIoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PackageIoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
