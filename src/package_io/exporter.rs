// ==========================================
// Panel Load Engineering - project package export
// ==========================================
// Responsibility: walk a job project's packages -> locations -> items
// and flatten them into a validated, portable document
// ==========================================

use crate::package_io::schema::{
    ItemEntry, JobProjectEntry, LocationEntry, PackageEntry, PackageIoError, PackageIoResult,
    PackageMetadata, ProjectPackageFile, PACKAGE_FORMAT, PACKAGE_VERSION,
};
use crate::repository::package_repo::PackageRepository;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Export one job project as a portable package document. The document is
/// schema-validated before it is returned.
#[instrument(skip(repo))]
pub async fn export_job_project(
    job_project_id: i64,
    repo: &(impl PackageRepository + ?Sized),
) -> PackageIoResult<ProjectPackageFile> {
    let job_project = repo
        .find_job_project(job_project_id)
        .await?
        .ok_or(PackageIoError::JobProjectNotFound(job_project_id))?;

    let mut packages = Vec::new();
    let mut locations = Vec::new();
    let mut items = Vec::new();

    for package in repo.list_packages(job_project_id).await? {
        packages.push(PackageEntry {
            package_name: package.package_name.clone(),
            name: package.name.clone(),
            description: package.description.clone(),
            version: package.version.clone(),
            metadata: package.metadata.clone(),
        });

        let mut location_names: HashMap<i64, String> = HashMap::new();
        for location in repo.list_locations(package.id).await? {
            location_names.insert(location.id, location.name.clone());
            locations.push(LocationEntry {
                package_name: package.package_name.clone(),
                name: location.name,
                export_name: location.export_name,
                sort_order: location.sort_order,
            });
        }

        for item in repo.list_items(package.id).await? {
            let Some(location_name) = location_names.get(&item.location_id) else {
                // Orphaned row; exporting it would produce an invalid
                // document
                warn!(
                    item_id = item.id,
                    location_id = item.location_id,
                    "item references missing location, skipping"
                );
                continue;
            };
            items.push(ItemEntry {
                package_name: package.package_name.clone(),
                location_name: location_name.clone(),
                part_number: item.part_number,
                description: item.description,
                secondary_description: item.secondary_description,
                quantity: item.quantity,
                unit: item.unit,
                unit_price: item.unit_price,
                manufacturer: item.manufacturer,
                supplier: item.supplier,
                category: item.category,
                reference_designator: item.reference_designator,
                is_spare: item.is_spare,
                metadata: item.metadata,
                sort_order: item.sort_order,
            });
        }
    }

    let document = ProjectPackageFile {
        format: PACKAGE_FORMAT.to_string(),
        version: PACKAGE_VERSION.to_string(),
        metadata: PackageMetadata {
            exported_at: chrono::Utc::now(),
        },
        job_project: JobProjectEntry {
            project_number: job_project.project_number,
        },
        packages,
        locations,
        items,
    };

    document.validate()?;
    info!(
        job_project_id,
        packages = document.packages.len(),
        locations = document.locations.len(),
        items = document.items.len(),
        "job project exported"
    );
    Ok(document)
}

/// Export straight to a JSON string.
pub async fn export_job_project_json(
    job_project_id: i64,
    repo: &(impl PackageRepository + ?Sized),
) -> PackageIoResult<String> {
    let document = export_job_project(job_project_id, repo).await?;
    document.to_json()
}
