// ==========================================
// Panel Load Engineering - project package import
// ==========================================
// Responsibility: materialize a validated package document into a new
// job project, retrying colliding names with an "(import N)" suffix
// Red line: all-or-nothing from the caller's perspective; any failure
// after the job project exists deletes it (and everything cascaded
// under it) before the error is returned
// ==========================================

use crate::domain::package::NewBomItem;
use crate::package_io::schema::{PackageIoError, PackageIoResult, ProjectPackageFile};
use crate::repository::error::RepositoryError;
use crate::repository::package_repo::PackageRepository;
use std::collections::HashMap;
use std::future::Future;
use tracing::{info, instrument, warn};

/// Suffix attempts before the import gives up on a name.
pub const MAX_COLLISION_ATTEMPTS: u32 = 100;

/// Counts reported back after a successful import.
#[derive(Debug, Clone)]
pub struct PackageImportSummary {
    pub job_project_id: i64,
    pub project_number: String,
    pub packages: usize,
    pub locations: usize,
    pub items: usize,
}

/// Try `base`, then `"base (import 1)"`, `"base (import 2)"`, ... until
/// the create succeeds or the attempt limit is reached. Only unique
/// constraint violations trigger a retry.
async fn create_with_unique_name<F, Fut>(
    base: &str,
    mut create: F,
) -> PackageIoResult<(i64, String)>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<i64, RepositoryError>>,
{
    for attempt in 0..=MAX_COLLISION_ATTEMPTS {
        let candidate = if attempt == 0 {
            base.to_string()
        } else {
            format!("{} (import {})", base, attempt)
        };
        match create(candidate.clone()).await {
            Ok(id) => {
                if attempt > 0 {
                    info!(name = %candidate, "name collision resolved with suffix");
                }
                return Ok((id, candidate));
            }
            Err(RepositoryError::UniqueConstraintViolation(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(PackageIoError::NameCollisionExhausted(base.to_string()))
}

/// Import a package document, creating a fresh job project. Validation
/// happens before any write; any later failure rolls the job project
/// back.
#[instrument(skip_all, fields(project_number = %document.job_project.project_number))]
pub async fn import_job_project(
    document: &ProjectPackageFile,
    repo: &(impl PackageRepository + ?Sized),
) -> PackageIoResult<PackageImportSummary> {
    document.validate()?;

    let (job_project_id, project_number) =
        create_with_unique_name(&document.job_project.project_number, |name| async move {
            repo.create_job_project(&name).await
        })
        .await?;

    match build_entities(document, job_project_id, repo).await {
        Ok((packages, locations, items)) => {
            info!(
                job_project_id,
                packages, locations, items, "package import complete"
            );
            Ok(PackageImportSummary {
                job_project_id,
                project_number,
                packages,
                locations,
                items,
            })
        }
        Err(err) => {
            warn!(job_project_id, error = %err, "package import failed, rolling back");
            if let Err(delete_err) = repo.delete_job_project(job_project_id).await {
                warn!(job_project_id, error = %delete_err, "rollback delete failed");
            }
            Err(err)
        }
    }
}

/// Parse a JSON document and import it.
pub async fn import_job_project_json(
    json: &str,
    repo: &(impl PackageRepository + ?Sized),
) -> PackageIoResult<PackageImportSummary> {
    let document = ProjectPackageFile::from_json(json)?;
    import_job_project(&document, repo).await
}

async fn build_entities(
    document: &ProjectPackageFile,
    job_project_id: i64,
    repo: &(impl PackageRepository + ?Sized),
) -> PackageIoResult<(usize, usize, usize)> {
    // Original package name -> new database id
    let mut package_ids: HashMap<&str, i64> = HashMap::new();
    for package in &document.packages {
        let (package_id, _) = create_with_unique_name(&package.package_name, |name| async move {
            repo.create_package(
                job_project_id,
                &name,
                package.name.as_deref(),
                package.description.as_deref(),
                &package.version,
                package.metadata.as_deref(),
            )
            .await
        })
        .await?;
        package_ids.insert(package.package_name.as_str(), package_id);
    }

    // (original package name, location name) -> new location id
    let mut location_ids: HashMap<(&str, &str), i64> = HashMap::new();
    for location in &document.locations {
        let Some(&package_id) = package_ids.get(location.package_name.as_str()) else {
            warn!(
                location = %location.name,
                package = %location.package_name,
                "location parent not created, skipping"
            );
            continue;
        };
        let (location_id, _) = create_with_unique_name(&location.name, |name| async move {
            repo.create_location(package_id, &name, location.export_name.as_deref(), location.sort_order)
                .await
        })
        .await?;
        location_ids.insert(
            (location.package_name.as_str(), location.name.as_str()),
            location_id,
        );
    }

    // Group items by resolved package for bulk insertion
    let mut items_by_package: HashMap<i64, Vec<NewBomItem>> = HashMap::new();
    for item in &document.items {
        let key = (item.package_name.as_str(), item.location_name.as_str());
        let (Some(&package_id), Some(&location_id)) = (
            package_ids.get(item.package_name.as_str()),
            location_ids.get(&key),
        ) else {
            warn!(
                part_number = %item.part_number,
                package = %item.package_name,
                location = %item.location_name,
                "item parent not created, skipping"
            );
            continue;
        };
        items_by_package
            .entry(package_id)
            .or_default()
            .push(NewBomItem {
                package_id,
                location_id,
                // Numeric part ids are not portable; imported items carry
                // the part number only
                part_id: None,
                part_number: item.part_number.clone(),
                description: item.description.clone(),
                secondary_description: item.secondary_description.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                unit_price: item.unit_price,
                manufacturer: item.manufacturer.clone(),
                supplier: item.supplier.clone(),
                category: item.category.clone(),
                reference_designator: item.reference_designator.clone(),
                is_spare: item.is_spare,
                metadata: item.metadata.clone(),
                sort_order: item.sort_order,
            });
    }

    let mut item_count = 0;
    for (_, items) in items_by_package {
        item_count += repo.bulk_insert_items(items).await?;
    }

    Ok((package_ids.len(), location_ids.len(), item_count))
}
