// ==========================================
// Panel Load Engineering - BOM package repository
// ==========================================
// Responsibility: job_projects / packages / locations / items access
// Red line: no business logic, data access only
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::package::{BomItem, BomLocation, BomPackage, JobProject, NewBomItem};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// Data access seam for project package export/import. An async trait so
/// the importer's rollback behavior can be exercised against failing
/// implementations in tests.
#[async_trait::async_trait]
pub trait PackageRepository: Send + Sync {
    async fn create_job_project(&self, project_number: &str) -> RepositoryResult<i64>;
    async fn find_job_project(&self, id: i64) -> RepositoryResult<Option<JobProject>>;
    /// Cascades to packages, locations and items through the FKs.
    async fn delete_job_project(&self, id: i64) -> RepositoryResult<()>;

    async fn create_package(
        &self,
        job_project_id: i64,
        package_name: &str,
        name: Option<&str>,
        description: Option<&str>,
        version: &str,
        metadata: Option<&str>,
    ) -> RepositoryResult<i64>;
    async fn list_packages(&self, job_project_id: i64) -> RepositoryResult<Vec<BomPackage>>;

    async fn create_location(
        &self,
        package_id: i64,
        name: &str,
        export_name: Option<&str>,
        sort_order: i64,
    ) -> RepositoryResult<i64>;
    async fn list_locations(&self, package_id: i64) -> RepositoryResult<Vec<BomLocation>>;

    async fn bulk_insert_items(&self, items: Vec<NewBomItem>) -> RepositoryResult<usize>;
    async fn list_items(&self, package_id: i64) -> RepositoryResult<Vec<BomItem>>;
}

// ==========================================
// PackageRepositoryImpl - SQLite implementation
// ==========================================
pub struct PackageRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl PackageRepositoryImpl {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PackageRepository for PackageRepositoryImpl {
    async fn create_job_project(&self, project_number: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO bom_job_projects (project_number) VALUES (?1)",
            params![project_number],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn find_job_project(&self, id: i64) -> RepositoryResult<Option<JobProject>> {
        let conn = self.get_conn()?;
        let project = conn
            .query_row(
                "SELECT id, project_number FROM bom_job_projects WHERE id = ?1",
                params![id],
                |row| {
                    Ok(JobProject {
                        id: row.get(0)?,
                        project_number: row.get(1)?,
                        created_at: None,
                    })
                },
            )
            .optional()?;
        Ok(project)
    }

    async fn delete_job_project(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM bom_job_projects WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn create_package(
        &self,
        job_project_id: i64,
        package_name: &str,
        name: Option<&str>,
        description: Option<&str>,
        version: &str,
        metadata: Option<&str>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO bom_packages (job_project_id, package_name, name, description, version, metadata)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![job_project_id, package_name, name, description, version, metadata],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn list_packages(&self, job_project_id: i64) -> RepositoryResult<Vec<BomPackage>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, job_project_id, package_name, name, description, version, metadata
            FROM bom_packages
            WHERE job_project_id = ?1
            ORDER BY id
            "#,
        )?;
        let packages = stmt
            .query_map(params![job_project_id], |row| {
                Ok(BomPackage {
                    id: row.get(0)?,
                    job_project_id: row.get(1)?,
                    package_name: row.get(2)?,
                    name: row.get(3)?,
                    description: row.get(4)?,
                    version: row.get(5)?,
                    metadata: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(packages)
    }

    async fn create_location(
        &self,
        package_id: i64,
        name: &str,
        export_name: Option<&str>,
        sort_order: i64,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO bom_locations (package_id, name, export_name, sort_order)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![package_id, name, export_name, sort_order],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn list_locations(&self, package_id: i64) -> RepositoryResult<Vec<BomLocation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, package_id, name, export_name, sort_order
            FROM bom_locations
            WHERE package_id = ?1
            ORDER BY sort_order, id
            "#,
        )?;
        let locations = stmt
            .query_map(params![package_id], |row| {
                Ok(BomLocation {
                    id: row.get(0)?,
                    package_id: row.get(1)?,
                    name: row.get(2)?,
                    export_name: row.get(3)?,
                    sort_order: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(locations)
    }

    async fn bulk_insert_items(&self, items: Vec<NewBomItem>) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for item in &items {
            tx.execute(
                r#"
                INSERT INTO bom_items (
                    package_id, location_id, part_id, part_number, description,
                    secondary_description, quantity, unit, unit_price, manufacturer,
                    supplier, category, reference_designator, is_spare, metadata, sort_order
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
                params![
                    item.package_id,
                    item.location_id,
                    item.part_id,
                    item.part_number,
                    item.description,
                    item.secondary_description,
                    item.quantity,
                    item.unit,
                    item.unit_price,
                    item.manufacturer,
                    item.supplier,
                    item.category,
                    item.reference_designator,
                    item.is_spare,
                    item.metadata,
                    item.sort_order,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    async fn list_items(&self, package_id: i64) -> RepositoryResult<Vec<BomItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, package_id, location_id, part_id, part_number, description,
                   secondary_description, quantity, unit, unit_price, manufacturer,
                   supplier, category, reference_designator, is_spare, metadata, sort_order
            FROM bom_items
            WHERE package_id = ?1
            ORDER BY sort_order, id
            "#,
        )?;
        let items = stmt
            .query_map(params![package_id], |row| {
                Ok(BomItem {
                    id: row.get(0)?,
                    package_id: row.get(1)?,
                    location_id: row.get(2)?,
                    part_id: row.get(3)?,
                    part_number: row.get(4)?,
                    description: row.get(5)?,
                    secondary_description: row.get(6)?,
                    quantity: row.get(7)?,
                    unit: row.get(8)?,
                    unit_price: row.get(9)?,
                    manufacturer: row.get(10)?,
                    supplier: row.get(11)?,
                    category: row.get(12)?,
                    reference_designator: row.get(13)?,
                    is_spare: row.get(14)?,
                    metadata: row.get(15)?,
                    sort_order: row.get(16)?,
                    created_at: None,
                    updated_at: None,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}
