// ==========================================
// Panel Load Engineering - parts catalog repository
// ==========================================
// Responsibility: parts / manufacturers / part_electrical access
// Red line: no business logic, data access only
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::part::{CatalogPart, ElectricalVariant};
use crate::domain::types::VoltageType;
use crate::engine::matching::CatalogSnapshot;
use crate::engine::resolution::ElectricalSpecSource;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// PartsRepository - catalog data access
// ==========================================
pub struct PartsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PartsRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an existing connection with other repositories.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Whole-table snapshot of the catalog for the matching engine.
    ///
    /// The matching contract is full retrieval; filtering happens in
    /// memory against normalized values.
    pub fn catalog_snapshot(&self) -> RepositoryResult<CatalogSnapshot> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT p.id, p.part_number, m.name, p.description
            FROM parts p
            JOIN manufacturers m ON m.id = p.manufacturer_id
            ORDER BY p.id
            "#,
        )?;

        let parts = stmt
            .query_map([], |row| {
                Ok(CatalogPart {
                    id: row.get(0)?,
                    part_number: row.get(1)?,
                    manufacturer_name: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CatalogSnapshot::new(parts))
    }

    /// Electrical variant for one (part, voltage type) pair.
    pub fn find_variant(
        &self,
        part_id: i64,
        voltage_type: VoltageType,
    ) -> RepositoryResult<Option<ElectricalVariant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, part_id, voltage_type, amperage, wattage,
                   heat_dissipation_btu, default_utilization_pct
            FROM part_electrical
            WHERE part_id = ?1 AND voltage_type = ?2
            "#,
        )?;

        let variant = stmt
            .query_row(params![part_id, voltage_type.as_str()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                    row.get::<_, Option<f64>>(4)?,
                    row.get::<_, Option<f64>>(5)?,
                    row.get::<_, Option<f64>>(6)?,
                ))
            })
            .optional()?;

        variant
            .map(|(id, part_id, vt, amperage, wattage, heat, util)| {
                let voltage_type = VoltageType::from_str(&vt).map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "voltage_type".to_string(),
                        message: e,
                    }
                })?;
                Ok(ElectricalVariant {
                    id,
                    part_id,
                    voltage_type,
                    amperage,
                    wattage,
                    heat_dissipation_btu: heat,
                    default_utilization_pct: util,
                })
            })
            .transpose()
    }

    /// Insert a manufacturer, returning the existing id when the name is
    /// already known.
    pub fn upsert_manufacturer(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO manufacturers (name) VALUES (?1)",
            params![name],
        )?;
        let id = conn.query_row(
            "SELECT id FROM manufacturers WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn create_part(
        &self,
        part_number: &str,
        manufacturer_id: i64,
        description: Option<&str>,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO parts (part_number, manufacturer_id, description)
            VALUES (?1, ?2, ?3)
            "#,
            params![part_number, manufacturer_id, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert or replace the variant for (part, voltage type); the unique
    /// index keeps at most one per pair.
    pub fn upsert_variant(&self, variant: &ElectricalVariant) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO part_electrical (
                part_id, voltage_type, amperage, wattage,
                heat_dissipation_btu, default_utilization_pct
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                variant.part_id,
                variant.voltage_type.as_str(),
                variant.amperage,
                variant.wattage,
                variant.heat_dissipation_btu,
                variant.default_utilization_pct,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

#[async_trait::async_trait]
impl ElectricalSpecSource for PartsRepository {
    async fn variant_for(
        &self,
        part_id: i64,
        voltage_type: VoltageType,
    ) -> RepositoryResult<Option<ElectricalVariant>> {
        self.find_variant(part_id, voltage_type)
    }
}
