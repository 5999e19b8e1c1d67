// ==========================================
// Panel Load Engineering - load calc repository
// ==========================================
// Responsibility: load_projects / voltage_tables / line_items access
// Red line: no business logic, data access only
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::line_item::{LineItem, NewLineItem, VoltageTable};
use crate::domain::types::{PhaseAssignment, VoltageType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Seam the import pipeline commits through, mockable in tests.
#[async_trait::async_trait]
pub trait LineItemSink: Send + Sync {
    /// Insert all payloads in one transaction; rows keep their
    /// sort_order. Returns the inserted count.
    async fn bulk_insert_line_items(&self, items: Vec<NewLineItem>) -> RepositoryResult<usize>;
}

// ==========================================
// LineItemRepository - voltage tables and their line items
// ==========================================
pub struct LineItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LineItemRepository {
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

    pub fn create_project(&self, name: &str, description: Option<&str>) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO load_projects (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn create_voltage_table(
        &self,
        project_id: i64,
        location_id: Option<i64>,
        voltage_type: VoltageType,
        sort_order: i64,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO voltage_tables (project_id, location_id, voltage_type, is_locked, sort_order)
            VALUES (?1, ?2, ?3, 0, ?4)
            "#,
            params![project_id, location_id, voltage_type.as_str(), sort_order],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_voltage_table(&self, table_id: i64) -> RepositoryResult<Option<VoltageTable>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, project_id, location_id, voltage_type, is_locked, sort_order
            FROM voltage_tables
            WHERE id = ?1
            "#,
        )?;

        let row = stmt
            .query_row(params![table_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, bool>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })
            .optional()?;

        row.map(|(id, project_id, location_id, vt, is_locked, sort_order)| {
            let voltage_type =
                VoltageType::from_str(&vt).map_err(|e| RepositoryError::FieldValueError {
                    field: "voltage_type".to_string(),
                    message: e,
                })?;
            Ok(VoltageTable {
                id,
                project_id,
                location_id,
                voltage_type,
                is_locked,
                sort_order,
                created_at: None,
                updated_at: None,
            })
        })
        .transpose()
    }

    /// Locked tables reject structural edits in the consuming layer; the
    /// core only stores the flag.
    pub fn set_locked(&self, table_id: i64, locked: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE voltage_tables SET is_locked = ?2 WHERE id = ?1",
            params![table_id, locked],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "VoltageTable".to_string(),
                id: table_id.to_string(),
            });
        }
        Ok(())
    }

    /// Cascades to the table's line items through the FK.
    pub fn delete_voltage_table(&self, table_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM voltage_tables WHERE id = ?1", params![table_id])?;
        Ok(())
    }

    pub fn list_line_items(&self, table_id: i64) -> RepositoryResult<Vec<LineItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, voltage_table_id, part_id, manual_part_number, description,
                   qty, utilization_pct, amperage_override, wattage_override,
                   heat_dissipation_override, power_group, phase_assignment, sort_order
            FROM line_items
            WHERE voltage_table_id = ?1
            ORDER BY sort_order, id
            "#,
        )?;

        let rows = stmt
            .query_map(params![table_id], Self::map_line_item_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().collect()
    }

    fn map_line_item_row(row: &Row<'_>) -> rusqlite::Result<RepositoryResult<LineItem>> {
        let phase_raw: Option<String> = row.get(11)?;
        let phase = match phase_raw {
            None => Ok(None),
            Some(s) => PhaseAssignment::from_str(&s).map(Some).map_err(|e| {
                RepositoryError::FieldValueError {
                    field: "phase_assignment".to_string(),
                    message: e,
                }
            }),
        };

        let item = LineItem {
            id: row.get(0)?,
            voltage_table_id: row.get(1)?,
            part_id: row.get(2)?,
            manual_part_number: row.get(3)?,
            description: row.get(4)?,
            qty: row.get(5)?,
            utilization_pct: row.get(6)?,
            amperage_override: row.get(7)?,
            wattage_override: row.get(8)?,
            heat_dissipation_override: row.get(9)?,
            power_group: row.get(10)?,
            phase_assignment: None,
            sort_order: row.get(12)?,
            created_at: None,
            updated_at: None,
        };

        Ok(phase.map(|p| LineItem {
            phase_assignment: p,
            ..item
        }))
    }

    pub fn insert_line_item(&self, item: &NewLineItem) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Self::insert_on(&conn, item)?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_on(conn: &Connection, item: &NewLineItem) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO line_items (
                voltage_table_id, part_id, manual_part_number, description,
                qty, utilization_pct, amperage_override, wattage_override,
                heat_dissipation_override, power_group, phase_assignment, sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                item.voltage_table_id,
                item.part_id,
                item.manual_part_number,
                item.description,
                item.qty,
                item.utilization_pct,
                item.amperage_override,
                item.wattage_override,
                item.heat_dissipation_override,
                item.power_group,
                item.phase_assignment.map(|p| p.as_str()),
                item.sort_order,
            ],
        )?;
        Ok(())
    }

    /// Override edits and phase/grouping changes for one line item.
    pub fn update_line_item(&self, item: &LineItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE line_items SET
                part_id = ?2, manual_part_number = ?3, description = ?4,
                qty = ?5, utilization_pct = ?6, amperage_override = ?7,
                wattage_override = ?8, heat_dissipation_override = ?9,
                power_group = ?10, phase_assignment = ?11, sort_order = ?12,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                item.id,
                item.part_id,
                item.manual_part_number,
                item.description,
                item.qty,
                item.utilization_pct,
                item.amperage_override,
                item.wattage_override,
                item.heat_dissipation_override,
                item.power_group,
                item.phase_assignment.map(|p| p.as_str()),
                item.sort_order,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "LineItem".to_string(),
                id: item.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete_line_item(&self, item_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM line_items WHERE id = ?1", params![item_id])?;
        Ok(())
    }

    /// Transactional bulk insert; either all payloads land or none do.
    pub fn bulk_insert(&self, items: &[NewLineItem]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for item in items {
            Self::insert_on(&tx, item)?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl LineItemSink for LineItemRepository {
    async fn bulk_insert_line_items(&self, items: Vec<NewLineItem>) -> RepositoryResult<usize> {
        self.bulk_insert(&items)
    }
}
