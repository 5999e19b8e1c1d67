// ==========================================
// Test helpers
// ==========================================
// Responsibility: temporary database setup, schema init and fixture
// seeding shared by the integration tests
// ==========================================

use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// Create a temporary test database and initialize the schema.
///
/// Returns the temp file (keep it alive for the test's duration) and
/// the database path.
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

fn init_schema(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS manufacturers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS parts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            part_number TEXT NOT NULL,
            manufacturer_id INTEGER NOT NULL REFERENCES manufacturers(id),
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS part_electrical (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            part_id INTEGER NOT NULL REFERENCES parts(id) ON DELETE CASCADE,
            voltage_type TEXT NOT NULL,
            amperage REAL,
            wattage REAL,
            heat_dissipation_btu REAL,
            default_utilization_pct REAL,
            UNIQUE(part_id, voltage_type)
        );

        CREATE TABLE IF NOT EXISTS load_projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS voltage_tables (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES load_projects(id) ON DELETE CASCADE,
            location_id INTEGER,
            voltage_type TEXT NOT NULL,
            is_locked INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS line_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            voltage_table_id INTEGER NOT NULL REFERENCES voltage_tables(id) ON DELETE CASCADE,
            part_id INTEGER REFERENCES parts(id),
            manual_part_number TEXT,
            description TEXT,
            qty INTEGER NOT NULL DEFAULT 1,
            utilization_pct REAL NOT NULL DEFAULT 1.0,
            amperage_override REAL,
            wattage_override REAL,
            heat_dissipation_override REAL,
            power_group TEXT,
            phase_assignment TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS bom_job_projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_number TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS bom_packages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            job_project_id INTEGER NOT NULL REFERENCES bom_job_projects(id) ON DELETE CASCADE,
            package_name TEXT NOT NULL,
            name TEXT,
            description TEXT,
            version TEXT NOT NULL DEFAULT '1',
            metadata TEXT,
            UNIQUE(job_project_id, package_name)
        );

        CREATE TABLE IF NOT EXISTS bom_locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            package_id INTEGER NOT NULL REFERENCES bom_packages(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            export_name TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            UNIQUE(package_id, name)
        );

        CREATE TABLE IF NOT EXISTS bom_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            package_id INTEGER NOT NULL REFERENCES bom_packages(id) ON DELETE CASCADE,
            location_id INTEGER NOT NULL REFERENCES bom_locations(id) ON DELETE CASCADE,
            part_id INTEGER,
            part_number TEXT NOT NULL,
            description TEXT NOT NULL,
            secondary_description TEXT,
            quantity REAL NOT NULL DEFAULT 1,
            unit TEXT NOT NULL DEFAULT 'EA',
            unit_price REAL,
            manufacturer TEXT,
            supplier TEXT,
            category TEXT,
            reference_designator TEXT,
            is_spare INTEGER NOT NULL DEFAULT 0,
            metadata TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    Ok(())
}

/// Row count for one table; used to assert rollback left nothing behind.
#[allow(dead_code)]
pub fn count_rows(db_path: &str, table: &str) -> Result<i64, Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
