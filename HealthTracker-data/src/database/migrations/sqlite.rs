use rusqlite::Connection;
use tracing::info;

use crate::database::DatabaseError;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    create_health_records_table(conn)?;
    create_health_records_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the health records table
fn create_health_records_table(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating health_records table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS health_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            weight REAL NOT NULL,
            systolic INTEGER NOT NULL,
            diastolic INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create health_records: {}", e)))?;

    Ok(())
}

/// Create index on date for newest-first queries
fn create_health_records_index(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating index on date");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_health_records_date
        ON health_records (date DESC)",
        [],
    )
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn test_migrations_create_table() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert!(table_names(&conn).contains(&"health_records".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO health_records (date, weight, systolic, diastolic)
             VALUES ('2026-01-01T00:00:00.000000Z', 70.0, 120, 80)",
            [],
        )
        .unwrap();

        // A second run must neither fail nor drop existing rows
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM health_records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
