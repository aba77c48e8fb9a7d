use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;

use crate::models::health_record::{format_date, parse_date, HealthRecord, NewHealthRecord};
use super::errors::RepositoryError;

const SELECT_COLUMNS: &str = "SELECT id, date, weight, systolic, diastolic FROM health_records";

/// Row as SQLite hands it back, before the date is parsed
type RawRecord = (i64, String, f64, i64, i64);

/// SQL operations on the `health_records` table.
///
/// Every function works on a connection borrowed from the caller's session.
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert a record and read it back inside one transaction.
    ///
    /// The write lock is taken before the default date is read, so dates
    /// assigned here never decrease in commit order.
    pub fn insert_record(conn: &mut Connection, record: &NewHealthRecord) -> Result<HealthRecord, RepositoryError> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let date = record.date.unwrap_or_else(Utc::now);

        tx.execute(
            "INSERT INTO health_records (date, weight, systolic, diastolic)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                format_date(&date),
                record.weight,
                record.systolic,
                record.diastolic,
            ],
        )?;

        let id = tx.last_insert_rowid();
        debug!("Inserted health record: id={}", id);

        let raw = tx.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            [id],
            read_row,
        )?;

        tx.commit()?;
        into_record(raw)
    }

    /// Newest-first page of records
    pub fn list_records(conn: &Connection, skip: usize, limit: usize) -> Result<Vec<HealthRecord>, RepositoryError> {
        debug!("Listing health records: skip={}, limit={}", skip, limit);

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY date DESC, id DESC LIMIT ?1 OFFSET ?2",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![to_sql_int(limit), to_sql_int(skip)], read_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(into_record(row?)?);
        }

        Ok(result)
    }

    /// Record with the greatest date, ties going to the highest id
    pub fn latest_record(conn: &Connection) -> Result<Option<HealthRecord>, RepositoryError> {
        let raw = conn
            .query_row(
                &format!("{} ORDER BY date DESC, id DESC LIMIT 1", SELECT_COLUMNS),
                [],
                read_row,
            )
            .optional()?;

        raw.map(into_record).transpose()
    }

    /// Number of stored records
    pub fn count_records(conn: &Connection) -> Result<usize, RepositoryError> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM health_records", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn into_record((id, date, weight, systolic, diastolic): RawRecord) -> Result<HealthRecord, RepositoryError> {
    let date = parse_date(&date)
        .map_err(|e| RepositoryError::DateParse(format!("record {} has date {:?}: {}", id, date, e)))?;

    Ok(HealthRecord {
        id,
        date,
        weight,
        systolic,
        diastolic,
    })
}

// SQLite integers are signed 64-bit
fn to_sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use crate::database::migrations::run_sqlite_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_sqlite_migrations(&conn).unwrap();
        conn
    }

    fn new_record(minutes: i64, weight: f64) -> NewHealthRecord {
        NewHealthRecord {
            date: Some(Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)),
            weight,
            systolic: 120,
            diastolic: 80,
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut conn = setup();

        let first = DatabaseStorage::insert_record(&mut conn, &new_record(0, 70.0)).unwrap();
        let second = DatabaseStorage::insert_record(&mut conn, &new_record(1, 71.0)).unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.weight, 70.0);
        assert_eq!(DatabaseStorage::count_records(&conn).unwrap(), 2);
    }

    #[test]
    fn test_list_orders_newest_first() {
        let mut conn = setup();
        // Inserted out of date order on purpose
        DatabaseStorage::insert_record(&mut conn, &new_record(10, 72.0)).unwrap();
        DatabaseStorage::insert_record(&mut conn, &new_record(0, 70.0)).unwrap();
        DatabaseStorage::insert_record(&mut conn, &new_record(5, 71.0)).unwrap();

        let records = DatabaseStorage::list_records(&conn, 0, 100).unwrap();
        let weights: Vec<f64> = records.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![72.0, 71.0, 70.0]);

        let page = DatabaseStorage::list_records(&conn, 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].weight, 71.0);

        assert!(DatabaseStorage::list_records(&conn, 3, 100).unwrap().is_empty());
    }

    #[test]
    fn test_date_ties_break_on_id() {
        let mut conn = setup();
        let a = DatabaseStorage::insert_record(&mut conn, &new_record(0, 70.0)).unwrap();
        let b = DatabaseStorage::insert_record(&mut conn, &new_record(0, 71.0)).unwrap();

        let latest = DatabaseStorage::latest_record(&conn).unwrap().unwrap();
        assert_eq!(latest.id, b.id);

        let ids: Vec<i64> = DatabaseStorage::list_records(&conn, 0, 10)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn test_missing_date_defaults_to_now() {
        let mut conn = setup();
        // Stored dates keep microseconds only
        let before = Utc::now() - Duration::milliseconds(1);

        let mut record = new_record(0, 70.0);
        record.date = None;
        let stored = DatabaseStorage::insert_record(&mut conn, &record).unwrap();

        assert!(stored.date >= before);
        assert!(stored.date <= Utc::now());
    }

    #[test]
    fn test_latest_on_empty_table() {
        let conn = setup();
        assert!(DatabaseStorage::latest_record(&conn).unwrap().is_none());
    }

    #[test]
    fn test_unparsable_date_is_reported() {
        let conn = setup();
        conn.execute(
            "INSERT INTO health_records (date, weight, systolic, diastolic) VALUES ('not a date', 70.0, 120, 80)",
            [],
        )
        .unwrap();

        let err = DatabaseStorage::latest_record(&conn).unwrap_err();
        assert!(matches!(err, RepositoryError::DateParse(_)));
    }
}
