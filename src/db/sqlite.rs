use anyhow::{Context, Result};
use log::{debug, warn};
use rusqlite::params;

use crate::connection::Connection;
use crate::db::{Record, TableStore, UpsertReport, TABLE_NAME};
use crate::reader::RawRow;
use crate::report::Diagnostic;

pub struct Sqlite {}

impl TableStore for Sqlite {
    fn initialize(conn: &Connection) -> Result<()> {
        if let Some(parent) = conn.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        debug!("sqlite: opening {}", conn.path.display());
        let sc = conn.open()?;
        sc.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
                id INTEGER PRIMARY KEY,
                name TEXT,
                value REAL
            )"
        ))
        .with_context(|| format!("failed to create table {TABLE_NAME}"))?;
        debug!("sqlite: table {TABLE_NAME} ready");
        Ok(())
    }

    fn upsert_rows(conn: &Connection, rows: &[RawRow]) -> Result<UpsertReport> {
        let mut report = UpsertReport::default();
        let mut sc = conn.open()?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match Record::try_from(row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    let diag = Diagnostic::InvalidNumeric {
                        row: row.clone(),
                        reason,
                    };
                    warn!("{diag}");
                    report.skipped.push(diag);
                }
            }
        }

        if records.is_empty() {
            debug!("sqlite: no valid records, nothing to commit");
            return Ok(report);
        }

        let tx = sc.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT OR REPLACE INTO {TABLE_NAME} (id, name, value) VALUES (?1, ?2, ?3)"
            ))?;
            for record in &records {
                stmt.execute(params![record.id, record.name, record.value])
                    .with_context(|| format!("failed to upsert id {}", record.id))?;
            }
        }
        tx.commit().context("failed to commit upsert")?;

        report.written = records.len();
        report.committed = true;
        debug!("sqlite: committed {} record(s)", report.written);
        Ok(report)
    }

    fn fetch_records(conn: &Connection) -> Result<Vec<Record>> {
        let sc = conn.open()?;
        let mut stmt = sc.prepare(&format!(
            "SELECT id, name, value FROM {TABLE_NAME} ORDER BY id"
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(Record {
                id: row.get(0)?,
                name: row.get(1)?,
                value: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for r in rows {
            records.push(r?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ConversionError;

    fn setup() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::new(dir.path().join("test.db"));
        Sqlite::initialize(&conn).unwrap();
        (dir, conn)
    }

    fn sample_rows() -> Vec<RawRow> {
        vec![
            RawRow::new("1", "Alpha", "10.2"),
            RawRow::new("2", "Beta", "20.5"),
            RawRow::new("3", "Gamma", "30.7"),
        ]
    }

    fn record(id: i64, name: &str, value: f64) -> Record {
        Record {
            id,
            name: name.into(),
            value,
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, conn) = setup();
        Sqlite::upsert_rows(&conn, &sample_rows()).unwrap();
        Sqlite::initialize(&conn).unwrap();
        assert_eq!(Sqlite::fetch_records(&conn).unwrap().len(), 3);
    }

    #[test]
    fn test_initialize_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::new(dir.path().join("nested/deeper/test.db"));
        Sqlite::initialize(&conn).unwrap();
        assert!(conn.path.is_file());
    }

    #[test]
    fn test_initialize_leaves_existing_schema_alone() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::new(dir.path().join("test.db"));
        conn.open()
            .unwrap()
            .execute_batch(
                "CREATE TABLE my_table (id INTEGER PRIMARY KEY, name TEXT, value REAL, note TEXT)",
            )
            .unwrap();

        Sqlite::initialize(&conn).unwrap();

        let sc = conn.open().unwrap();
        let mut stmt = sc.prepare("PRAGMA table_info(my_table)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .map(|c| c.unwrap())
            .collect();
        assert_eq!(columns, vec!["id", "name", "value", "note"]);
    }

    #[test]
    fn test_upsert_inserts_rows() {
        let (_dir, conn) = setup();
        let report = Sqlite::upsert_rows(&conn, &sample_rows()).unwrap();
        assert_eq!(report.written, 3);
        assert!(report.committed);
        assert!(report.skipped.is_empty());
        assert_eq!(
            Sqlite::fetch_records(&conn).unwrap(),
            vec![
                record(1, "Alpha", 10.2),
                record(2, "Beta", 20.5),
                record(3, "Gamma", 30.7),
            ]
        );
    }

    #[test]
    fn test_upsert_twice_is_idempotent() {
        let (_dir, conn) = setup();
        Sqlite::upsert_rows(&conn, &sample_rows()).unwrap();
        let once = Sqlite::fetch_records(&conn).unwrap();
        Sqlite::upsert_rows(&conn, &sample_rows()).unwrap();
        assert_eq!(Sqlite::fetch_records(&conn).unwrap(), once);
    }

    #[test]
    fn test_upsert_replaces_whole_record() {
        let (_dir, conn) = setup();
        Sqlite::upsert_rows(&conn, &sample_rows()).unwrap();
        Sqlite::upsert_rows(&conn, &[RawRow::new("2", "Beta2", "99.9")]).unwrap();

        let stored = Sqlite::fetch_records(&conn).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[1], record(2, "Beta2", 99.9));
    }

    #[test]
    fn test_later_duplicate_in_batch_wins() {
        let (_dir, conn) = setup();
        let rows = vec![RawRow::new("9", "first", "1.0"), RawRow::new("9", "second", "2.0")];
        let report = Sqlite::upsert_rows(&conn, &rows).unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(Sqlite::fetch_records(&conn).unwrap(), vec![record(9, "second", 2.0)]);
    }

    #[test]
    fn test_invalid_numeric_rows_are_skipped() {
        let (_dir, conn) = setup();
        let rows = vec![
            RawRow::new("x", "Name", "1.5"),
            RawRow::new("1", "Name", "y"),
            RawRow::new("2", "Kept", "2.5"),
        ];
        let report = Sqlite::upsert_rows(&conn, &rows).unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(
            report.skipped,
            vec![
                Diagnostic::InvalidNumeric {
                    row: rows[0].clone(),
                    reason: ConversionError::InvalidId("x".into()),
                },
                Diagnostic::InvalidNumeric {
                    row: rows[1].clone(),
                    reason: ConversionError::InvalidValue("y".into()),
                },
            ]
        );
        assert_eq!(Sqlite::fetch_records(&conn).unwrap(), vec![record(2, "Kept", 2.5)]);
    }

    #[test]
    fn test_nan_value_is_skipped_and_table_stays_readable() {
        let (_dir, conn) = setup();
        let rows = vec![RawRow::new("1", "A", "nan"), RawRow::new("2", "B", "2.0")];
        let report = Sqlite::upsert_rows(&conn, &rows).unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(
            report.skipped,
            vec![Diagnostic::InvalidNumeric {
                row: rows[0].clone(),
                reason: ConversionError::InvalidValue("nan".into()),
            }]
        );
        assert_eq!(Sqlite::fetch_records(&conn).unwrap(), vec![record(2, "B", 2.0)]);
    }

    #[test]
    fn test_no_valid_rows_commits_nothing() {
        let (_dir, conn) = setup();
        let report = Sqlite::upsert_rows(&conn, &[RawRow::new("x", "Name", "1.5")]).unwrap();
        assert!(!report.committed);
        assert_eq!(report.written, 0);
        assert_eq!(report.skipped.len(), 1);
        assert!(Sqlite::fetch_records(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_without_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::new(dir.path().join("bare.db"));
        assert!(Sqlite::upsert_rows(&conn, &sample_rows()).is_err());
    }
}
