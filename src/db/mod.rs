mod sqlite;

use anyhow::Result;

use crate::connection::Connection;
use crate::reader::RawRow;
use crate::report::{ConversionError, Diagnostic};

pub use sqlite::Sqlite;

/// Table every run synchronizes into.
pub const TABLE_NAME: &str = "my_table";

pub trait TableStore {
    /// Create the target table if it does not exist yet. Never alters an
    /// existing table.
    fn initialize(conn: &Connection) -> Result<()>;

    /// Convert and upsert `rows` by primary key. Rows that fail conversion
    /// are skipped and reported; everything else is committed in one
    /// transaction.
    fn upsert_rows(conn: &Connection, rows: &[RawRow]) -> Result<UpsertReport>;

    /// All stored records, ordered by id.
    fn fetch_records(conn: &Connection) -> Result<Vec<Record>>;
}

/// A typed row ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub value: f64,
}

impl TryFrom<&RawRow> for Record {
    type Error = ConversionError;

    fn try_from(row: &RawRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .trim()
            .parse::<i64>()
            .map_err(|_| ConversionError::InvalidId(row.id.clone()))?;
        let value = row
            .value
            .trim()
            .parse::<f64>()
            .ok()
            // SQLite stores NaN as NULL, so only finite values round-trip
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConversionError::InvalidValue(row.value.clone()))?;
        Ok(Record {
            id,
            name: row.name.clone(),
            value,
        })
    }
}

/// Outcome of a single writer invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertReport {
    pub written: usize,
    pub skipped: Vec<Diagnostic>,
    pub committed: bool,
}
