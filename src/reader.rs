use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use log::{debug, trace, warn};

use crate::report::Diagnostic;

/// Number of columns in the input: id, name, value.
pub const EXPECTED_FIELDS: usize = 3;

/// A data row exactly as it appears in the file, before any conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub id: String,
    pub name: String,
    pub value: String,
}

impl RawRow {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for RawRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.id, self.name, self.value)
    }
}

/// Rows parsed from one pass over the input, plus anything worth reporting.
#[derive(Debug, Default)]
pub struct CsvRead {
    pub rows: Vec<RawRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read every three-column data row from the CSV file at `path`.
///
/// The file is reopened on each call, so the result always reflects the
/// current contents. A missing file is an error.
pub fn read_rows(path: impl AsRef<Path>) -> Result<CsvRead> {
    let path = path.as_ref();
    debug!("reading csv {}", path.display());
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_from(file).with_context(|| format!("failed to read csv {}", path.display()))
}

/// Parse rows from any reader. The first record is taken as the header.
///
/// Blank lines are dropped before the header check, so a leading blank line
/// does not take the header's place.
pub fn read_from<R: Read>(input: R) -> Result<CsvRead> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();
    let mut out = CsvRead::default();

    let Some(header) = records.next() else {
        return Ok(out);
    };
    let header = header?;
    if header.len() < EXPECTED_FIELDS {
        let diag = Diagnostic::MalformedHeader {
            fields: header.len(),
        };
        warn!("{diag}");
        out.diagnostics.push(diag);
        return Ok(out);
    }

    for record in records {
        let record = record?;
        if record.len() != EXPECTED_FIELDS {
            trace!(
                "ignoring line {} with {} field(s)",
                record.position().map_or(0, |p| p.line()),
                record.len()
            );
            continue;
        }
        out.rows.push(RawRow::new(&record[0], &record[1], &record[2]));
    }

    debug!("parsed {} row(s)", out.rows.len());
    Ok(out)
}
