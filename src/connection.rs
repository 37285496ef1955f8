use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection as SqliteConn;

/// Location of the SQLite database a run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub path: PathBuf,
}

impl Connection {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open (or create) the database file. The handle closes when dropped.
    pub fn open(&self) -> Result<SqliteConn> {
        SqliteConn::open(&self.path)
            .with_context(|| format!("failed to open database {}", self.path.display()))
    }
}
