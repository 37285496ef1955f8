use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Upsert the rows of a CSV file into a local SQLite table.
///
/// With no arguments, reads `sample_data.csv` (creating it if needed) and
/// writes to `example.db` in the current directory.
#[derive(Debug, Default, Parser)]
#[command(name = "csvsync", version, about)]
pub struct Cli {
    /// YAML config file (defaults to config.yaml in the app config dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Exit without waiting for a key press
    #[arg(long)]
    pub no_pause: bool,
}

impl Cli {
    /// Layer command-line overrides on top of a loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(csv) = &self.csv {
            config.csv_path = csv.clone();
        }
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if self.no_pause {
            config.pause_on_exit = false;
        }
        config
    }
}
