use std::path::Path;

use anyhow::{Context, Result};
use log::info;

pub const SAMPLE_HEADER: [&str; 3] = ["id", "name", "value"];

pub const SAMPLE_ROWS: [[&str; 3]; 3] = [
    ["1", "Alpha", "10.2"],
    ["2", "Beta", "20.5"],
    ["3", "Gamma", "30.7"],
];

/// Make sure an input file exists at `path`, writing the sample data if not.
/// Returns `true` when the sample was created.
pub fn ensure_sample_csv(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.is_file() {
        info!("found existing '{}'. will read it directly.", path.display());
        return Ok(false);
    }

    info!("'{}' not found. creating a sample csv file...", path.display());
    write_sample(path).with_context(|| format!("failed to write sample {}", path.display()))?;
    Ok(true)
}

fn write_sample(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    writer.write_record(SAMPLE_HEADER)?;
    for row in SAMPLE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
