use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};

const LEVEL_ENV: &str = "CSVSYNC_LOG";

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Writes timestamped lines to stdout and, optionally, appends them to a file.
struct Logger {
    file: Option<Mutex<File>>,
    level: LevelFilter,
}

fn level_from_env() -> LevelFilter {
    parse_level(&std::env::var(LEVEL_ENV).unwrap_or_default())
}

fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install the process-wide logger. Calling it again is a no-op.
pub fn init(log_file: Option<&Path>) -> std::io::Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let f = OpenOptions::new().create(true).append(true).open(path)?;
            Some(Mutex::new(f))
        }
        None => None,
    };

    let level = level_from_env();
    let logger = LOGGER.get_or_init(|| Logger { file, level });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
    if let Some(path) = log_file {
        log::debug!("logging to {}", path.display());
    }
    Ok(())
}

fn now_ts() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

fn format_line(ts: &str, level: Level, msg: &std::fmt::Arguments) -> String {
    format!("[{ts}] [{level}] {msg}")
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(&now_ts(), record.level(), record.args());

        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{line}");

        if let Some(m) = &self.file {
            if let Ok(mut f) = m.lock() {
                let _ = writeln!(f, "{line}");
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(m) = &self.file {
            if let Ok(mut f) = m.lock() {
                let _ = f.flush();
            }
        }
    }
}
