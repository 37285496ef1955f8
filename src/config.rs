use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "csvsync";
const CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_CSV_PATH: &str = "sample_data.csv";
pub const DEFAULT_DB_PATH: &str = "example.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub pause_on_exit: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            pause_on_exit: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `config.yaml` in the app
    /// config dir is used when present, otherwise the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_path(path)?,
            None => match app_config_dir().map(|dir| dir.join(CONFIG_FILE)) {
                Ok(path) if path.is_file() => Self::from_path(&path)?,
                _ => Self::default(),
            },
        };
        config.expanded()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&data).with_context(|| format!("failed to parse YAML at {}", path.display()))
    }

    pub fn from_yaml(data: &[u8]) -> Result<Self> {
        // an empty document means "all defaults"
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_slice(data)?)
    }

    /// Expand `~` and environment variables in every configured path.
    pub fn expanded(self) -> Result<Self> {
        let expand = |p: &Path| {
            expand_path(p).ok_or_else(|| anyhow::anyhow!("cannot expand path {}", p.display()))
        };
        Ok(Self {
            csv_path: expand(&self.csv_path)?,
            db_path: expand(&self.db_path)?,
            log_file: self.log_file.as_deref().map(expand).transpose()?,
            ..self
        })
    }
}

/// Return the application config directory path. The directory may not exist.
pub fn app_config_dir() -> Result<PathBuf> {
    let path = if cfg!(target_os = "macos") {
        dirs_next::home_dir().map(|h| h.join(".config"))
    } else {
        dirs_next::config_dir()
    }
    .ok_or_else(|| anyhow::anyhow!("failed to find os config dir."))?;

    Ok(path.join(APP_NAME))
}

pub fn expand_path(path: &Path) -> Option<PathBuf> {
    let mut expanded_path = PathBuf::new();
    let mut path_iter = path.iter();
    if path.starts_with("~") {
        path_iter.next()?;
        expanded_path = expanded_path.join(dirs_next::home_dir()?);
    }
    for path in path_iter {
        let path = path.to_str()?;
        expanded_path = if cfg!(unix) && path.starts_with('$') {
            expanded_path.join(std::env::var(path.strip_prefix('$')?).unwrap_or_default())
        } else if cfg!(windows) && path.starts_with('%') && path.ends_with('%') {
            expanded_path
                .join(std::env::var(path.strip_prefix('%')?.strip_suffix('%')?).unwrap_or_default())
        } else {
            expanded_path.join(path)
        }
    }
    Some(expanded_path)
}
