//! Externalized configuration for the store target and logging.
//!
//! # Responsibility
//! - Resolve settings from three layers, lowest priority first:
//!   compiled defaults, an optional TOML file, `STAFFDESK_*` env variables.
//! - Keep connection targets out of source code.
//!
//! # Invariants
//! - Blank environment values are ignored, never treated as "unset to empty".
//! - A database path of `:memory:` selects an in-memory store.
//! - Resolution is pure over the supplied env lookup; only `load*` reads the
//!   process environment.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "STAFFDESK_CONFIG";
pub const DB_PATH_ENV: &str = "STAFFDESK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "STAFFDESK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "STAFFDESK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "staffdesk.sqlite3";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const IN_MEMORY_TARGET: &str = ":memory:";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// Where the backing store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    File(PathBuf),
    InMemory,
}

impl DatabaseTarget {
    fn from_setting(value: &str) -> Self {
        if value == IN_MEMORY_TARGET {
            Self::InMemory
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// `file` or `memory`; safe to log where the path itself is not.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::InMemory => "memory",
        }
    }
}

impl Display for DatabaseTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::InMemory => f.write_str(IN_MEMORY_TARGET),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: DatabaseTarget::File(path.into()),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            target: DatabaseTarget::InMemory,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::file(DEFAULT_DB_FILE_NAME)
    }
}

/// Logging settings. Without `dir`, file logging stays off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    database: Option<FileDatabase>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileDatabase {
    path: Option<String>,
    busy_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLogging {
    level: Option<String>,
    dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration using the process environment; the file comes
    /// from `STAFFDESK_CONFIG` when set.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration with an explicit file path taking precedence over
    /// `STAFFDESK_CONFIG`.
    pub fn load_from(config_path: Option<&Path>) -> ConfigResult<Self> {
        Self::resolve(config_path, |name| std::env::var(name).ok())
    }

    /// Resolves all layers against a caller-supplied env lookup.
    pub fn resolve(
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let lookup = |name: &str| {
            env(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        let file_path = config_path
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from));
        if let Some(path) = file_path {
            config.apply_file(read_file_config(&path)?);
        }

        if let Some(path) = lookup(DB_PATH_ENV) {
            config.database.target = DatabaseTarget::from_setting(&path);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.logging.level = level;
        }
        if let Some(dir) = lookup(LOG_DIR_ENV) {
            config.logging.dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(database) = file.database {
            if let Some(path) = database.path.filter(|path| !path.trim().is_empty()) {
                self.database.target = DatabaseTarget::from_setting(path.trim());
            }
            if let Some(timeout_ms) = database.busy_timeout_ms {
                self.database.busy_timeout = Duration::from_millis(timeout_ms);
            }
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if logging.dir.is_some() {
                self.logging.dir = logging.dir;
            }
        }
    }
}

fn read_file_config(path: &Path) -> ConfigResult<FileConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
