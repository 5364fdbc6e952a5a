//! Error types for driver loading and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::layout::TableError;

#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("no driver file registered for keyboard layout {0}")]
    DriverNotFound(String),
    #[error("system directory is unavailable")]
    SystemDirectory,
    #[error("failed to load keyboard driver {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
    #[error("keyboard driver {path} does not export {symbol}")]
    MissingExport { path: PathBuf, symbol: String },
    #[error("keyboard driver {0} returned no tables")]
    NullTables(PathBuf),
    #[error("keyboard driver {path} has unreadable tables: {source}")]
    BadTables {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
