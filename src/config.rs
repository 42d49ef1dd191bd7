use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "tasks.json";
pub const DEFAULT_LOG_FILE: &str = "tasklist.log";

/// Where the application keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    /// Only written to when `RUST_LOG` is set.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Same file names, rooted at `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data_file: dir.join(DEFAULT_DATA_FILE),
            log_file: dir.join(DEFAULT_LOG_FILE),
        }
    }
}
