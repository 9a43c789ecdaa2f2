//! Runtime configuration
//!
//! Resolved from environment variables, then optionally overridden by
//! command-line flags. Nothing here is required; every value has a default.
//!
//! | Variable                    | Default                           |
//! |-----------------------------|-----------------------------------|
//! | `QUADRANT_DATA_DIR`         | `<platform data dir>/quadrant-advisor` |
//! | `QUADRANT_CATALOG_DB`       | `<data dir>/catalog.db`           |
//! | `QUADRANT_PORT`             | `3200`                            |
//! | `QUADRANT_SUGGESTION_LIMIT` | `8` (clamped to 1..=8)            |

use crate::suggest::MAX_SUGGESTIONS;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3200;
const APP_DIR: &str = "quadrant-advisor";
const CATALOG_FILE: &str = "catalog.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Content store path; only consulted when the file exists
    pub catalog_db: PathBuf,
    pub port: u16,
    pub suggestion_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn default_data_dir() -> PathBuf {
    // XDG data dir on Linux, ~/Library/Application Support on macOS
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup; unparseable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("QUADRANT_DATA_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let catalog_db = lookup("QUADRANT_CATALOG_DB")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(CATALOG_FILE));

        let port = match lookup("QUADRANT_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring invalid QUADRANT_PORT");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let suggestion_limit = lookup("QUADRANT_SUGGESTION_LIMIT")
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(MAX_SUGGESTIONS)
            .clamp(1, MAX_SUGGESTIONS);

        Self {
            data_dir,
            catalog_db,
            port,
            suggestion_limit,
        }
    }

    /// Apply `--port=N` and `--catalog=PATH` flags
    pub fn with_args(mut self, args: &[String]) -> Self {
        for arg in args {
            if let Some(port) = arg.strip_prefix("--port=") {
                match port.parse() {
                    Ok(p) => self.port = p,
                    Err(_) => tracing::warn!(value = %port, "Ignoring invalid --port"),
                }
            } else if let Some(path) = arg.strip_prefix("--catalog=") {
                self.catalog_db = PathBuf::from(path);
            }
        }
        self
    }

    /// Content store path when it exists on disk
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_db
            .exists()
            .then_some(self.catalog_db.as_path())
    }
}
