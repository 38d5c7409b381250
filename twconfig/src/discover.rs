//! Locating the config file in a project root.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

/// Conventional config file names, in lookup order.
///
/// Declarative formats come first so that a generated JSON/YAML config
/// shadows the JavaScript module it was produced from.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "tailwind.config.json",
    "tailwind.config.yaml",
    "tailwind.config.yml",
    "tailwind.config.js",
    "tailwind.config.cjs",
    "tailwind.config.mjs",
];

/// Find the config file in `root`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `root` does not exist, and
/// [`ConfigError::NoConfigFound`] if none of [`CONFIG_FILE_NAMES`] is a
/// regular file in it.
pub fn discover_config(root: &Path) -> Result<PathBuf, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::NotFound {
            path: root.to_path_buf(),
        });
    }

    for name in CONFIG_FILE_NAMES {
        let candidate = root.join(name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "found config file");
            return Ok(candidate);
        }
    }

    Err(ConfigError::NoConfigFound {
        root: root.to_path_buf(),
        candidates: CONFIG_FILE_NAMES.to_vec(),
    })
}
