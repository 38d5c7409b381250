//! # twconfig
//!
//! Loader for the content-scan configuration of a utility-class CSS
//! framework: which source files are scanned for class names (`content`),
//! plus the `theme.extend` and `plugins` extension points.
//!
//! Loading is a one-shot, synchronous operation that either yields a fully
//! validated, immutable [`ContentScanConfig`] or fails with a
//! [`ConfigError`] whose [`kind`](ConfigError::kind) is `NotFound` or
//! `MalformedConfig` (or `Io` for unreadable files).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use twconfig::{ResolveOptions, load_project_config, resolve_content};
//!
//! let root = Path::new(".");
//! let (path, config) = load_project_config(root).unwrap();
//! println!("Loaded {}", path.display());
//! println!("Globs: {:?}", config.content_globs());
//!
//! let base = config.base_dir(&path, root);
//! let resolution = resolve_content(&config, &base, &ResolveOptions::default());
//! println!("Files to scan: {}", resolution.files.len());
//! println!("OK: {}", resolution.ok());
//! ```

mod config;
mod discover;
mod error;
pub mod format;
pub mod output;
mod pattern;
mod resolve;
mod schema;

pub use config::{ContentScanConfig, ContentSource, PluginRef, ThemeConfig};
pub use discover::{CONFIG_FILE_NAMES, discover_config};
pub use error::{ConfigError, ConfigErrorKind, ScanError, ScanErrorKind};
pub use format::ConfigFormat;
pub use pattern::{
    AnchoredGlob, ContentPattern, MAX_ALTERNATIVES, MAX_BRACE_DEPTH, PatternError, expand_braces,
};
pub use resolve::{ContentResolution, ResolveOptions, SKIP_DIRS, resolve_content};
pub use schema::json_schema;

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Maximum size of a config file in bytes (1 MiB).
pub const MAX_CONFIG_SIZE: u64 = 1_048_576;

/// Load and validate the config file at `path`.
///
/// The format is chosen from the file extension (see [`ConfigFormat`]).
///
/// # Errors
///
/// - [`ConfigError::NotFound`] if `path` does not exist.
/// - [`ConfigError::MalformedConfig`] if the extension is not a supported
///   format, the file is too large or not UTF-8, or its content is not a
///   valid descriptor.
/// - [`ConfigError::Io`] for any other read failure.
pub fn load_config(path: &Path) -> Result<ContentScanConfig, ConfigError> {
    let content = read_config_bounded(path, MAX_CONFIG_SIZE)?;
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        ConfigError::malformed(
            path,
            "unsupported config file extension (expected .json, .yaml, .yml, .js, .cjs or .mjs)",
        )
    })?;
    debug!(path = %path.display(), %format, bytes = content.len(), "loading config");
    load_config_str(&content, format, path)
}

/// Validate config text already in memory.
///
/// `origin` is only used to label errors.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedConfig`] if `content` does not parse as
/// `format` or is not a valid descriptor.
pub fn load_config_str(
    content: &str,
    format: ConfigFormat,
    origin: &Path,
) -> Result<ContentScanConfig, ConfigError> {
    let value = format
        .parse(content)
        .map_err(|message| ConfigError::malformed(origin, message))?;
    schema::decode(value, origin)
}

/// Discover the config file in `root` and load it.
///
/// Returns the discovered path together with the descriptor.
///
/// # Errors
///
/// Returns the discovery error (kind `NotFound`) if no config file exists,
/// otherwise any error from [`load_config`].
pub fn load_project_config(root: &Path) -> Result<(PathBuf, ContentScanConfig), ConfigError> {
    let path = discover_config(root)?;
    let config = load_config(&path)?;
    Ok((path, config))
}

/// Read a config file using a bounded streaming read, enforcing `max_size`.
///
/// Uses `Read::take` so the size check and the read are the same operation.
fn read_config_bounded(path: &Path, max_size: u64) -> Result<String, ConfigError> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_owned(),
            }
        } else {
            ConfigError::Io {
                path: path.to_owned(),
                source: e,
            }
        }
    })?;

    // Read at most max_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_size + 1)
        .read_to_end(&mut buffer)
        .map_err(|e| ConfigError::Io {
            path: path.to_owned(),
            source: e,
        })?;

    if buffer.len() as u64 > max_size {
        return Err(ConfigError::malformed(
            path,
            format!("file exceeds maximum size of {max_size} bytes"),
        ));
    }

    String::from_utf8(buffer).map_err(|_| ConfigError::malformed(path, "file is not valid UTF-8"))
}
