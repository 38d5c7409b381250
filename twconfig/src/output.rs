//! Shared output formatting for descriptors and content resolutions.
//!
//! Provides JSON and plain-text formatters. Color/terminal formatting is
//! intentionally excluded from this core module; that concern belongs to the
//! CLI layer.

use std::io::Write;
use std::path::Path;

use crate::config::{ContentScanConfig, PluginRef};
use crate::resolve::ContentResolution;

/// Format a `ContentScanConfig` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_config_human(
    config: &ContentScanConfig,
    source: &Path,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(writer, "Config: {}", source.display())?;
    writeln!(writer)?;

    let relative = if config.content.is_relative() {
        " (relative to config file)"
    } else {
        ""
    };
    writeln!(writer, "Content globs{relative}:")?;
    for glob in config.content_globs() {
        writeln!(writer, "  {glob}")?;
    }
    writeln!(writer)?;

    if config.theme_extensions().is_empty() {
        writeln!(writer, "Theme extensions: (none)")?;
    } else {
        writeln!(writer, "Theme extensions:")?;
        for (key, value) in config.theme_extensions() {
            writeln!(writer, "  {key}: {}", serde_json::to_string(value)?)?;
        }
    }
    if !config.theme.overrides.is_empty() {
        writeln!(writer, "Theme overrides:")?;
        for (key, value) in &config.theme.overrides {
            writeln!(writer, "  {key}: {}", serde_json::to_string(value)?)?;
        }
    }

    if config.plugins.is_empty() {
        writeln!(writer, "Plugins: (none)")?;
    } else {
        writeln!(writer, "Plugins:")?;
        for plugin in &config.plugins {
            match plugin {
                PluginRef::Name(name) => writeln!(writer, "  {name}")?,
                PluginRef::Configured { name, options } => writeln!(
                    writer,
                    "  {name} {}",
                    serde_json::to_string(options)?
                )?,
            }
        }
    }

    if !config.extra.is_empty() {
        writeln!(writer, "Other settings:")?;
        for (key, value) in &config.extra {
            writeln!(writer, "  {key}: {}", serde_json::to_string(value)?)?;
        }
    }
    Ok(())
}

/// Format a `ContentResolution` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_resolution_json(
    resolution: &ContentResolution,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(resolution)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ContentResolution` as human-readable plain text to a writer.
///
/// Files are listed relative to the base directory, one per line, followed
/// by any scan errors and a summary line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_resolution_human(
    resolution: &ContentResolution,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    for file in resolution.relative_files() {
        writeln!(writer, "{}", file.display())?;
    }

    if !resolution.scan_errors.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  SCAN ERRORS (paths that could not be considered)")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for scan_err in &resolution.scan_errors {
            writeln!(writer, "{}", scan_err.format_human_readable())?;
        }
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{} file(s) matched under {}",
        resolution.files.len(),
        resolution.base_dir.display()
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ContentSource;
    use serde_json::json;

    #[test]
    fn test_human_config_lists_everything() {
        let mut config = ContentScanConfig::with_globs(["./lib/**/*.dart"]);
        config.content = ContentSource::Files {
            files: vec!["./lib/**/*.dart".to_owned()],
            relative: true,
        };
        config
            .theme
            .extend
            .insert("colors".to_owned(), json!({ "brand": "#000" }));
        config.plugins.push(crate::PluginRef::Name("forms".to_owned()));
        config.extra.insert("prefix".to_owned(), json!("tw-"));

        let mut buf = Vec::new();
        write_config_human(&config, Path::new("tailwind.config.json"), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Config: tailwind.config.json"));
        assert!(text.contains("Content globs (relative to config file):"));
        assert!(text.contains("  ./lib/**/*.dart"));
        assert!(text.contains("  colors: {\"brand\":\"#000\"}"));
        assert!(text.contains("Plugins:\n  forms"));
        assert!(text.contains("  prefix: \"tw-\""));
    }

    #[test]
    fn test_human_config_empty_extension_points() {
        let config = ContentScanConfig::with_globs(["./src/*.html"]);
        let mut buf = Vec::new();
        write_config_human(&config, Path::new("c.json"), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Theme extensions: (none)"));
        assert!(text.contains("Plugins: (none)"));
        assert!(!text.contains("Other settings"));
    }
}
