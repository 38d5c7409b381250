//! Source formats a config file can be written in.
//!
//! Every format is parsed into a `serde_json::Value` tree; schema decoding
//! happens once, on that tree, regardless of where it came from.

pub mod js;
pub mod json;
pub mod yaml;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

/// On-disk representation of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum ConfigFormat {
    /// A JSON document.
    Json,
    /// A single-document YAML stream.
    Yaml,
    /// A JavaScript module exporting an object literal.
    JavaScript,
}

impl ConfigFormat {
    /// Determine the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            Some("js" | "cjs" | "mjs") => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Parse `content` into a value tree.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message describing the syntax error.
    pub fn parse(self, content: &str) -> Result<Value, String> {
        match self {
            Self::Json => json::parse_json(content),
            Self::Yaml => yaml::parse_yaml(content),
            Self::JavaScript => js::parse_module(content),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
            Self::JavaScript => write!(f, "JavaScript"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("tailwind.config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tailwind.config.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tailwind.config.cjs")),
            Some(ConfigFormat::JavaScript)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("tailwind.config.ts")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("Makefile")), None);
    }
}
