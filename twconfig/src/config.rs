//! The content-scan config descriptor.
//!
//! A descriptor is produced once by [`crate::load_config`] and never mutated.
//! Its serialized form is the config file schema itself, so a descriptor
//! written back out and reloaded compares equal to the original.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

/// Where content globs come from and what they are relative to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum ContentSource {
    /// `content: ["./src/**/*.js", ...]`, resolved against the project root.
    Globs(Vec<String>),
    /// `content: { files: [...], relative: true }`.
    Files {
        /// Glob patterns, in declaration order.
        files: Vec<String>,
        /// Resolve globs against the config file's directory instead of the
        /// project root.
        #[serde(default)]
        relative: bool,
    },
}

impl ContentSource {
    /// Glob patterns in declaration order.
    #[must_use]
    pub fn globs(&self) -> &[String] {
        match self {
            Self::Globs(globs) | Self::Files { files: globs, .. } => globs,
        }
    }

    /// Whether globs resolve against the config file's directory.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        matches!(self, Self::Files { relative: true, .. })
    }
}

/// The `theme` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct ThemeConfig {
    /// Additions merged over the framework's default theme.
    #[serde(default)]
    pub extend: BTreeMap<String, Value>,
    /// Keys that replace default theme sections outright.
    #[serde(flatten)]
    pub overrides: BTreeMap<String, Value>,
}

/// A reference to a plugin package.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum PluginRef {
    /// Plugin referenced by package name only.
    Name(String),
    /// Plugin referenced with options.
    Configured {
        /// Package name.
        name: String,
        /// Options passed to the plugin.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        options: BTreeMap<String, Value>,
    },
}

impl PluginRef {
    /// Package name of the plugin.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Configured { name, .. } => name,
        }
    }
}

/// Which files to scan for class names, plus the framework's extension points.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[non_exhaustive]
pub struct ContentScanConfig {
    /// File globs scanned for class-name tokens.
    pub content: ContentSource,
    /// Theme customisation.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Plugin references, in declaration order.
    #[serde(default)]
    pub plugins: Vec<PluginRef>,
    /// Other top-level keys (`prefix`, `darkMode`, ...), carried verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ContentScanConfig {
    /// Build a descriptor from content globs with empty extension points.
    ///
    /// The globs are not validated here; use [`crate::load_config_str`] for
    /// untrusted input.
    #[must_use]
    pub fn with_globs<I, S>(globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: ContentSource::Globs(globs.into_iter().map(Into::into).collect()),
            theme: ThemeConfig::default(),
            plugins: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Content glob patterns in declaration order.
    #[must_use]
    pub fn content_globs(&self) -> &[String] {
        self.content.globs()
    }

    /// The `theme.extend` mapping.
    #[must_use]
    pub fn theme_extensions(&self) -> &BTreeMap<String, Value> {
        &self.theme.extend
    }

    /// Directory the content globs resolve against.
    ///
    /// Relative content resolves against the directory holding the config
    /// file; otherwise against `project_root`.
    #[must_use]
    pub fn base_dir(&self, config_path: &Path, project_root: &Path) -> PathBuf {
        if self.content.is_relative() {
            config_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        } else {
            project_root.to_path_buf()
        }
    }
}
