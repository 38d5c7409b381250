//! Decoding a parsed value tree into a validated descriptor, and encoding
//! a descriptor back into the same schema.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::{ContentScanConfig, ContentSource, PluginRef, ThemeConfig};
use crate::error::ConfigError;
use crate::pattern::ContentPattern;

/// Decode and validate a config value tree.
///
/// `origin` names the file (or in-memory source) in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedConfig`] for any schema violation.
pub fn decode(value: Value, origin: &Path) -> Result<ContentScanConfig, ConfigError> {
    let malformed = |message: String| ConfigError::malformed(origin, message);

    let mut root = match value {
        Value::Object(root) => root,
        other => {
            return Err(malformed(format!(
                "config root must be an object, found {}",
                type_name(&other)
            )));
        }
    };

    let content = root
        .remove("content")
        .ok_or_else(|| malformed("missing required key `content`".to_owned()))?;
    let content = decode_content(content).map_err(&malformed)?;
    validate_globs(content.globs()).map_err(&malformed)?;

    let theme = match root.remove("theme") {
        None => ThemeConfig::default(),
        Some(theme) => decode_theme(theme).map_err(&malformed)?,
    };

    let plugins = match root.remove("plugins") {
        None => Vec::new(),
        Some(plugins) => decode_plugins(plugins).map_err(&malformed)?,
    };

    let extra: BTreeMap<String, Value> = root.into_iter().collect();
    debug!(
        origin = %origin.display(),
        globs = content.globs().len(),
        plugins = plugins.len(),
        extra_keys = extra.len(),
        "decoded config"
    );

    Ok(ContentScanConfig {
        content,
        theme,
        plugins,
        extra,
    })
}

fn decode_content(value: Value) -> Result<ContentSource, String> {
    match value {
        Value::Array(items) => decode_glob_list(items, "content").map(ContentSource::Globs),
        Value::Object(mut map) => {
            let files = map
                .remove("files")
                .ok_or_else(|| "`content` object is missing `files`".to_owned())?;
            let items = match files {
                Value::Array(items) => items,
                other => {
                    return Err(format!(
                        "`content.files` must be an array of glob patterns, found {}",
                        type_name(&other)
                    ));
                }
            };
            let files = decode_glob_list(items, "content.files")?;
            let relative = match map.remove("relative") {
                None => false,
                Some(Value::Bool(relative)) => relative,
                Some(other) => {
                    return Err(format!(
                        "`content.relative` must be a boolean, found {}",
                        type_name(&other)
                    ));
                }
            };
            if let Some(key) = map.keys().next() {
                return Err(format!("`content.{key}` is not supported"));
            }
            Ok(ContentSource::Files { files, relative })
        }
        other => Err(format!(
            "`content` must be an array of glob patterns or an object with `files`, found {}",
            type_name(&other)
        )),
    }
}

fn decode_glob_list(items: Vec<Value>, field: &str) -> Result<Vec<String>, String> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(glob) => Ok(glob),
            other => Err(format!(
                "`{field}[{idx}]` must be a glob pattern string, found {}",
                type_name(&other)
            )),
        })
        .collect()
}

fn validate_globs(globs: &[String]) -> Result<(), String> {
    let mut positive = 0usize;
    for (idx, glob) in globs.iter().enumerate() {
        let pattern =
            ContentPattern::parse(glob).map_err(|e| format!("content pattern #{idx}: {e}"))?;
        if !pattern.is_negated() {
            positive += 1;
        }
    }
    if positive == 0 {
        return Err("`content` must declare at least one non-negated glob pattern".to_owned());
    }
    Ok(())
}

fn decode_theme(value: Value) -> Result<ThemeConfig, String> {
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(format!("`theme` must be an object, found {}", type_name(&other)));
        }
    };
    let extend = match map.remove("extend") {
        None => BTreeMap::new(),
        Some(Value::Object(extend)) => extend.into_iter().collect(),
        Some(other) => {
            return Err(format!(
                "`theme.extend` must be an object, found {}",
                type_name(&other)
            ));
        }
    };
    Ok(ThemeConfig {
        extend,
        overrides: map.into_iter().collect(),
    })
}

fn decode_plugins(value: Value) -> Result<Vec<PluginRef>, String> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(format!("`plugins` must be an array, found {}", type_name(&other))),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| decode_plugin(item).map_err(|e| format!("`plugins[{idx}]`: {e}")))
        .collect()
}

fn decode_plugin(value: Value) -> Result<PluginRef, String> {
    match value {
        Value::String(name) if !name.is_empty() => Ok(PluginRef::Name(name)),
        Value::String(_) => Err("plugin name is empty".to_owned()),
        Value::Object(mut map) => {
            let name = match map.remove("name") {
                Some(Value::String(name)) if !name.is_empty() => name,
                Some(other) => {
                    return Err(format!(
                        "`name` must be a non-empty string, found {}",
                        type_name(&other)
                    ));
                }
                None => return Err("plugin object is missing `name`".to_owned()),
            };
            let options = match map.remove("options") {
                None | Some(Value::Null) => BTreeMap::new(),
                Some(Value::Object(options)) => options.into_iter().collect(),
                Some(other) => {
                    return Err(format!(
                        "`options` must be an object, found {}",
                        type_name(&other)
                    ));
                }
            };
            if let Some(key) = map.keys().next() {
                return Err(format!("unsupported key `{key}`"));
            }
            Ok(PluginRef::Configured { name, options })
        }
        other => Err(format!(
            "expected a plugin name or an object with `name`, found {}",
            type_name(&other)
        )),
    }
}

/// JSON type name used in error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Encode a descriptor as a value tree in the config file schema.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(config: &ContentScanConfig) -> serde_json::Result<Value> {
    serde_json::to_value(config)
}

impl ContentScanConfig {
    /// Serialize as a pretty-printed JSON config document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(&encode(self)?)?;
        text.push('\n');
        Ok(text)
    }

    /// Serialize as a JavaScript config module.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_js_module(&self) -> serde_json::Result<String> {
        let body = serde_json::to_string_pretty(&encode(self)?)?;
        Ok(format!(
            "/** @type {{import('tailwindcss').Config}} */\nmodule.exports = {body};\n"
        ))
    }
}

/// JSON Schema (draft 2020-12) of the config document.
#[must_use]
pub fn json_schema() -> Value {
    let schema = schemars::schema_for!(ContentScanConfig);
    schema.to_value()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorKind;
    use serde_json::json;

    fn decode_json(value: Value) -> Result<ContentScanConfig, ConfigError> {
        decode(value, Path::new("tailwind.config.json"))
    }

    fn message(err: &ConfigError) -> String {
        match err {
            ConfigError::MalformedConfig { message, .. } => message.clone(),
            other => panic!("expected MalformedConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_reference_shape() {
        let config = decode_json(json!({
            "content": [
                "./lib/**/*.{dart,js,ts,jsx,tsx}",
                "./test/**/*.{dart,js,ts,jsx,tsx}"
            ],
            "theme": { "extend": {} },
            "plugins": []
        }))
        .unwrap();
        assert_eq!(
            config.content_globs(),
            [
                "./lib/**/*.{dart,js,ts,jsx,tsx}",
                "./test/**/*.{dart,js,ts,jsx,tsx}"
            ]
        );
        assert!(config.theme_extensions().is_empty());
        assert!(config.theme.overrides.is_empty());
        assert!(config.plugins.is_empty());
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_decode_optional_sections_default() {
        let config = decode_json(json!({ "content": ["./src/*.html"] })).unwrap();
        assert!(config.theme_extensions().is_empty());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_content_string_is_malformed() {
        let err = decode_json(json!({ "content": "./lib/**/*.dart" })).unwrap_err();
        assert_eq!(err.kind(), ConfigErrorKind::MalformedConfig);
        assert!(message(&err).contains("found string"), "got: {err}");
    }

    #[test]
    fn test_non_string_glob_is_malformed() {
        let err = decode_json(json!({ "content": ["./lib/*.js", 42] })).unwrap_err();
        assert!(message(&err).contains("`content[1]`"), "got: {err}");
        assert!(message(&err).contains("found number"), "got: {err}");
    }

    #[test]
    fn test_missing_or_empty_content_is_malformed() {
        let err = decode_json(json!({ "plugins": [] })).unwrap_err();
        assert!(message(&err).contains("missing required key `content`"));

        let err = decode_json(json!({ "content": [] })).unwrap_err();
        assert!(message(&err).contains("at least one"));

        let err = decode_json(json!({ "content": ["!./lib/**"] })).unwrap_err();
        assert!(message(&err).contains("at least one"));
    }

    #[test]
    fn test_invalid_glob_is_malformed() {
        let err = decode_json(json!({ "content": ["./lib/*.{js,ts"] })).unwrap_err();
        assert!(message(&err).contains("content pattern #0"), "got: {err}");
        assert!(message(&err).contains("unbalanced"), "got: {err}");
    }

    #[test]
    fn test_root_must_be_object() {
        let err = decode_json(json!(["./lib/*.js"])).unwrap_err();
        assert!(message(&err).contains("found array"));
    }

    #[test]
    fn test_content_object_form() {
        let config = decode_json(json!({
            "content": { "files": ["./src/**/*.js"], "relative": true }
        }))
        .unwrap();
        assert!(config.content.is_relative());
        assert_eq!(config.content_globs(), ["./src/**/*.js"]);

        let err = decode_json(json!({
            "content": { "files": ["./src/**/*.js"], "transform": {} }
        }))
        .unwrap_err();
        assert!(message(&err).contains("`content.transform` is not supported"));

        let err = decode_json(json!({ "content": { "relative": true } })).unwrap_err();
        assert!(message(&err).contains("missing `files`"));
    }

    #[test]
    fn test_theme_validation() {
        let config = decode_json(json!({
            "content": ["./src/*.js"],
            "theme": { "colors": { "brand": "#123456" }, "extend": { "spacing": { "128": "32rem" } } }
        }))
        .unwrap();
        assert_eq!(config.theme_extensions()["spacing"], json!({ "128": "32rem" }));
        assert_eq!(config.theme.overrides["colors"], json!({ "brand": "#123456" }));

        let err = decode_json(json!({ "content": ["./a/*.js"], "theme": [] })).unwrap_err();
        assert!(message(&err).contains("`theme` must be an object"));

        let err =
            decode_json(json!({ "content": ["./a/*.js"], "theme": { "extend": 1 } })).unwrap_err();
        assert!(message(&err).contains("`theme.extend` must be an object"));
    }

    #[test]
    fn test_plugin_validation() {
        let config = decode_json(json!({
            "content": ["./src/*.js"],
            "plugins": ["forms", { "name": "typography", "options": { "className": "prose" } }]
        }))
        .unwrap();
        assert_eq!(config.plugins[0], PluginRef::Name("forms".to_owned()));
        assert_eq!(config.plugins[1].name(), "typography");

        let err = decode_json(json!({ "content": ["./a/*.js"], "plugins": {} })).unwrap_err();
        assert!(message(&err).contains("`plugins` must be an array"));

        let err = decode_json(json!({ "content": ["./a/*.js"], "plugins": [1] })).unwrap_err();
        assert!(message(&err).contains("`plugins[0]`"));

        let err = decode_json(json!({
            "content": ["./a/*.js"],
            "plugins": [{ "name": "x", "handler": "fn" }]
        }))
        .unwrap_err();
        assert!(message(&err).contains("unsupported key `handler`"));
    }

    #[test]
    fn test_extra_keys_round_trip() {
        let source = json!({
            "content": ["./src/**/*.html", "!./src/legacy/**"],
            "prefix": "tw-",
            "darkMode": "class",
            "theme": { "extend": { "colors": { "brand": "#000" } }, "screens": { "sm": "480px" } },
            "plugins": ["forms", { "name": "typography", "options": { "target": "legacy" } }]
        });
        let config = decode_json(source.clone()).unwrap();
        assert_eq!(config.extra["prefix"], "tw-");
        assert_eq!(encode(&config).unwrap(), source);
        assert_eq!(decode_json(encode(&config).unwrap()).unwrap(), config);
    }

    #[test]
    fn test_js_module_output_parses_back() {
        let config = decode_json(json!({ "content": ["./lib/**/*.dart"] })).unwrap();
        let module = config.to_js_module().unwrap();
        assert!(module.starts_with("/** @type"));
        let reparsed = crate::format::js::parse_module(&module).unwrap();
        assert_eq!(decode_json(reparsed).unwrap(), config);
    }

    #[test]
    fn test_json_schema_names_content() {
        let schema = json_schema();
        assert!(schema["properties"]["content"].is_object(), "got: {schema}");
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("content")), "got: {schema}");
        assert!(!required.contains(&json!("plugins")), "got: {schema}");

        let theme = &schema["$defs"]["ThemeConfig"];
        assert!(theme.is_object(), "got: {schema}");
        assert!(
            theme["required"]
                .as_array()
                .is_none_or(|keys| !keys.contains(&json!("extend"))),
            "got: {theme}"
        );
    }

    #[test]
    fn test_theme_without_extend_is_accepted() {
        let config = decode(
            json!({"content": ["./a/*.js"], "theme": {"colors": {}}}),
            Path::new("inline.json"),
        )
        .unwrap();
        assert!(config.theme_extensions().is_empty());
        assert!(config.theme.overrides.contains_key("colors"));
    }
}
