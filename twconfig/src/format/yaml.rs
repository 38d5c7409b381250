//! YAML config documents.

use serde_json::Value;

/// Parse a single-document YAML stream.
///
/// A config is one descriptor, so streams with more than one document are
/// rejected instead of silently taking the first.
///
/// # Errors
///
/// Returns the parser message, or a message naming the document count.
pub fn parse_yaml(content: &str) -> Result<Value, String> {
    let mut documents: Vec<Value> =
        serde_saphyr::from_multiple(content).map_err(|e| format!("YAML parse error: {e}"))?;
    match documents.len() {
        0 => Err("YAML stream contains no document".to_owned()),
        1 => Ok(documents.remove(0)),
        n => Err(format!(
            "YAML stream contains {n} documents; a config must be a single document"
        )),
    }
}
