//! JSON config documents.

use serde_json::Value;

/// Parse a JSON document.
///
/// # Errors
///
/// Returns the parser message with its line and column.
pub fn parse_json(content: &str) -> Result<Value, String> {
    serde_json::from_str(content).map_err(|e| format!("JSON parse error: {e}"))
}
