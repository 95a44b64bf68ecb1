//! Lenient JSON parsing for user-supplied strings

use serde_json::Value;

/// Parse an arbitrary string as JSON.
///
/// Returns `None` when the input is absent or not valid JSON; this helper
/// never reports an error.
pub fn validate_json(json: Option<&str>) -> Option<Value> {
    serde_json::from_str(json?).ok()
}
