//! Extract a version token from a gallery metadata response.

use crate::gallery::is_path_segment;
use serde_json::Value;

/// Returns the first version in the body.
///
/// Accepts `{"versions":[{"version":"1.2.3"}, ...]}` and `{"version":"1.2.3"}`;
/// the array form wins when both are present. Tokens that are blank or would
/// not survive as a URL path segment are ignored.
pub(crate) fn latest_version(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    let from_array = value
        .get("versions")
        .and_then(Value::as_array)
        .and_then(|versions| versions.first())
        .and_then(|first| first.get("version"))
        .and_then(Value::as_str);
    let flat = value.get("version").and_then(Value::as_str);

    from_array
        .or(flat)
        .map(str::trim)
        .filter(|v| is_path_segment(v))
        .map(str::to_string)
}
