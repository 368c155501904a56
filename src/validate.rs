use crate::error::{Error, Result};
use serde_json::Value;

/// Message used when the API flags an error without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Turn an embedded `{"error": true, "msg": ...}` payload into [`Error::Api`].
///
/// Any other value, including one without an `error` field, is returned as is.
pub fn validate(response: Value) -> Result<Value> {
    if response.get("error").is_some_and(is_true) {
        let message = response
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR)
            .to_string();
        return Err(Error::Api { message });
    }
    Ok(response)
}

/// `true`, or a string spelling "true" in any case.
fn is_true(flag: &Value) -> bool {
    match flag {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
