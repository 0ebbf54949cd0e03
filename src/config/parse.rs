//! Raw value coercion
//!
//! Every value arriving from the override file or the process environment is a
//! string. These helpers turn such a string into the declared type of a field,
//! reporting the field name and the raw value when they can't.

use crate::{Error, Result, config::Environment};
use uuid::Uuid;

/// Parse a boolean value.
///
/// Accepted (case-insensitive, surrounding whitespace ignored):
/// - true: `1`, `true`, `t`, `yes`, `y`, `on`
/// - false: `0`, `false`, `f`, `no`, `n`, `off`
///
/// Anything else, including an empty string, is rejected.
pub fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(Error::invalid_value(field, raw, "expected a boolean")),
    }
}

/// Parse an ordered list of strings.
///
/// A value starting with `[` must be a JSON array of strings. Any other value is
/// split on commas; items are trimmed and empty items dropped, so an empty value
/// yields an empty list.
pub fn parse_list(field: &str, raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(trimmed).map_err(|e| {
            Error::invalid_value(field, raw, format!("expected a JSON array of strings: {e}"))
        });
    }

    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse a version 4 UUID in its textual form.
pub fn parse_uuid4(field: &str, raw: &str) -> Result<Uuid> {
    let uuid = Uuid::parse_str(raw.trim())
        .map_err(|e| Error::invalid_value(field, raw, format!("expected a UUID: {e}")))?;

    match uuid.get_version_num() {
        4 => Ok(uuid),
        v => Err(Error::invalid_value(
            field,
            raw,
            format!("expected a version 4 UUID, found version {v}"),
        )),
    }
}

/// Parse a deployment environment name.
pub fn parse_environment(field: &str, raw: &str) -> Result<Environment> {
    raw.parse::<Environment>()
        .map_err(|_| Error::invalid_value(field, raw, Environment::expected()))
}
