//! Raw configuration sources
//!
//! Collects the string values that sit above the compiled-in defaults: the
//! override file first, then the process environment on top. Only keys carrying
//! the reserved prefix are kept; the prefix is stripped and the remainder is
//! lowercased so it lines up with the field names of
//! [`Settings`](crate::config::Settings).

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Layer a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    OverrideFile,
    Environment,
}

/// Prefix-stripped string values keyed by lowercase field name
#[derive(Debug, Default, Clone)]
pub struct RawValues {
    prefix: String,
    values: BTreeMap<String, (String, Origin)>,
}

impl RawValues {
    /// Create an empty set of values for the given prefix (e.g. `XLWINGS_`)
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            values: BTreeMap::new(),
        }
    }

    /// Field name for a variable name, if it carries the prefix
    fn field_name(&self, key: &str) -> Option<String> {
        let key = key.trim();
        if key.len() <= self.prefix.len() {
            return None;
        }
        let (head, tail) = key.split_at_checked(self.prefix.len())?;
        head.eq_ignore_ascii_case(&self.prefix)
            .then(|| tail.to_lowercase())
    }

    /// Insert a single variable, ignoring it unless it carries the prefix.
    /// A later insert of the same field replaces the earlier one.
    pub fn insert(&mut self, key: &str, value: impl Into<String>, origin: Origin) {
        if let Some(field) = self.field_name(key) {
            self.values.insert(field, (value.into(), origin));
        }
    }

    /// Layer the entries of an override file on top of the current values.
    ///
    /// A missing file is not an error. Returns whether the file was read.
    pub fn merge_dotenv_file(&mut self, path: &Path) -> Result<bool> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                debug!("No override file at {:?}", path);
                return Ok(false);
            }
            Err(e) => return Err(Error::override_file(path, e)),
        };

        for item in iter {
            let (key, value) = item.map_err(|e| Error::override_file(path, e))?;
            self.insert(&key, value, Origin::OverrideFile);
        }

        Ok(true)
    }

    /// Layer the given environment variables on top of the current values
    pub fn merge_env<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.insert(key.as_ref(), value, Origin::Environment);
        }
    }

    /// Layer the process environment on top of the current values.
    /// Variables that aren't valid unicode are skipped.
    pub fn merge_process_env(&mut self) {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        self.merge_env(vars);
    }

    /// Remove and return the value for a field
    pub fn take(&mut self, field: &str) -> Option<(String, Origin)> {
        self.values.remove(field)
    }

    /// Field names still present
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_insert_strips_prefix_case_insensitively() {
        let mut raw = RawValues::new("XLWINGS_");
        raw.insert("XLWINGS_ENABLE_HTMX", "false", Origin::Environment);
        raw.insert("xlwings_app_path", "/xl", Origin::Environment);
        raw.insert("PATH", "/usr/bin", Origin::Environment);
        raw.insert("XLWINGS_", "empty", Origin::Environment);

        assert_eq!(raw.remaining().collect::<Vec<_>>(), vec!["app_path", "enable_htmx"]);
        assert_eq!(
            raw.take("enable_htmx"),
            Some(("false".to_string(), Origin::Environment))
        );
        assert_eq!(
            raw.take("app_path"),
            Some(("/xl".to_string(), Origin::Environment))
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# comment\nXLWINGS_LOG_LEVEL=DEBUG\nXLWINGS_PROJECT_NAME=\"From File\"\nOTHER=1"
        )
        .unwrap();
        file.flush().unwrap();

        let mut raw = RawValues::new("XLWINGS_");
        assert!(raw.merge_dotenv_file(file.path()).unwrap());
        raw.merge_env([("XLWINGS_LOG_LEVEL", "WARNING")]);

        assert_eq!(raw.remaining().count(), 2);
        assert_eq!(
            raw.take("log_level"),
            Some(("WARNING".to_string(), Origin::Environment))
        );
        assert_eq!(
            raw.take("project_name"),
            Some(("From File".to_string(), Origin::OverrideFile))
        );
        assert!(raw.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = RawValues::new("XLWINGS_");
        assert!(!raw.merge_dotenv_file(&dir.path().join(".env")).unwrap());
        assert!(raw.is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "XLWINGS_APP_PATH='unterminated").unwrap();
        file.flush().unwrap();

        let mut raw = RawValues::new("XLWINGS_");
        let err = raw.merge_dotenv_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::OverrideFile { .. }));
    }
}
