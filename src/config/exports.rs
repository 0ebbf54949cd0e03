//! Values handed on to environment-only collaborators
//!
//! The xlwings licensing check and date formatting read their inputs from the
//! process environment, not from [`Settings`]. After settings are resolved the
//! license key and the date format are exported there.
//!
//! The two writes deliberately differ:
//! - the license key is only written when it is non-empty and the variable is
//!   not already set;
//! - the date format is written whenever it is non-empty, replacing any
//!   existing value.
//!
//! Callers able to pass values directly should use the fields of
//! [`ProcessExports`] instead of going through the environment.

use crate::config::Settings;
use tracing::debug;

/// Variable suffix read by the licensing check
pub const LICENSE_KEY_SUFFIX: &str = "LICENSE_KEY";
/// Variable suffix read by the date formatter
pub const DATE_FORMAT_SUFFIX: &str = "DATE_FORMAT";

/// Values destined for the process environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessExports {
    pub license_key_var: String,
    pub date_format_var: String,
    /// Non-empty license key, if any
    pub license_key: Option<String>,
    /// Non-empty date format, if any
    pub date_format: Option<String>,
}

impl ProcessExports {
    /// Collect the exports for resolved settings under the given prefix
    pub fn from_settings(prefix: &str, settings: &Settings) -> Self {
        Self {
            license_key_var: format!("{prefix}{LICENSE_KEY_SUFFIX}"),
            date_format_var: format!("{prefix}{DATE_FORMAT_SUFFIX}"),
            license_key: non_empty(settings.license_key.as_deref()),
            date_format: non_empty(settings.date_format.as_deref()),
        }
    }

    /// Write the exports into the process environment.
    ///
    /// Returns the names of the variables that were written. Must run before
    /// other threads start reading the environment.
    pub fn apply(&self) -> Vec<String> {
        let mut written = Vec::new();

        if let Some(key) = &self.license_key {
            if std::env::var_os(&self.license_key_var).is_none() {
                // SAFETY: called once during single-threaded startup
                unsafe { std::env::set_var(&self.license_key_var, key) };
                written.push(self.license_key_var.clone());
            } else {
                debug!("{} already set, leaving it alone", self.license_key_var);
            }
        }

        if let Some(format) = &self.date_format {
            // SAFETY: called once during single-threaded startup
            unsafe { std::env::set_var(&self.date_format_var, format) };
            written.push(self.date_format_var.clone());
        }

        if !written.is_empty() {
            debug!("Exported {:?} to the process environment", written);
        }

        written
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
