//! `check` command: resolve the settings and report whether they are usable

use crate::config::Settings;

/// One line summary for settings that resolved and validated
pub fn summary(settings: &Settings) -> String {
    format!(
        "Configuration OK (environment: {}, manifest id: {}, static dir: {})",
        settings.environment,
        settings.manifest_id(),
        settings.static_dir().display()
    )
}
