//! Configuration management for xlwings Server
//!
//! This module resolves the server settings from compiled-in defaults, an
//! optional `.env` override file and `XLWINGS_*` environment variables, and
//! keeps the result as a process-wide, read-only record.

pub mod exports;
pub mod loader;
pub mod parse;
pub mod settings;
pub mod source;

pub use exports::ProcessExports;
pub use loader::{ConfigLoader, resolve};
pub use settings::{Environment, Settings};

use std::sync::OnceLock;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Resolve the settings once for the whole process.
///
/// The first successful call resolves with the default loader, applies the
/// environment exports and stores the record; later calls return the stored
/// record without resolving or exporting again. Call it at startup, before
/// other threads are spawned.
pub fn init() -> crate::Result<&'static Settings> {
    init_with(&ConfigLoader::new())
}

/// Like [`init`], using the given loader
pub fn init_with(loader: &ConfigLoader) -> crate::Result<&'static Settings> {
    if let Some(settings) = SETTINGS.get() {
        return Ok(settings);
    }

    let settings = loader.resolve()?;
    Ok(SETTINGS.get_or_init(|| settings))
}

/// Settings stored by [`init`], if it has run
pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}
