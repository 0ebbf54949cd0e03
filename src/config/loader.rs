//! Configuration loading utilities
//!
//! Resolves [`Settings`] from its layered sources, lowest precedence first:
//! 1. Compiled-in defaults
//! 2. The override file (`DOTENV_PATH`, default `.env`)
//! 3. `XLWINGS_*` environment variables
//!
//! Resolution is all-or-nothing: the first value that fails to coerce aborts
//! it and no settings are returned.

use crate::{
    Result,
    config::{
        Settings,
        exports::ProcessExports,
        parse,
        source::{Origin, RawValues},
    },
};
use std::path::PathBuf;
use tracing::{debug, info};

/// Prefix shared by every recognised environment variable
pub const DEFAULT_PREFIX: &str = "XLWINGS_";
/// Variable naming the override file
pub const DOTENV_PATH_VAR: &str = "DOTENV_PATH";
/// Override file used when `DOTENV_PATH` is unset
pub const DEFAULT_DOTENV_FILE: &str = ".env";

/// Configuration loader with multiple source support
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    prefix: String,
    dotenv_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            dotenv_path: None,
        }
    }

    /// Use a different variable prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Read the override file from an explicit path instead of `DOTENV_PATH`
    pub fn with_dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Override file path from the `DOTENV_PATH` environment variable,
    /// falling back to `.env` in the working directory
    pub fn get_dotenv_path() -> PathBuf {
        std::env::var_os(DOTENV_PATH_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOTENV_FILE))
    }

    /// Override file this loader reads
    pub fn dotenv_path(&self) -> PathBuf {
        self.dotenv_path
            .clone()
            .unwrap_or_else(Self::get_dotenv_path)
    }

    /// Load settings from defaults, the override file and the process
    /// environment. Does not touch the environment.
    pub fn load(&self) -> Result<Settings> {
        let path = self.dotenv_path();
        let mut raw = RawValues::new(&self.prefix);

        if raw.merge_dotenv_file(&path)? {
            info!("Loading configuration overrides from file: {:?}", path);
        }

        debug!("Applying environment variable overrides");
        raw.merge_process_env();

        let settings = Self::from_raw(raw)?;
        settings.validate()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:?}", settings.redacted());

        Ok(settings)
    }

    /// Load settings, then export the license key and date format into the
    /// process environment for collaborators that only read it there.
    pub fn resolve(&self) -> Result<Settings> {
        let settings = self.load()?;
        self.exports(&settings).apply();
        Ok(settings)
    }

    /// Environment exports for settings resolved by this loader
    pub fn exports(&self, settings: &Settings) -> ProcessExports {
        ProcessExports::from_settings(&self.prefix, settings)
    }

    /// Build settings from already collected raw values on top of the defaults.
    ///
    /// Values left over after every field has been read are ignored.
    pub fn from_raw(mut raw: RawValues) -> Result<Settings> {
        let mut s = Settings::default();
        let r = &mut raw;

        set_bool(r, "add_security_headers", &mut s.add_security_headers)?;
        set_list(r, "auth_providers", &mut s.auth_providers)?;
        set_list(r, "auth_required_roles", &mut s.auth_required_roles)?;
        set_optional(r, "auth_entraid_client_id", &mut s.auth_entraid_client_id);
        set_optional(r, "auth_entraid_tenant_id", &mut s.auth_entraid_tenant_id);
        set_bool(r, "auth_entraid_multitenant", &mut s.auth_entraid_multitenant)?;
        set_string(r, "app_path", &mut s.app_path);
        if let Some((value, origin)) = r.take("base_dir") {
            s.base_dir = PathBuf::from(value);
            log_applied("base_dir", origin);
        }
        set_optional(r, "object_cache_url", &mut s.object_cache_url);
        set_optional(r, "object_cache_expire_at", &mut s.object_cache_expire_at);
        set_bool(
            r,
            "object_cache_enable_compression",
            &mut s.object_cache_enable_compression,
        )?;
        set_list(r, "cors_allow_origins", &mut s.cors_allow_origins)?;
        set_optional(r, "date_format", &mut s.date_format);
        set_bool(r, "enable_alpinejs_csp", &mut s.enable_alpinejs_csp)?;
        set_bool(r, "enable_bootstrap", &mut s.enable_bootstrap)?;
        set_bool(r, "enable_examples", &mut s.enable_examples)?;
        set_bool(r, "enable_excel_online", &mut s.enable_excel_online)?;
        set_bool(r, "enable_htmx", &mut s.enable_htmx)?;
        set_bool(r, "enable_socketio", &mut s.enable_socketio)?;
        if let Some((value, origin)) = r.take("environment") {
            s.environment = parse::parse_environment("environment", &value)?;
            log_applied("environment", origin);
        }
        set_string(r, "functions_namespace", &mut s.functions_namespace);
        set_optional(r, "hostname", &mut s.hostname);
        set_string(r, "log_level", &mut s.log_level);
        set_uuid(r, "manifest_id_dev", &mut s.manifest_id_dev)?;
        set_uuid(r, "manifest_id_qa", &mut s.manifest_id_qa)?;
        set_uuid(r, "manifest_id_uat", &mut s.manifest_id_uat)?;
        set_uuid(r, "manifest_id_staging", &mut s.manifest_id_staging)?;
        set_uuid(r, "manifest_id_prod", &mut s.manifest_id_prod)?;
        set_string(r, "project_name", &mut s.project_name);
        set_bool(r, "public_addin_store", &mut s.public_addin_store)?;
        set_optional(r, "secret_key", &mut s.secret_key);
        set_optional(
            r,
            "socketio_message_queue_url",
            &mut s.socketio_message_queue_url,
        );
        set_bool(r, "socketio_server_app", &mut s.socketio_server_app)?;
        set_string(r, "static_url_path", &mut s.static_url_path);
        set_optional(r, "license_key", &mut s.license_key);

        if !raw.is_empty() {
            let ignored: Vec<&str> = raw.remaining().collect();
            debug!("Ignoring unknown settings: {:?}", ignored);
        }

        Ok(s)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve settings with the default loader
pub fn resolve() -> Result<Settings> {
    ConfigLoader::new().resolve()
}

fn log_applied(field: &str, origin: Origin) {
    debug!(field, ?origin, "Applied override");
}

fn set_string(raw: &mut RawValues, field: &str, target: &mut String) {
    if let Some((value, origin)) = raw.take(field) {
        *target = value;
        log_applied(field, origin);
    }
}

fn set_optional(raw: &mut RawValues, field: &str, target: &mut Option<String>) {
    if let Some((value, origin)) = raw.take(field) {
        *target = Some(value);
        log_applied(field, origin);
    }
}

fn set_bool(raw: &mut RawValues, field: &str, target: &mut bool) -> Result<()> {
    if let Some((value, origin)) = raw.take(field) {
        *target = parse::parse_bool(field, &value)?;
        log_applied(field, origin);
    }
    Ok(())
}

fn set_list(raw: &mut RawValues, field: &str, target: &mut Vec<String>) -> Result<()> {
    if let Some((value, origin)) = raw.take(field) {
        *target = parse::parse_list(field, &value)?;
        log_applied(field, origin);
    }
    Ok(())
}

fn set_uuid(raw: &mut RawValues, field: &str, target: &mut uuid::Uuid) -> Result<()> {
    if let Some((value, origin)) = raw.take(field) {
        *target = parse::parse_uuid4(field, &value)?;
        log_applied(field, origin);
    }
    Ok(())
}
