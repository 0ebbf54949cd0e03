//! Configuration settings structure
//!
//! Defines the resolved settings record for xlwings Server together with its
//! compiled-in defaults. Values are layered on top of these defaults by
//! [`ConfigLoader`](crate::config::ConfigLoader).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::{Uuid, uuid};

/// Placeholder manifest ids shipped with a fresh install.
///
/// `xlwings-settings init` replaces these with freshly generated ones.
pub const DEFAULT_MANIFEST_ID_DEV: Uuid = uuid!("063e6117-121c-47ed-b41f-7319eb3397e3");
pub const DEFAULT_MANIFEST_ID_QA: Uuid = uuid!("b73bef0b-6f35-4240-bb8e-3d2cf5df9b45");
pub const DEFAULT_MANIFEST_ID_UAT: Uuid = uuid!("048259e3-cf13-42bb-a587-cc4f7f9d1f9b");
pub const DEFAULT_MANIFEST_ID_STAGING: Uuid = uuid!("4e6dd193-1fc4-4281-824e-b82bdffd0e6c");
pub const DEFAULT_MANIFEST_ID_PROD: Uuid = uuid!("4d7d729f-c8ff-4e98-afb7-37c0a87a69da");

/// Default cron expression for object cache expiry (Saturdays at noon)
pub const DEFAULT_OBJECT_CACHE_EXPIRE_AT: &str = "0 12 * * sat";

const REDACTED: &str = "***";

/// Deployment environment of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Qa,
    Uat,
    Staging,
    #[default]
    Prod,
}

impl Environment {
    /// All environments, in promotion order
    pub const ALL: [Environment; 5] = [
        Environment::Dev,
        Environment::Qa,
        Environment::Uat,
        Environment::Staging,
        Environment::Prod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Qa => "qa",
            Environment::Uat => "uat",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    /// Human readable list of the accepted names
    pub fn expected() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(Environment::as_str).collect();
        format!("expected one of {}", names.join(", "))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not an environment name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEnvironment(pub String);

impl fmt::Display for UnknownEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown environment '{}'", self.0)
    }
}

impl std::error::Error for UnknownEnvironment {}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| UnknownEnvironment(s.to_string()))
    }
}

/// Resolved settings for xlwings Server.
///
/// Built once at startup and read-only afterwards. `static_dir` is not stored;
/// it is always derived from `base_dir` through [`Settings::static_dir`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Send security headers (CSP, HSTS, ...) with every response
    pub add_security_headers: bool,
    /// Enabled authentication providers, in the order they are tried
    pub auth_providers: Vec<String>,
    /// Roles a user must hold to be let in
    pub auth_required_roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_entraid_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_entraid_tenant_id: Option<String>,
    pub auth_entraid_multitenant: bool,
    /// Path prefix the app is mounted under
    pub app_path: String,
    /// Install directory; static files live below it
    pub base_dir: PathBuf,
    /// Object cache connection URL, e.g. `redis://localhost:6379/0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_cache_url: Option<String>,
    /// Cron expression controlling when cached objects expire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_cache_expire_at: Option<String>,
    pub object_cache_enable_compression: bool,
    pub cors_allow_origins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    pub enable_alpinejs_csp: bool,
    pub enable_bootstrap: bool,
    pub enable_examples: bool,
    pub enable_excel_online: bool,
    pub enable_htmx: bool,
    pub enable_socketio: bool,
    pub environment: Environment,
    /// Namespace of the custom functions in Excel
    pub functions_namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub log_level: String,
    pub manifest_id_dev: Uuid,
    pub manifest_id_qa: Uuid,
    pub manifest_id_uat: Uuid,
    pub manifest_id_staging: Uuid,
    pub manifest_id_prod: Uuid,
    pub project_name: String,
    pub public_addin_store: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socketio_message_queue_url: Option<String>,
    pub socketio_server_app: bool,
    pub static_url_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            add_security_headers: true,
            auth_providers: Vec::new(),
            auth_required_roles: Vec::new(),
            auth_entraid_client_id: None,
            auth_entraid_tenant_id: None,
            auth_entraid_multitenant: false,
            app_path: String::new(),
            base_dir: default_base_dir(),
            object_cache_url: None,
            object_cache_expire_at: Some(DEFAULT_OBJECT_CACHE_EXPIRE_AT.to_string()),
            object_cache_enable_compression: true,
            cors_allow_origins: vec!["*".to_string()],
            date_format: None,
            enable_alpinejs_csp: true,
            enable_bootstrap: true,
            enable_examples: true,
            enable_excel_online: true,
            enable_htmx: true,
            enable_socketio: true,
            environment: Environment::Prod,
            functions_namespace: "XLWINGS".to_string(),
            hostname: None,
            log_level: "INFO".to_string(),
            manifest_id_dev: DEFAULT_MANIFEST_ID_DEV,
            manifest_id_qa: DEFAULT_MANIFEST_ID_QA,
            manifest_id_uat: DEFAULT_MANIFEST_ID_UAT,
            manifest_id_staging: DEFAULT_MANIFEST_ID_STAGING,
            manifest_id_prod: DEFAULT_MANIFEST_ID_PROD,
            project_name: "xlwings Server".to_string(),
            public_addin_store: false,
            secret_key: None,
            socketio_message_queue_url: None,
            socketio_server_app: false,
            static_url_path: "/static".to_string(),
            license_key: Some(String::new()),
        }
    }
}

/// Directory containing the running executable, or the working directory if
/// that can't be determined.
pub fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Settings {
    /// Directory static files are served from: always `base_dir/static`
    pub fn static_dir(&self) -> PathBuf {
        self.base_dir.join("static")
    }

    /// Manifest id of the active environment
    pub fn manifest_id(&self) -> Uuid {
        self.manifest_id_for(self.environment)
    }

    /// Manifest id of the given environment
    pub fn manifest_id_for(&self, environment: Environment) -> Uuid {
        match environment {
            Environment::Dev => self.manifest_id_dev,
            Environment::Qa => self.manifest_id_qa,
            Environment::Uat => self.manifest_id_uat,
            Environment::Staging => self.manifest_id_staging,
            Environment::Prod => self.manifest_id_prod,
        }
    }

    /// Map `log_level` onto a tracing level.
    ///
    /// Python-style names are understood (`WARNING`, `CRITICAL`); anything
    /// unrecognised falls back to INFO.
    pub fn tracing_level(&self) -> tracing::Level {
        match self.log_level.trim().to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" | "CRITICAL" | "FATAL" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }

    /// Copy of the settings that is safe to log or print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.secret_key.is_some() {
            copy.secret_key = Some(REDACTED.to_string());
        }
        if copy.license_key.as_deref().is_some_and(|key| !key.is_empty()) {
            copy.license_key = Some(REDACTED.to_string());
        }
        copy.object_cache_url = copy.object_cache_url.as_deref().map(redact_url);
        copy.socketio_message_queue_url =
            copy.socketio_message_queue_url.as_deref().map(redact_url);
        copy
    }

    /// Validate constraints that can't be checked while coercing single values
    pub fn validate(&self) -> crate::Result<()> {
        if !self.base_dir.is_dir() {
            return Err(crate::Error::invalid_value(
                "base_dir",
                self.base_dir.display().to_string(),
                "directory does not exist",
            ));
        }

        Ok(())
    }
}

/// Mask the password of a URL, leaving anything unparsable untouched
fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some(REDACTED)).is_ok() {
                parsed.to_string()
            } else {
                raw.to_string()
            }
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.add_security_headers);
        assert!(settings.auth_providers.is_empty());
        assert!(settings.auth_required_roles.is_empty());
        assert!(!settings.auth_entraid_multitenant);
        assert_eq!(settings.app_path, "");
        assert_eq!(
            settings.object_cache_expire_at.as_deref(),
            Some("0 12 * * sat")
        );
        assert!(settings.object_cache_enable_compression);
        assert_eq!(settings.cors_allow_origins, vec!["*"]);
        assert_eq!(settings.environment, Environment::Prod);
        assert_eq!(settings.functions_namespace, "XLWINGS");
        assert_eq!(settings.log_level, "INFO");
        assert_eq!(settings.project_name, "xlwings Server");
        assert!(!settings.public_addin_store);
        assert!(!settings.socketio_server_app);
        assert_eq!(settings.static_url_path, "/static");
        assert_eq!(settings.license_key.as_deref(), Some(""));
        assert_eq!(
            settings.manifest_id_prod.to_string(),
            "4d7d729f-c8ff-4e98-afb7-37c0a87a69da"
        );
    }

    #[test]
    fn test_default_manifest_ids_are_v4() {
        for env in Environment::ALL {
            assert_eq!(
                Settings::default().manifest_id_for(env).get_version_num(),
                4
            );
        }
    }

    #[test]
    fn test_static_dir_follows_base_dir() {
        let mut settings = Settings::default();
        settings.base_dir = PathBuf::from("/opt/xlwings");
        assert_eq!(settings.static_dir(), PathBuf::from("/opt/xlwings/static"));

        settings.base_dir = PathBuf::from("relative/app");
        assert_eq!(settings.static_dir(), PathBuf::from("relative/app/static"));
    }

    #[test]
    fn test_manifest_id_for_active_environment() {
        let mut settings = Settings::default();
        assert_eq!(settings.manifest_id(), DEFAULT_MANIFEST_ID_PROD);

        settings.environment = Environment::Qa;
        assert_eq!(settings.manifest_id(), DEFAULT_MANIFEST_ID_QA);
    }

    #[test]
    fn test_environment_round_trip() {
        for env in Environment::ALL {
            assert_eq!(env.as_str().parse::<Environment>().unwrap(), env);
        }
        assert!("production".parse::<Environment>().is_err());
    }

    #[test]
    fn test_tracing_level() {
        let mut settings = Settings::default();
        assert_eq!(settings.tracing_level(), tracing::Level::INFO);

        settings.log_level = "warning".to_string();
        assert_eq!(settings.tracing_level(), tracing::Level::WARN);

        settings.log_level = "CRITICAL".to_string();
        assert_eq!(settings.tracing_level(), tracing::Level::ERROR);

        settings.log_level = "chatty".to_string();
        assert_eq!(settings.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let mut settings = Settings::default();
        settings.secret_key = Some("s3cret".to_string());
        settings.license_key = Some("ABC123".to_string());
        settings.object_cache_url = Some("redis://:hunter2@cache:6379/0".to_string());
        settings.socketio_message_queue_url = Some("redis://queue:6379".to_string());

        let redacted = settings.redacted();
        assert_eq!(redacted.secret_key.as_deref(), Some("***"));
        assert_eq!(redacted.license_key.as_deref(), Some("***"));
        assert_eq!(
            redacted.object_cache_url.as_deref(),
            Some("redis://:***@cache:6379/0")
        );
        assert_eq!(
            redacted.socketio_message_queue_url.as_deref(),
            Some("redis://queue:6379")
        );
        // the original is untouched
        assert_eq!(settings.secret_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_redacted_keeps_empty_license_key() {
        let redacted = Settings::default().redacted();
        assert_eq!(redacted.license_key.as_deref(), Some(""));
        assert_eq!(redacted.secret_key, None);
    }

    #[test]
    fn test_validation_success() {
        let mut settings = Settings::default();
        settings.base_dir = std::env::temp_dir();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_base_dir() {
        let mut settings = Settings::default();
        settings.base_dir = PathBuf::from("/definitely/not/an/xlwings/install");
        let err = settings.validate().unwrap_err();
        assert_eq!(err.field(), Some("base_dir"));
    }
}
