//! `show` command: print the resolved settings

use crate::{Result, config::Settings};
use clap::ValueEnum;
use serde_json::Value;

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
    /// `PREFIX_KEY=value` lines that can be used as an override file
    Env,
}

/// Arguments for the show command
#[derive(Debug, Clone)]
pub struct ShowArgs {
    pub format: OutputFormat,
    /// Print secrets instead of masking them
    pub reveal: bool,
}

/// Render settings in the requested format
pub fn render(settings: &Settings, args: &ShowArgs, prefix: &str) -> Result<String> {
    let settings = if args.reveal {
        settings.clone()
    } else {
        settings.redacted()
    };

    let mut value = serde_json::to_value(&settings)?;

    match args.format {
        OutputFormat::Json => {
            insert_static_dir(&mut value, &settings);
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Toml => {
            insert_static_dir(&mut value, &settings);
            Ok(toml::to_string(&value)?)
        }
        OutputFormat::Env => render_env(&value, prefix),
    }
}

fn insert_static_dir(value: &mut Value, settings: &Settings) {
    if let Value::Object(map) = value {
        map.insert(
            "static_dir".to_string(),
            Value::String(settings.static_dir().display().to_string()),
        );
    }
}

fn render_env(value: &Value, prefix: &str) -> Result<String> {
    let Value::Object(map) = value else {
        return Err(crate::Error::config("settings did not serialize to a map"));
    };

    let mut out = String::new();
    for (key, value) in map {
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Array(_) => serde_json::to_string(value)?,
            other => other.to_string(),
        };
        out.push_str(&format!(
            "{}{}={}\n",
            prefix,
            key.to_uppercase(),
            quote_env_value(&raw)
        ));
    }
    Ok(out)
}

/// Double-quote a value for a dotenv file when it needs it
fn quote_env_value(raw: &str) -> String {
    let plain = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@%+,".contains(c));
    if plain {
        return raw.to_string();
    }

    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        match c {
            '"' | '\\' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn sample() -> Settings {
        let mut settings = Settings::default();
        settings.base_dir = PathBuf::from("/opt/xlwings");
        settings.secret_key = Some("s3cret".to_string());
        settings
    }

    #[test]
    fn test_render_json_includes_static_dir() {
        let args = ShowArgs {
            format: OutputFormat::Json,
            reveal: false,
        };
        let out = render(&sample(), &args, "XLWINGS_").unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["static_dir"], "/opt/xlwings/static");
        assert_eq!(json["environment"], "prod");
        assert_eq!(json["secret_key"], "***");
        assert_eq!(json["cors_allow_origins"], serde_json::json!(["*"]));
        assert!(json.get("date_format").is_none());
    }

    #[test]
    fn test_render_reveal() {
        let args = ShowArgs {
            format: OutputFormat::Json,
            reveal: true,
        };
        let out = render(&sample(), &args, "XLWINGS_").unwrap();
        assert!(out.contains("s3cret"));
    }

    #[test]
    fn test_render_toml() {
        let args = ShowArgs {
            format: OutputFormat::Toml,
            reveal: false,
        };
        let out = render(&sample(), &args, "XLWINGS_").unwrap();
        let parsed: toml::Table = toml::from_str(&out).unwrap();

        assert_eq!(parsed["project_name"].as_str(), Some("xlwings Server"));
        assert_eq!(parsed["static_dir"].as_str(), Some("/opt/xlwings/static"));
        assert_eq!(parsed["enable_htmx"].as_bool(), Some(true));
    }

    #[test]
    fn test_render_env_lines() {
        let args = ShowArgs {
            format: OutputFormat::Env,
            reveal: true,
        };
        let out = render(&sample(), &args, "XLWINGS_").unwrap();

        assert!(out.contains("XLWINGS_PROJECT_NAME=\"xlwings Server\"\n"));
        assert!(out.contains("XLWINGS_CORS_ALLOW_ORIGINS=\"[\\\"*\\\"]\"\n"));
        assert!(out.contains("XLWINGS_ENABLE_HTMX=true\n"));
        assert!(out.contains("XLWINGS_APP_PATH=\"\"\n"));
        assert!(!out.contains("STATIC_DIR"));
    }

    #[test]
    fn test_quote_env_value() {
        assert_eq!(quote_env_value("redis://cache:6379"), "redis://cache:6379");
        assert_eq!(quote_env_value("0 12 * * sat"), "\"0 12 * * sat\"");
        assert_eq!(quote_env_value("a$b"), "\"a\\$b\"");
        assert_eq!(quote_env_value(""), "\"\"");
    }
}
