//! `init` command: give a fresh install its own manifest ids
//!
//! Writes a random v4 UUID for every `<PREFIX>MANIFEST_ID_<ENV>` key into the
//! override file. Keys still holding a shipped placeholder are replaced, keys
//! with a custom value are kept unless `force` is set. All other lines of the
//! file are left as they are.

use crate::{
    Result,
    config::{Environment, Settings},
};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Arguments for the init command
#[derive(Debug, Clone)]
pub struct InitArgs {
    /// Replace manifest ids that were already customised
    pub force: bool,
}

/// Outcome of an init run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Keys that received a new id
    pub written: Vec<String>,
    /// Keys left alone because they already held a custom id
    pub kept: Vec<String>,
}

/// Update the manifest ids in the override file at `path`, creating it if needed
pub fn run_init(path: &Path, prefix: &str, args: &InitArgs) -> Result<InitReport> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();
    let mut report = InitReport::default();
    let defaults = Settings::default();

    for env in Environment::ALL {
        let key = format!("{prefix}MANIFEST_ID_{}", env.as_str().to_uppercase());
        let placeholder = defaults.manifest_id_for(env);
        let new_line = format!("{key}={}", Uuid::new_v4());

        let matching: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line_key(line).is_some_and(|k| k.eq_ignore_ascii_case(&key)))
            .map(|(idx, _)| idx)
            .collect();

        // The last assignment is the one a dotenv reader ends up with
        let (Some(&first), Some(&last)) = (matching.first(), matching.last()) else {
            lines.push(new_line);
            report.written.push(key);
            continue;
        };

        let is_placeholder = line_value(&lines[last])
            .and_then(|v| Uuid::parse_str(v).ok())
            .is_some_and(|id| id == placeholder);
        if args.force || is_placeholder {
            lines[first] = new_line;
            for &idx in matching[1..].iter().rev() {
                lines.remove(idx);
            }
            report.written.push(key);
        } else {
            report.kept.push(key);
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content)?;

    info!(
        "Updated {} manifest id(s) in {:?}",
        report.written.len(),
        path
    );

    Ok(report)
}

/// Key of a `KEY=value` line, skipping comments and an `export` prefix
fn line_key(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    line.split_once('=').map(|(key, _)| key.trim())
}

/// Value of a `KEY=value` line without quotes or a trailing comment
fn line_value(line: &str) -> Option<&str> {
    let (_, value) = line.split_once('=')?;
    let value = value.trim();

    if let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let rest = &value[1..];
        return Some(rest.find(quote).map_or(rest, |end| &rest[..end]));
    }

    let value = match value.find(" #") {
        Some(end) => &value[..end],
        None => value,
    };
    Some(value.trim_end())
}
