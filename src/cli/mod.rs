//! Command line logic behind the `xlwings-settings` binary

pub mod check;
pub mod init;
pub mod show;

use std::io::IsTerminal;
use tracing_subscriber::{
    EnvFilter, Registry, filter::LevelFilter, fmt, layer::SubscriberExt, reload,
    util::SubscriberInitExt,
};

/// Handle to the installed log filter
#[derive(Debug)]
pub struct LogHandle {
    /// `None` when the level is pinned by `--verbose`, `RUST_LOG` or an
    /// already installed subscriber
    reload: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogHandle {
    /// Switch to the level the resolved settings ask for
    pub fn set_level(&self, level: tracing::Level) {
        if let Some(handle) = &self.reload
            && let Err(e) = handle.reload(level_filter(level))
        {
            tracing::warn!("Could not change log level to {}: {}", level, e);
        }
    }
}

fn level_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy("")
}

/// Install the global tracing subscriber before anything is resolved.
///
/// Logs go to stderr so command output on stdout stays machine readable.
/// The level is DEBUG with `verbose`, otherwise `RUST_LOG` or INFO; the
/// returned handle can lower or raise it later unless one of those pinned it.
pub fn init_logging(verbose: bool) -> LogHandle {
    let pinned = verbose || std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let filter = if verbose {
        level_filter(tracing::Level::DEBUG)
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy()
    };

    let (filter, handle) = reload::Layer::new(filter);
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal());

    // A subscriber may already be installed when embedded
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();

    LogHandle {
        reload: (installed && !pinned).then_some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_default_directive() {
        let filter = level_filter(tracing::Level::WARN);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
