//! xlwings Server settings
//!
//! Resolves the configuration of an xlwings Server deployment from, in
//! increasing precedence, compiled-in defaults, an optional `.env`-style
//! override file and `XLWINGS_*` environment variables.
//!
//! # Usage
//!
//! Resolve once at startup, before spawning any threads:
//!
//! ```no_run
//! use xlwings_server_settings::config;
//!
//! # fn main() -> xlwings_server_settings::Result<()> {
//! let settings = config::init()?;
//! println!("serving static files from {}", settings.static_dir().display());
//! # Ok(())
//! # }
//! ```
//!
//! Everything after that reads the same record through [`config::get`].
//!
//! # Sources
//!
//! - Override file: path from `DOTENV_PATH`, default `.env` in the working
//!   directory. A missing file is not an error.
//! - Environment: `XLWINGS_` followed by the upper-cased field name, e.g.
//!   `XLWINGS_ENABLE_HTMX=false`. Unknown `XLWINGS_` variables are ignored.
//!
//! After resolving, the license key and the date format are exported to the
//! process environment for collaborators that only read them from there; see
//! [`config::exports`].

pub mod cli;
pub mod config;
pub mod error;
pub mod utils;

pub use config::{ConfigLoader, Environment, ProcessExports, Settings};
pub use error::{Error, Result};
