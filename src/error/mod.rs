//! Error handling for settings resolution
//!
//! This module defines the error types returned by the loader and the CLI helpers.

pub mod types;

pub use types::{Error, Result};
