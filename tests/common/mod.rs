//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::NamedTempFile;
    use xlwings_server_settings::ConfigLoader;

    // Static mutex to ensure environment variable tests don't interfere with each other
    pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    /// Write an override file with the given content
    pub fn dotenv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    /// Loader with its own prefix reading `path` as override file
    pub fn loader(prefix: &str, path: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_prefix(prefix)
            .with_dotenv_path(path)
    }

    /// Path inside a fresh temp dir that does not exist
    pub fn missing_dotenv(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join(".env")
    }

    /// Set environment variables for the lifetime of the guard
    pub struct EnvGuard {
        keys: Vec<String>,
    }

    impl EnvGuard {
        pub fn set(vars: &[(&str, &str)]) -> Self {
            for (key, value) in vars {
                unsafe { std::env::set_var(key, value) };
            }
            Self {
                keys: vars.iter().map(|(key, _)| key.to_string()).collect(),
            }
        }

        /// Also remove these variables when the guard drops
        pub fn cleanup(mut self, keys: &[&str]) -> Self {
            self.keys.extend(keys.iter().map(|key| key.to_string()));
            self
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                unsafe { std::env::remove_var(key) };
            }
        }
    }
}
