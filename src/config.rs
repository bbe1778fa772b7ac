//! Configuration for filekv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Fixed name of the store file inside the data directory
pub const DEFAULT_STORE_FILE: &str = "store.json";

/// Main configuration for a filekv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the store file. The engine expects it to exist;
    /// the server binary creates it on startup.
    pub data_dir: PathBuf,

    /// File name of the store inside `data_dir`
    pub store_file_name: String,

    /// Max serialized size of the whole store (bytes)
    pub max_store_bytes: usize,

    /// Max serialized size of a single record (bytes)
    pub max_record_bytes: usize,

    /// Max key length (characters)
    pub max_key_chars: usize,

    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// Worker threads used to stamp records during a bulk create
    pub stamp_workers: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./filekv_data"),
            store_file_name: DEFAULT_STORE_FILE.to_string(),
            max_store_bytes: 1_000_000_000, // 1 GB
            max_record_bytes: 16 * 1024,    // 16 KB
            max_key_chars: 32,
            stamp_workers: 4,
            listen_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (holds the store file)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the store file name
    pub fn store_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.store_file_name = name.into();
        self
    }

    /// Set the maximum serialized store size (in bytes)
    pub fn max_store_bytes(mut self, bytes: usize) -> Self {
        self.config.max_store_bytes = bytes;
        self
    }

    /// Set the maximum serialized record size (in bytes)
    pub fn max_record_bytes(mut self, bytes: usize) -> Self {
        self.config.max_record_bytes = bytes;
        self
    }

    /// Set the maximum key length (in characters)
    pub fn max_key_chars(mut self, chars: usize) -> Self {
        self.config.max_key_chars = chars;
        self
    }

    /// Set the number of stamping workers for bulk creates
    pub fn stamp_workers(mut self, workers: usize) -> Self {
        self.config.stamp_workers = workers.max(1);
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = Config::default();
        assert_eq!(config.max_store_bytes, 1_000_000_000);
        assert_eq!(config.max_record_bytes, 16_384);
        assert_eq!(config.max_key_chars, 32);
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::builder()
            .data_dir("/tmp/kv")
            .store_file_name("db.json")
            .stamp_workers(0)
            .build();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/kv"));
        assert_eq!(config.store_file_name, "db.json");
        // Worker count is clamped to at least one
        assert_eq!(config.stamp_workers, 1);
    }
}
