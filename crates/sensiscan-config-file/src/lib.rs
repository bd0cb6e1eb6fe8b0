//! File-based scanner configuration for Sensiscan
//!
//! This crate loads the scanner configuration from a YAML or TOML file and
//! keeps a running engine's keyword set in sync with it.
//!
//! # Features
//! - YAML and TOML formats, chosen by file extension
//! - Validation before anything reaches the engine
//! - Real-time file watching with `notify`
//! - Keyword hot reload that keeps the previous set on a bad edit
//!
//! # Example
//! ```no_run
//! # use sensiscan_config_file::{ConfigStore, FileConfigStore};
//! # async fn example() -> sensiscan_core::Result<()> {
//! let store = FileConfigStore::new("~/.sensiscan/config.yaml").await?;
//! let config = store.load().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod file_store;
mod reload;

pub use config::ScannerConfig;
pub use file_store::{ConfigChange, ConfigChangeStream, ConfigStore, FileConfigStore};
pub use reload::KeywordReloader;
