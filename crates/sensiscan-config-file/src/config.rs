//! Scanner configuration schema

use sensiscan_core::{Error, Result};
use sensiscan_detect::EngineConfig;
use sensiscan_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration file contents
///
/// ```yaml
/// keywords: ["台独", "色情"]
/// max_rules: 10000
/// logging:
///   level: info
///   json: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScannerConfig {
    /// Reject settings the engine cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.engine.max_rules == 0 {
            return Err(Error::ConfigValidation(
                "'max_rules' must be greater than 0".to_string(),
            ));
        }

        if let Some(position) = self
            .engine
            .keywords
            .iter()
            .position(|keyword| keyword.trim().is_empty())
        {
            return Err(Error::ConfigValidation(format!(
                "'keywords[{position}]' must not be empty"
            )));
        }

        Ok(())
    }

    pub fn keywords(&self) -> &[String] {
        &self.engine.keywords
    }

    pub fn max_rules(&self) -> usize {
        self.engine.max_rules
    }
}
