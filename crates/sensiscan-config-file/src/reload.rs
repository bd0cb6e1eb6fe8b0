//! Keyword hot reload driven by configuration changes

use crate::config::ScannerConfig;
use crate::file_store::ConfigStore;
use futures::StreamExt;
use sensiscan_core::Result;
use sensiscan_detect::DetectionEngine;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Pushes the configured keyword set into an engine whenever the
/// configuration changes
///
/// A configuration that fails to load or validate is logged and skipped; the
/// engine keeps serving its current keywords.
pub struct KeywordReloader<S> {
    store: Arc<S>,
    engine: Arc<DetectionEngine>,
}

impl<S: ConfigStore + 'static> KeywordReloader<S> {
    pub fn new(store: Arc<S>, engine: Arc<DetectionEngine>) -> Self {
        Self { store, engine }
    }

    /// Load the configuration once and apply its keywords
    ///
    /// Returns the applied configuration and the number of keywords now
    /// served.
    pub async fn reload(&self) -> Result<(ScannerConfig, usize)> {
        let config = self.store.load().await?;
        let count = self
            .engine
            .update_keywords(config.engine.keywords.clone(), config.max_rules());
        Ok((config, count))
    }

    /// Apply every change until the change stream ends
    ///
    /// `on_reload` runs after each successful reload.
    pub async fn run<F>(&self, mut on_reload: F) -> Result<()>
    where
        F: FnMut(&ScannerConfig, usize),
    {
        let mut changes = self.store.watch_changes().await?;

        while let Some(change) = changes.next().await {
            let change = match change {
                Ok(change) => change,
                Err(e) => {
                    warn!("Config watch error: {}", e);
                    continue;
                }
            };

            match self.reload().await {
                Ok((config, count)) => {
                    info!(
                        version = change.version,
                        keywords = count,
                        "Applied configuration change"
                    );
                    on_reload(&config, count);
                }
                Err(e) => {
                    warn!(
                        version = change.version,
                        "Rejected configuration change, keeping current keywords: {}", e
                    );
                }
            }
        }

        Ok(())
    }

    /// Run in the background until the change stream ends
    pub fn spawn(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run(|_, _| {}).await })
    }
}
