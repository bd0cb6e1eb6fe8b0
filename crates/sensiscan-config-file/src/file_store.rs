//! File-based configuration store

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ScannerConfig;
use sensiscan_core::{Error, Result};

/// Stream of configuration change notifications
pub type ConfigChangeStream<'a> = BoxStream<'a, Result<ConfigChange>>;

/// Configuration change notification
#[derive(Debug, Clone)]
pub struct ConfigChange {
    /// When the change was observed
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Configuration version after the change
    pub version: u32,
}

/// Where the scanner configuration lives
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read, parse and validate the configuration
    ///
    /// # Errors
    /// - `Error::Io` if the file can't be read
    /// - `Error::Config` if it doesn't parse
    /// - `Error::ConfigValidation` if it parses but is unusable
    async fn load(&self) -> Result<ScannerConfig>;

    /// Validate and persist a configuration
    async fn save(&self, config: &ScannerConfig) -> Result<()>;

    /// Watch for configuration changes
    ///
    /// The stream emits once per modify/create event on the file.
    async fn watch_changes(&self) -> Result<ConfigChangeStream<'_>>;
}

/// Configuration stored in a single YAML or TOML file
///
/// The format follows the file extension: `.toml` is TOML, anything else is
/// YAML.
#[derive(Debug)]
pub struct FileConfigStore {
    /// Path to the configuration file
    config_path: PathBuf,
    /// Configuration version counter (incremented on each observed change)
    version: Arc<AtomicU32>,
}

impl FileConfigStore {
    /// Open an existing configuration file
    ///
    /// A leading `~` is expanded to the home directory.
    ///
    /// # Errors
    /// - `Error::ConfigNotFound` if the file doesn't exist
    /// - `Error::Config` if `~` can't be expanded
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = expand_home(config_path.into())?;

        if !config_path.exists() {
            return Err(Error::ConfigNotFound);
        }

        info!("Initialized FileConfigStore for {:?}", config_path);

        Ok(Self {
            config_path,
            version: Arc::new(AtomicU32::new(1)),
        })
    }

    /// Write `config` to `path` and open a store on it
    pub async fn create(path: impl Into<PathBuf>, config: &ScannerConfig) -> Result<Self> {
        let config_path = expand_home(path.into())?;
        write_config_file(&config_path, config)?;
        Self::new(config_path).await
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }

    fn is_toml(&self) -> bool {
        is_toml(&self.config_path)
    }

    /// Read and parse the config file
    fn read_config_file(&self) -> Result<ScannerConfig> {
        let contents = std::fs::read_to_string(&self.config_path).map_err(|e| {
            error!("Failed to read config file: {}", e);
            Error::Io(e)
        })?;

        let config: ScannerConfig = if self.is_toml() {
            toml::from_str(&contents).map_err(|e| {
                error!("Failed to parse TOML config: {}", e);
                Error::Config(format!("Invalid TOML: {}", e))
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| {
                error!("Failed to parse YAML config: {}", e);
                Error::Config(format!("Invalid YAML: {}", e))
            })?
        };

        debug!("Successfully read config file");
        Ok(config)
    }
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
            .join(rest)),
        Err(_) => Ok(path),
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

fn write_config_file(path: &Path, config: &ScannerConfig) -> Result<()> {
    config.validate()?;

    let contents = if is_toml(path) {
        toml::to_string_pretty(config).map_err(|e| {
            error!("Failed to serialize TOML: {}", e);
            Error::Config(format!("TOML serialization error: {}", e))
        })?
    } else {
        serde_yaml::to_string(config).map_err(|e| {
            error!("Failed to serialize YAML: {}", e);
            Error::Config(format!("YAML serialization error: {}", e))
        })?
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, contents).map_err(|e| {
        error!("Failed to write config file: {}", e);
        Error::Io(e)
    })?;

    info!("Successfully wrote config file {:?}", path);
    Ok(())
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<ScannerConfig> {
        let config = self.read_config_file()?;
        config.validate()?;
        Ok(config)
    }

    async fn save(&self, config: &ScannerConfig) -> Result<()> {
        write_config_file(&self.config_path, config)?;
        self.version.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn watch_changes(&self) -> Result<ConfigChangeStream<'_>> {
        // Create a channel for file system events
        let (tx, rx) = mpsc::channel(100);

        let config_path = self.config_path.clone();
        let version = self.version.clone();

        // Editors often replace the file rather than write in place, which
        // drops a watch on the file itself. Watch the directory instead and
        // filter by path.
        let watch_dir = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = config_path.file_name().map(|name| name.to_os_string());

        tokio::task::spawn_blocking(move || {
            let (notify_tx, notify_rx) = std::sync::mpsc::channel();

            // Use std::result::Result to avoid conflict with our Result type
            let mut watcher = match RecommendedWatcher::new(
                move |res: std::result::Result<Event, notify::Error>| {
                    if let Err(e) = notify_tx.send(res) {
                        error!("Failed to send file watch event: {}", e);
                    }
                },
                notify::Config::default(),
            ) {
                Ok(w) => w,
                Err(e) => {
                    error!("Failed to create file watcher: {}", e);
                    return;
                }
            };

            if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
                error!("Failed to watch config directory: {}", e);
                return;
            }

            info!("Watching config file for changes: {:?}", config_path);

            while let Ok(event_result) = notify_rx.recv() {
                match event_result {
                    Ok(event) => {
                        let touches_config = event
                            .paths
                            .iter()
                            .any(|path| path.file_name() == file_name.as_deref());

                        if touches_config
                            && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                        {
                            let change = ConfigChange {
                                timestamp: chrono::Utc::now(),
                                version: version.fetch_add(1, Ordering::SeqCst) + 1,
                            };

                            if tx.blocking_send(Ok(change)).is_err() {
                                debug!("Config change stream closed, stopping watcher");
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("File watch error: {}", e);
                        if tx
                            .blocking_send(Err(Error::Internal(format!("File watch error: {}", e))))
                            .is_err()
                        {
                            break;
                        }
                    }
                }
            }
        });

        // Convert mpsc receiver to stream
        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::time::Duration;
    use tempfile::{NamedTempFile, TempDir};

    #[tokio::test]
    async fn test_file_not_found() {
        let result = FileConfigStore::new("/nonexistent/config.yaml").await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::ConfigNotFound));
    }

    #[tokio::test]
    async fn test_read_yaml_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path();

        std::fs::write(
            config_path,
            r#"
keywords:
  - "赌博"
  - "毒品"
max_rules: 100
logging:
  level: "warn"
  json: true
"#,
        )
        .unwrap();

        let store = FileConfigStore::new(config_path).await.unwrap();
        let config = store.load().await.unwrap();

        assert_eq!(config.keywords(), ["赌博".to_string(), "毒品".to_string()]);
        assert_eq!(config.max_rules(), 100);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json);
    }

    #[tokio::test]
    async fn test_read_toml_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sensiscan.toml");
        std::fs::write(
            &config_path,
            "keywords = [\"盗版\"]\nmax_rules = 3\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let store = FileConfigStore::new(&config_path).await.unwrap();
        let config = store.load().await.unwrap();

        assert_eq!(config.keywords(), ["盗版".to_string()]);
        assert_eq!(config.max_rules(), 3);
        assert_eq!(config.logging.level, "debug");
    }

    #[tokio::test]
    async fn test_invalid_yaml() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "keywords: [unclosed\n").unwrap();

        let store = FileConfigStore::new(temp_file.path()).await.unwrap();
        assert!(matches!(store.load().await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_load_validates() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "max_rules: 0\n").unwrap();

        let store = FileConfigStore::new(temp_file.path()).await.unwrap();
        assert!(matches!(
            store.load().await,
            Err(Error::ConfigValidation(_))
        ));
    }

    #[tokio::test]
    async fn test_save_round_trips_both_formats() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ScannerConfig::default();
        config.engine.keywords = vec!["血腥".to_string(), "杀人".to_string()];
        config.engine.max_rules = 42;

        for name in ["config.yaml", "config.toml"] {
            let store = FileConfigStore::create(temp_dir.path().join(name), &config)
                .await
                .unwrap();
            assert_eq!(store.load().await.unwrap(), config);

            config.engine.max_rules += 1;
            store.save(&config).await.unwrap();
            assert_eq!(store.version(), 2);
            assert_eq!(store.load().await.unwrap(), config);
        }
    }

    #[tokio::test]
    async fn test_create_makes_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/config.yaml");

        let store = FileConfigStore::create(&path, &ScannerConfig::default())
            .await
            .unwrap();
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.load().await.unwrap(), ScannerConfig::default());
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_config() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "{}\n").unwrap();
        let store = FileConfigStore::new(temp_file.path()).await.unwrap();

        let mut config = ScannerConfig::default();
        config.engine.keywords = vec![String::new()];

        assert!(store.save(&config).await.is_err());
        assert_eq!(store.version(), 1);
        assert_eq!(store.load().await.unwrap(), ScannerConfig::default());
    }

    #[tokio::test]
    async fn test_watch_reports_modifications() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "max_rules: 10\n").unwrap();

        let store = FileConfigStore::new(&config_path).await.unwrap();
        let mut changes = store.watch_changes().await.unwrap();

        // The watcher registers on a blocking thread; keep touching the file
        // until it reports.
        let writer_path = config_path.clone();
        let writer = tokio::spawn(async move {
            for i in 0..50 {
                std::fs::write(&writer_path, format!("max_rules: {}\n", 11 + i)).unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        });

        let change = tokio::time::timeout(Duration::from_secs(10), changes.next())
            .await
            .expect("no change observed")
            .expect("stream ended")
            .unwrap();

        assert!(change.version >= 2);
        writer.abort();
    }
}
