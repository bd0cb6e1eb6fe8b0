//! Sensiscan CLI
//!
//! Command-line interface for scanning and masking sensitive data

mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sensiscan_config_file::{ConfigStore, FileConfigStore, KeywordReloader, ScannerConfig};
use sensiscan_detect::{DetectionEngine, mask_text};
use sensiscan_observability::{Metrics, init_logging};
use sensiscan_rules::{InMemoryRuleStore, RuleStore};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sensiscan")]
#[command(about = "Sensiscan - Sensitive data detection", long_about = None)]
struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(long, global = true, env = "SENSISCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Where to write the configuration
        #[arg(long, default_value = "~/.sensiscan/config.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Scan text for sensitive data
    Scan {
        /// Text to scan; read from --file or stdin when omitted
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Only scan the high-risk structured categories
        #[arg(long, default_value = "false")]
        realtime: bool,

        /// Print the result as JSON
        #[arg(long, default_value = "false")]
        json: bool,

        /// Print Prometheus metrics after the result
        #[arg(long, default_value = "false")]
        metrics: bool,
    },
    /// Print the text with every detected item masked
    Mask {
        /// Text to mask; read from --file or stdin when omitted
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// List the supported categories
    Categories {
        /// Print as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// List the built-in keyword rules
    Rules {
        /// Print as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Rescan a file every time the configuration changes
    Watch {
        /// File to rescan
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { path, force } = &cli.command {
        return init_config(path.clone(), *force).await;
    }

    let (store, mut config) = match &cli.config {
        Some(path) => {
            let store = FileConfigStore::new(path.clone())
                .await
                .with_context(|| format!("Failed to open config {}", path.display()))?;
            let config = store.load().await?;
            (Some(Arc::new(store)), config)
        }
        None => (None, ScannerConfig::default()),
    };

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Scan {
            text,
            file,
            realtime,
            json,
            metrics,
        } => {
            let text = read_input(text, file)?;
            let registry = Metrics::new()?;
            let engine = DetectionEngine::new(config.engine)?
                .with_recorder(Arc::new(registry.clone()));

            let result = if realtime {
                engine.detect_realtime(&text)
            } else {
                engine.detect(&text)
            };

            if json {
                println!("{}", output::render_json(&result)?);
            } else {
                print!("{}", output::render_human(&result));
            }
            if metrics {
                print!("{}", registry.gather_text()?);
            }
        }
        Commands::Mask { text, file } => {
            let text = read_input(text, file)?;
            let engine = DetectionEngine::new(config.engine)?;
            let result = engine.detect(&text);
            println!("{}", mask_text(&text, result.items()));
        }
        Commands::Categories { json } => {
            let engine = DetectionEngine::new(config.engine)?;
            if json {
                println!("{}", output::categories_json(engine.registry())?);
            } else {
                print!("{}", output::categories_table(engine.registry()));
            }
        }
        Commands::Rules { json } => {
            let engine = Arc::new(DetectionEngine::new(config.engine)?);
            let rules = InMemoryRuleStore::with_defaults().with_sink(engine.clone());
            let keywords = rules.refresh();
            info!(keywords, "Rule store synced to engine");

            if json {
                println!("{}", serde_json::to_string_pretty(&rules.list())?);
            } else {
                print!("{}", output::rules_table(&rules.list()));
            }
        }
        Commands::Watch { input } => {
            let store = store.context("watch requires --config")?;
            watch(store, config, input).await?;
        }
    }

    Ok(())
}

async fn init_config(path: PathBuf, force: bool) -> anyhow::Result<()> {
    if !force && FileConfigStore::new(path.clone()).await.is_ok() {
        anyhow::bail!("{} already exists, pass --force to overwrite", path.display());
    }

    let store = FileConfigStore::create(path, &ScannerConfig::default()).await?;
    println!("Wrote {}", store.path().display());
    Ok(())
}

async fn watch(
    store: Arc<FileConfigStore>,
    config: ScannerConfig,
    input: PathBuf,
) -> anyhow::Result<()> {
    let engine = Arc::new(DetectionEngine::new(config.engine)?);
    let rescan = {
        let engine = engine.clone();
        move || match std::fs::read_to_string(&input) {
            Ok(text) => print!("{}", output::render_human(&engine.detect(&text))),
            Err(e) => warn!("Failed to read {}: {}", input.display(), e),
        }
    };

    rescan();
    let reloader = KeywordReloader::new(store, engine);

    tokio::select! {
        result = reloader.run(|_, count| {
            println!("Configuration reloaded ({} keywords)", count);
            rescan();
        }) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, stopping watch"),
    }

    Ok(())
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(file) = file {
        return std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}
