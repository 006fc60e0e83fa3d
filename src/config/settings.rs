use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::{GatewayError, Result};
use crate::sanitizer::{ApiSource, SanitizerConfig};

const CONFIG_FILE_NAMES: [&str; 2] = ["custom-config.toml", "config.toml"];
const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Provider used when the requested model carries no `provider/` prefix.
    /// With exactly one configured provider this may stay unset.
    pub default_provider: Option<String>,
    pub server: ServerConfig,
    pub routing: RoutingConfig,
    pub sanitizer: SanitizerConfig,
    pub logging: LoggingConfig,
    pub providers: HashMap<String, Provider>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub name: String,
    pub source: ApiSource,
    pub base_url: String,
    #[serde(default)]
    pub api_keys: Vec<String>,
    pub models_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RoutingConfig {
    pub key_strategy: KeyStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    #[default]
    FirstAvailable,
    RoundRobin,
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub database_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            database_path: "data/effortgate.db".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                let settings = Self::parse(&content)?;
                tracing::info!("Loaded configuration from {}", path.display());
                Ok(settings)
            }
            None => {
                // A missing config file is not fatal; requests still flow.
                tracing::warn!("No configuration file found, running with built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut settings: Settings =
            toml::from_str(content).map_err(|e| GatewayError::Config(e.to_string()))?;

        for (name, provider) in &mut settings.providers {
            provider.name = name.clone();
        }

        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| GatewayError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Where settings updates get persisted: the file they were loaded from,
    /// or the default location when none exists yet.
    pub fn config_path() -> PathBuf {
        Self::find_config_file().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAMES[1]))
    }

    fn find_config_file() -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }
}

/// Debounced settings writer. Updates are fire-and-forget; the newest
/// snapshot wins and callers never wait on the disk write.
#[derive(Clone)]
pub struct SettingsSaver {
    tx: mpsc::UnboundedSender<Settings>,
}

impl SettingsSaver {
    pub fn spawn(path: PathBuf) -> Self {
        Self::spawn_with(path, SAVE_DEBOUNCE)
    }

    pub fn spawn_with(path: PathBuf, debounce: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Settings>();
        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                let deadline = tokio::time::sleep(debounce);
                tokio::pin!(deadline);
                loop {
                    tokio::select! {
                        _ = &mut deadline => break,
                        next = rx.recv() => match next {
                            Some(settings) => latest = settings,
                            None => break,
                        },
                    }
                }
                if let Err(e) = latest.save_to(&path) {
                    tracing::error!("Failed to persist settings to {}: {}", path.display(), e);
                }
            }
        });
        Self { tx }
    }

    pub fn schedule(&self, settings: Settings) {
        // The channel only closes when the writer task is gone (shutdown).
        let _ = self.tx.send(settings);
    }
}
