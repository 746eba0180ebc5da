use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chat_core::Timings;
use chat_engine::BackendSettings;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "support_widget.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// A pre-defined prompt shown as a chip above the input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub backend_url: String,
    pub api_key: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub focus_delay_ms: u64,
    pub agent_join_delay_ms: u64,
    pub quick_actions: Vec<QuickAction>,
    /// Where the rendered widget page is written after each change; `None` disables it.
    pub page_snapshot: Option<PathBuf>,
    pub log_destination: LogDestination,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            api_key: None,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            focus_delay_ms: 300,
            agent_join_delay_ms: 2_000,
            quick_actions: vec![
                QuickAction {
                    label: "Reset router".to_string(),
                    query: "How do I reset my router?".to_string(),
                },
                QuickAction {
                    label: "Slow internet".to_string(),
                    query: "My internet is very slow, what can I do?".to_string(),
                },
                QuickAction {
                    label: "Billing".to_string(),
                    query: "Why is my bill higher this month?".to_string(),
                },
            ],
            page_snapshot: Some(PathBuf::from("chat_widget.html")),
            log_destination: LogDestination::File,
        }
    }
}

impl WidgetConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            focus_delay: Duration::from_millis(self.focus_delay_ms),
            agent_join_delay: Duration::from_millis(self.agent_join_delay_ms),
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            api_key: self.api_key.clone().filter(|key| !key.is_empty()),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

/// Reads `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<WidgetConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(WidgetConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
