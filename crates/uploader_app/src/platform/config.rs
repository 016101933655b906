use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uploader_core::{ModalSpec, PageLayout};
use uploader_engine::ClientSettings;
use uploader_logging::{uploader_info, uploader_warn};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "uploader.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("poll_interval_ms must be greater than zero")]
    ZeroPollInterval,
    #[error("invalid base url {url:?}: {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_poll_failures: u32,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub selection_modal: String,
    pub progress_modal: String,
    pub modals: Vec<ModalConfig>,
    pub publishers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalConfig {
    pub id: String,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub close: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            poll_interval_ms: 2000,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_poll_failures: 3,
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            selection_modal: "upload-dataset".to_string(),
            progress_modal: "fetch-progress".to_string(),
            modals: vec![
                ModalConfig {
                    id: "upload-dataset".to_string(),
                    trigger: Some("upload-dataset-link".to_string()),
                    close: vec!["upload-dataset-close".to_string()],
                },
                ModalConfig {
                    id: "fetch-progress".to_string(),
                    trigger: None,
                    close: vec!["fetch-progress-close".to_string()],
                },
            ],
            publishers: Vec::new(),
        }
    }
}

impl PageConfig {
    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        // Endpoint paths are appended, so the base must read as a directory.
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;

        Ok(ClientSettings {
            base_url,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_poll_failures: self.max_poll_failures,
        })
    }

    pub fn page_layout(&self) -> PageLayout {
        PageLayout {
            selection_modal: self.layout.selection_modal.clone(),
            progress_modal: self.layout.progress_modal.clone(),
            modals: self
                .layout
                .modals
                .iter()
                .map(|modal| ModalSpec {
                    id: modal.id.clone(),
                    trigger: modal.trigger.clone(),
                    close_controls: modal.close.clone(),
                })
                .collect(),
            publishers: self.layout.publishers.clone(),
        }
    }
}

/// Loads the page configuration; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PageConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            uploader_warn!("No config at {:?}; using defaults", path);
            return Ok(PageConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: PageConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    uploader_info!("Loaded page config from {:?}", path);
    Ok(config)
}
