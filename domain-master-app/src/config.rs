//! Application configuration (`config.toml`).
//!
//! Every field has a default, so an absent file or a partial file is valid:
//!
//! ```toml
//! [storage]
//! data_file = "/home/me/domains.json"
//!
//! [rdap]
//! base_url = "https://rdap.org"
//! timeout_secs = 10
//! request_delay_ms = 1000
//! unsupported_tlds = ["cn"]
//!
//! [log]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use domain_master_core::error::{CoreError, CoreResult};
use domain_master_rdap::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_UNSUPPORTED_TLDS, RdapClient, RdapResult,
};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "domain-master";

/// 获取配置目录路径
fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// 获取数据目录路径
fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub rdap: RdapConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// 域名数据文件；未设置时使用数据目录下的 `domains.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RdapConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// 批量刷新时每项之后的等待
    pub request_delay_ms: u64,
    pub unsupported_tlds: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `domain_master_rdap=debug`
    pub level: String,
}

impl Default for RdapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            request_delay_ms: 1000,
            unsupported_tlds: DEFAULT_UNSUPPORTED_TLDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            user_agent: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/domain-master/config.toml`
    #[must_use]
    pub fn default_path() -> PathBuf {
        get_config_dir().join("config.toml")
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file is an error.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("[Config] Loaded {}", path.display());
                Self::from_toml(&content).map_err(|e| match e {
                    CoreError::ValidationError(msg) => CoreError::ValidationError(format!(
                        "Invalid config file {}: {msg}",
                        path.display()
                    )),
                    other => other,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("[Config] {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(CoreError::StorageError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))),
        }
    }

    pub fn from_toml(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::ValidationError(e.to_string()))
    }
}

impl StorageConfig {
    /// Resolved data file path.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| get_data_dir().join("domains.json"))
    }
}

impl RdapConfig {
    #[must_use]
    pub const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Build an RDAP client from these settings.
    pub fn build_client(&self) -> RdapResult<RdapClient> {
        let mut builder = RdapClient::builder()
            .base_url(self.base_url.as_str())
            .timeout(Duration::from_secs(self.timeout_secs))
            .unsupported_tlds(self.unsupported_tlds.iter().map(String::as_str));
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        builder.build()
    }
}
