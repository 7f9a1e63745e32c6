//! Settings file management

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::logs::LogLevel;

/// Environment variable overriding `backend.base_url`
pub const ENV_BASE_URL: &str = "DDA_PORTAL_BASE_URL";

/// Environment variable overriding `backend.api_token`
pub const ENV_API_TOKEN: &str = "DDA_PORTAL_API_TOKEN";

/// Name prefix of the on-device local server agent component
pub const DEFAULT_RECOMMENDED_PREFIX: &str = "aws.edgeml.dda.LocalServer";

/// Portal client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON logs
    #[serde(default)]
    pub json_logs: bool,

    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub polling: PollingSettings,

    /// Components whose name starts with this prefix are always recommended
    #[serde(default = "default_recommended_prefix")]
    pub recommended_prefix: String,
}

fn default_recommended_prefix() -> String {
    DEFAULT_RECOMMENDED_PREFIX.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            json_logs: false,
            backend: BackendSettings::default(),
            polling: PollingSettings::default(),
            recommended_prefix: default_recommended_prefix(),
        }
    }
}

impl Settings {
    /// Apply environment overrides on top of the file contents
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_API_TOKEN).ok(),
        );
    }

    fn apply_overrides(&mut self, base_url: Option<String>, api_token: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.backend.base_url = url;
        }
        if let Some(token) = api_token.filter(|t| !t.trim().is_empty()) {
            self.backend.api_token = Some(SecretString::from(token));
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Bearer token sent with every request. Never written back to disk.
    #[serde(default, skip_serializing)]
    pub api_token: Option<SecretString>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Status polling intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    #[serde(default = "default_training_interval")]
    pub training_interval_secs: u64,

    #[serde(default = "default_deployment_interval")]
    pub deployment_interval_secs: u64,
}

fn default_training_interval() -> u64 {
    30
}

fn default_deployment_interval() -> u64 {
    10
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            training_interval_secs: default_training_interval(),
            deployment_interval_secs: default_deployment_interval(),
        }
    }
}
