//! Application configuration options

use std::time::Duration;

use secrecy::SecretString;

use crate::logs::LogOptions;
use crate::storage::settings::Settings;
use crate::workers::poller;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub backend_base_url: String,

    /// Bearer token for the backend
    pub api_token: Option<SecretString>,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Name prefix of always-recommended components
    pub recommended_prefix: String,

    /// Training job watcher
    pub training_poller: poller::Options,

    /// Deployment watcher
    pub deployment_poller: poller::Options,

    pub log: LogOptions,
}

impl AppOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            backend_base_url: settings.backend.base_url.clone(),
            api_token: settings.backend.api_token.clone(),
            request_timeout: Duration::from_secs(settings.backend.timeout_secs.max(1)),
            recommended_prefix: settings.recommended_prefix.clone(),
            training_poller: poller::Options {
                interval: Duration::from_secs(settings.polling.training_interval_secs.max(1)),
            },
            deployment_poller: poller::Options {
                interval: Duration::from_secs(settings.polling.deployment_interval_secs.max(1)),
            },
            log: LogOptions {
                log_level: settings.log_level,
                json_format: settings.json_logs,
            },
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
