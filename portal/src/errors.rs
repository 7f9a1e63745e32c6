//! Error types for the DDA portal

use thiserror::Error;

/// Main error type for the DDA portal
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Non-success response from the backend. `message` is the backend's own
    /// text when it sent one.
    #[error("Backend error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Manifest blocked: {0}")]
    ManifestBlocked(String),

    #[error("Incompatible component: {0}")]
    IncompatibleComponent(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Shutdown: {0}")]
    Shutdown(String),
}

impl PortalError {
    /// The text shown to the operator in an inline alert.
    ///
    /// Backend messages are passed through verbatim; transport failures all
    /// read the same regardless of cause.
    pub fn alert_message(&self) -> String {
        match self {
            PortalError::ApiError { message, .. } => message.clone(),
            PortalError::HttpError(_) | PortalError::UrlError(_) => {
                "Unable to reach the portal backend. Please try again.".to_string()
            }
            PortalError::JsonError(_) => "The backend returned an unexpected response.".to_string(),
            PortalError::ValidationError(msg)
            | PortalError::ManifestBlocked(msg)
            | PortalError::IncompatibleComponent(msg)
            | PortalError::ConfigError(msg)
            | PortalError::NotFound(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// A dismissible inline alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    dismissed: bool,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            dismissed: false,
        }
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_visible(&self) -> bool {
        !self.dismissed
    }
}

impl From<&PortalError> for Alert {
    fn from(err: &PortalError) -> Self {
        Alert::new(err.alert_message())
    }
}
