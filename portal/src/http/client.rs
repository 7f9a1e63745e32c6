//! HTTP client implementation

use std::time::Duration;

use openapi_client::models::ErrorResponse;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

use crate::errors::PortalError;
use crate::utils::generate_request_id;

/// HTTP client for the portal backend
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_token: Option<SecretString>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PortalError> {
        // Reject garbage early instead of on the first request
        let parsed = Url::parse(base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PortalError::ConfigError(format!(
                "Backend URL must be http or https: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ddaportal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
        })
    }

    /// Attach a bearer token sent with every request
    pub fn with_api_token(mut self, token: Option<SecretString>) -> Self {
        self.api_token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-Request-Id", generate_request_id());
        match &self.api_token {
            Some(token) => request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PortalError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let request = self.authorize(self.client.get(&url).query(query));
        self.execute("GET", request).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PortalError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let request = self.authorize(self.client.post(&url).json(body));
        self.execute("POST", request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
    ) -> Result<T, PortalError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(api_error(status, &body));
        }

        let body = response.json().await?;
        Ok(body)
    }
}

/// Build an `ApiError`, passing a structured backend message through verbatim
pub(crate) fn api_error(status: StatusCode, body: &str) -> PortalError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.best_message().map(str::to_string))
        .unwrap_or_else(|| generic_message(status));

    PortalError::ApiError {
        status: status.as_u16(),
        message,
    }
}

fn generic_message(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => "The requested resource was not found (status 404).".to_string(),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => format!(
            "You are not authorized to perform this action (status {}).",
            status.as_u16()
        ),
        _ => format!("Request failed with status {}", status.as_u16()),
    }
}

/// Pull a list out of a payload that is either a bare array or an object
/// holding the array under `key`.
pub(crate) fn unwrap_list<T: DeserializeOwned>(
    payload: serde_json::Value,
    key: &str,
) -> Result<Vec<T>, PortalError> {
    match payload {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(payload)?),
        serde_json::Value::Object(mut map) => match map.remove(key) {
            Some(list) => Ok(serde_json::from_value(list)?),
            None => Err(serde_json::Error::custom(format!("response is missing the '{}' list", key)).into()),
        },
        _ => Err(serde_json::Error::custom(format!("expected a list of {}", key)).into()),
    }
}
