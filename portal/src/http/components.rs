//! Component API client

use openapi_client::models::{Component, ComponentScope};

use crate::errors::PortalError;
use crate::http::client::{unwrap_list, HttpClient};

/// Filter for `list_components`
#[derive(Debug, Clone)]
pub struct ComponentQuery {
    pub usecase_id: String,
    pub scope: ComponentScope,
}

impl ComponentQuery {
    pub fn new(usecase_id: impl Into<String>, scope: ComponentScope) -> Self {
        Self {
            usecase_id: usecase_id.into(),
            scope,
        }
    }
}

impl HttpClient {
    /// List published components of one scope
    pub async fn list_components(&self, query: &ComponentQuery) -> Result<Vec<Component>, PortalError> {
        let params = [
            ("usecase_id", query.usecase_id.as_str()),
            ("scope", query.scope.as_str()),
        ];
        let payload: serde_json::Value = self.get("/components", &params).await?;
        unwrap_list(payload, "components")
    }
}
