//! Use case and device API client

use openapi_client::models::{Device, UseCase};

use crate::errors::PortalError;
use crate::http::client::{unwrap_list, HttpClient};
use crate::http::segment;

impl HttpClient {
    /// List every use case visible to the caller
    pub async fn list_use_cases(&self) -> Result<Vec<UseCase>, PortalError> {
        let payload: serde_json::Value = self.get("/usecases", &[]).await?;
        unwrap_list(payload, "usecases")
    }

    /// List the devices registered under a use case
    pub async fn list_devices(&self, usecase_id: &str) -> Result<Vec<Device>, PortalError> {
        let path = format!("/usecases/{}/devices", segment(usecase_id));
        let payload: serde_json::Value = self.get(&path, &[]).await?;
        unwrap_list(payload, "devices")
    }
}
