//! Deployment API client

use openapi_client::models::{CreateDeploymentRequest, CreateDeploymentResponse, Deployment};

use crate::errors::PortalError;
use crate::http::client::HttpClient;
use crate::http::segment;

impl HttpClient {
    /// Fetch one deployment with its current status
    pub async fn get_deployment(&self, deployment_id: &str) -> Result<Deployment, PortalError> {
        let path = format!("/deployments/{}", segment(deployment_id));
        self.get(&path, &[]).await
    }

    /// Submit a new deployment
    pub async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<CreateDeploymentResponse, PortalError> {
        self.post("/deployments", request).await
    }
}
