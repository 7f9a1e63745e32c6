//! Model tooling API client: inspection, conversion and Neo compilation

use openapi_client::models::{
    CompilationJob, ConvertModelRequest, InspectModelRequest, ModelConversion, ModelInspection,
    StartCompilationRequest,
};

use crate::errors::PortalError;
use crate::http::client::HttpClient;

impl HttpClient {
    pub async fn inspect_model(&self, request: &InspectModelRequest) -> Result<ModelInspection, PortalError> {
        self.post("/models/inspect", request).await
    }

    pub async fn convert_model(&self, request: &ConvertModelRequest) -> Result<ModelConversion, PortalError> {
        self.post("/models/convert", request).await
    }

    pub async fn start_compilation(
        &self,
        request: &StartCompilationRequest,
    ) -> Result<CompilationJob, PortalError> {
        self.post("/compilations", request).await
    }
}
