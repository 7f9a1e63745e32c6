//! Manifest API client

use openapi_client::models::{
    ManifestTransform, ManifestValidation, TransformManifestRequest, ValidateManifestRequest,
};

use crate::errors::PortalError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Validate a manifest and fetch one sample entry
    pub async fn validate_manifest(
        &self,
        request: &ValidateManifestRequest,
    ) -> Result<ManifestValidation, PortalError> {
        self.post("/manifests/validate", request).await
    }

    /// Rewrite a Ground Truth manifest into the DDA format
    pub async fn transform_manifest(
        &self,
        request: &TransformManifestRequest,
    ) -> Result<ManifestTransform, PortalError> {
        self.post("/manifests/transform", request).await
    }
}
