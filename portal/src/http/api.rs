//! Backend API trait, implemented by `HttpClient`
//!
//! The wizard, manifest gate and pollers are generic over this trait so they
//! can run against an in-memory backend in tests.

use async_trait::async_trait;
use openapi_client::models::{
    CompilationJob, Component, ConvertModelRequest, CreateDeploymentRequest,
    CreateDeploymentResponse, Deployment, Device, InspectModelRequest, LabelingJob,
    ManifestTransform, ManifestValidation, ModelConversion, ModelInspection,
    StartCompilationRequest, TrainingJob, TransformManifestRequest, UseCase,
    ValidateManifestRequest,
};

use crate::errors::PortalError;
use crate::http::client::HttpClient;
use crate::http::components::ComponentQuery;

/// Every backend call the portal depends on
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn list_use_cases(&self) -> Result<Vec<UseCase>, PortalError>;

    async fn list_devices(&self, usecase_id: &str) -> Result<Vec<Device>, PortalError>;

    async fn list_components(&self, query: &ComponentQuery) -> Result<Vec<Component>, PortalError>;

    async fn list_training_jobs(&self, usecase_id: &str) -> Result<Vec<TrainingJob>, PortalError>;

    async fn get_training_job(&self, usecase_id: &str, job_name: &str) -> Result<TrainingJob, PortalError>;

    async fn list_labeling_jobs(&self, usecase_id: &str) -> Result<Vec<LabelingJob>, PortalError>;

    async fn get_deployment(&self, deployment_id: &str) -> Result<Deployment, PortalError>;

    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<CreateDeploymentResponse, PortalError>;

    async fn validate_manifest(
        &self,
        request: &ValidateManifestRequest,
    ) -> Result<ManifestValidation, PortalError>;

    async fn transform_manifest(
        &self,
        request: &TransformManifestRequest,
    ) -> Result<ManifestTransform, PortalError>;

    async fn inspect_model(&self, request: &InspectModelRequest) -> Result<ModelInspection, PortalError>;

    async fn convert_model(&self, request: &ConvertModelRequest) -> Result<ModelConversion, PortalError>;

    async fn start_compilation(
        &self,
        request: &StartCompilationRequest,
    ) -> Result<CompilationJob, PortalError>;
}

#[async_trait]
impl PortalApi for HttpClient {
    async fn list_use_cases(&self) -> Result<Vec<UseCase>, PortalError> {
        HttpClient::list_use_cases(self).await
    }

    async fn list_devices(&self, usecase_id: &str) -> Result<Vec<Device>, PortalError> {
        HttpClient::list_devices(self, usecase_id).await
    }

    async fn list_components(&self, query: &ComponentQuery) -> Result<Vec<Component>, PortalError> {
        HttpClient::list_components(self, query).await
    }

    async fn list_training_jobs(&self, usecase_id: &str) -> Result<Vec<TrainingJob>, PortalError> {
        HttpClient::list_training_jobs(self, usecase_id).await
    }

    async fn get_training_job(&self, usecase_id: &str, job_name: &str) -> Result<TrainingJob, PortalError> {
        HttpClient::get_training_job(self, usecase_id, job_name).await
    }

    async fn list_labeling_jobs(&self, usecase_id: &str) -> Result<Vec<LabelingJob>, PortalError> {
        HttpClient::list_labeling_jobs(self, usecase_id).await
    }

    async fn get_deployment(&self, deployment_id: &str) -> Result<Deployment, PortalError> {
        HttpClient::get_deployment(self, deployment_id).await
    }

    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<CreateDeploymentResponse, PortalError> {
        HttpClient::create_deployment(self, request).await
    }

    async fn validate_manifest(
        &self,
        request: &ValidateManifestRequest,
    ) -> Result<ManifestValidation, PortalError> {
        HttpClient::validate_manifest(self, request).await
    }

    async fn transform_manifest(
        &self,
        request: &TransformManifestRequest,
    ) -> Result<ManifestTransform, PortalError> {
        HttpClient::transform_manifest(self, request).await
    }

    async fn inspect_model(&self, request: &InspectModelRequest) -> Result<ModelInspection, PortalError> {
        HttpClient::inspect_model(self, request).await
    }

    async fn convert_model(&self, request: &ConvertModelRequest) -> Result<ModelConversion, PortalError> {
        HttpClient::convert_model(self, request).await
    }

    async fn start_compilation(
        &self,
        request: &StartCompilationRequest,
    ) -> Result<CompilationJob, PortalError> {
        HttpClient::start_compilation(self, request).await
    }
}
