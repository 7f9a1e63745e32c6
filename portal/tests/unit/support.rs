//! In-memory backend and fixtures shared by the tests

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use ddaportal::errors::PortalError;
use ddaportal::http::api::PortalApi;
use ddaportal::http::components::ComponentQuery;
use openapi_client::models::{
    CompilationJob, Component, ComponentScope, ConvertModelRequest, CreateDeploymentRequest,
    CreateDeploymentResponse, Deployment, DeploymentStatus, Device, InspectModelRequest, JobStatus,
    LabelingJob, ManifestTransform, ManifestValidation, ModelConversion, ModelInspection, Platform,
    StartCompilationRequest, TrainingJob, TransformManifestRequest, UseCase,
    ValidateManifestRequest,
};

pub const LOCAL_SERVER: &str = "aws.edgeml.dda.LocalServer";

pub fn component(name: &str, scope: ComponentScope, archs: &[&str]) -> Component {
    Component {
        arn: format!("arn:aws:greengrass:us-east-1:123456789012:components:{name}:versions:1.0.0"),
        name: name.to_string(),
        version: "1.0.0".to_string(),
        scope,
        platforms: if archs.is_empty() {
            None
        } else {
            Some(
                archs
                    .iter()
                    .map(|arch| Platform {
                        name: Some(format!("linux-{arch}")),
                        attributes: BTreeMap::from([
                            ("os".to_string(), "linux".to_string()),
                            ("architecture".to_string(), arch.to_string()),
                        ]),
                    })
                    .collect(),
            )
        },
        model_name: None,
        description: None,
    }
}

pub fn model_component(name: &str, model: &str, archs: &[&str]) -> Component {
    Component {
        model_name: Some(model.to_string()),
        ..component(name, ComponentScope::Private, archs)
    }
}

pub fn device(id: &str, arch: &str) -> Device {
    Device {
        device_id: id.to_string(),
        architecture: Some(arch.to_string()),
        installed_components: vec![],
        status: Some("HEALTHY".to_string()),
        last_status_update: None,
    }
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Two ARM boards and one x86 box, with a component set covering both
pub fn fleet() -> FakeApi {
    FakeApi {
        components: vec![
            component("aws.edgeml.dda.LocalServer.arm64", ComponentScope::Private, &["aarch64"]),
            component("aws.edgeml.dda.LocalServer.amd64", ComponentScope::Private, &["amd64"]),
            model_component("cookie-model-arm", "cookie-model", &["arm64"]),
            component("aws.greengrass.Nucleus", ComponentScope::Public, &[]),
        ],
        devices: vec![
            device("jetson-1", "aarch64"),
            device("jetson-2", "arm64"),
            device("nuc-1", "x86_64"),
        ],
        ..Default::default()
    }
}

fn api_error(message: &str) -> PortalError {
    PortalError::ApiError {
        status: 500,
        message: message.to_string(),
    }
}

/// Scripted backend. Status queues pop one entry per read and repeat the
/// last one once drained.
#[derive(Default)]
pub struct FakeApi {
    pub components: Vec<Component>,
    pub devices: Vec<Device>,
    pub manifest_sample: serde_json::Map<String, serde_json::Value>,
    pub transformed_uri: String,
    pub deployment_statuses: Mutex<VecDeque<DeploymentStatus>>,
    pub training_statuses: Mutex<VecDeque<JobStatus>>,
    pub created: Mutex<Vec<CreateDeploymentRequest>>,
    pub transform_requests: Mutex<Vec<TransformManifestRequest>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_with: Option<String>,
}

impl FakeApi {
    fn record(&self, call: &str) -> Result<(), PortalError> {
        self.calls.lock().unwrap().push(call.to_string());
        match &self.fail_with {
            Some(message) => Err(api_error(message)),
            None => Ok(()),
        }
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

fn next_status<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

#[async_trait]
impl PortalApi for FakeApi {
    async fn list_use_cases(&self) -> Result<Vec<UseCase>, PortalError> {
        self.record("list_use_cases")?;
        Ok(vec![])
    }

    async fn list_devices(&self, _usecase_id: &str) -> Result<Vec<Device>, PortalError> {
        self.record("list_devices")?;
        Ok(self.devices.clone())
    }

    async fn list_components(&self, query: &ComponentQuery) -> Result<Vec<Component>, PortalError> {
        self.record("list_components")?;
        Ok(self
            .components
            .iter()
            .filter(|c| c.scope == query.scope)
            .cloned()
            .collect())
    }

    async fn list_training_jobs(&self, _usecase_id: &str) -> Result<Vec<TrainingJob>, PortalError> {
        self.record("list_training_jobs")?;
        Ok(vec![])
    }

    async fn get_training_job(&self, _usecase_id: &str, job_name: &str) -> Result<TrainingJob, PortalError> {
        self.record("get_training_job")?;
        let status = next_status(&self.training_statuses).unwrap_or(JobStatus::InProgress);
        Ok(TrainingJob {
            training_job_name: job_name.to_string(),
            status,
            model_artifact_uri: None,
            failure_reason: None,
            created_at: None,
        })
    }

    async fn list_labeling_jobs(&self, _usecase_id: &str) -> Result<Vec<LabelingJob>, PortalError> {
        self.record("list_labeling_jobs")?;
        Ok(vec![])
    }

    async fn get_deployment(&self, deployment_id: &str) -> Result<Deployment, PortalError> {
        self.record("get_deployment")?;
        let status = next_status(&self.deployment_statuses).unwrap_or(DeploymentStatus::Queued);
        Ok(Deployment {
            deployment_id: deployment_id.to_string(),
            deployment_name: None,
            target_arn: None,
            components: BTreeMap::new(),
            status,
            created_at: None,
            error_message: None,
        })
    }

    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<CreateDeploymentResponse, PortalError> {
        self.record("create_deployment")?;
        self.created.lock().unwrap().push(request.clone());
        Ok(CreateDeploymentResponse {
            deployment_id: "dep-0001".to_string(),
            iot_job_id: None,
        })
    }

    async fn validate_manifest(
        &self,
        request: &ValidateManifestRequest,
    ) -> Result<ManifestValidation, PortalError> {
        self.record("validate_manifest")?;
        Ok(ManifestValidation {
            manifest_uri: request.manifest_uri.clone(),
            sample_entry: self.manifest_sample.clone(),
            total_entries: Some(1),
        })
    }

    async fn transform_manifest(
        &self,
        request: &TransformManifestRequest,
    ) -> Result<ManifestTransform, PortalError> {
        self.record("transform_manifest")?;
        self.transform_requests.lock().unwrap().push(request.clone());
        Ok(ManifestTransform {
            manifest_uri: self.transformed_uri.clone(),
            transformed_entries: Some(1),
        })
    }

    async fn inspect_model(&self, _request: &InspectModelRequest) -> Result<ModelInspection, PortalError> {
        self.record("inspect_model")?;
        Ok(ModelInspection {
            framework: "PYTORCH".to_string(),
            framework_version: None,
            input_shape: None,
            needs_conversion: false,
        })
    }

    async fn convert_model(&self, _request: &ConvertModelRequest) -> Result<ModelConversion, PortalError> {
        self.record("convert_model")?;
        Ok(ModelConversion {
            converted_model_uri: "s3://bucket/converted/model.tar.gz".to_string(),
        })
    }

    async fn start_compilation(
        &self,
        request: &StartCompilationRequest,
    ) -> Result<CompilationJob, PortalError> {
        self.record("start_compilation")?;
        Ok(CompilationJob {
            compilation_job_name: request.compilation_job_name.clone(),
            status: JobStatus::InProgress,
            compiled_model_uri: None,
        })
    }
}
