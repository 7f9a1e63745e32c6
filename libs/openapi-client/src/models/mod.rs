//! API models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lowercase a status string and drop separators so `IN_PROGRESS`,
/// `in-progress` and `InProgress` compare equal.
fn squash_status(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A use case groups devices, datasets and models for one inspection task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseCase {
    pub usecase_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub s3_bucket: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Greengrass component scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentScope {
    Private,
    Public,
}

impl ComponentScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentScope::Private => "PRIVATE",
            ComponentScope::Public => "PUBLIC",
        }
    }
}

impl FromStr for ComponentScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PRIVATE" => Ok(ComponentScope::Private),
            "PUBLIC" => Ok(ComponentScope::Public),
            _ => Err(format!("Invalid component scope: {}", s)),
        }
    }
}

/// A build platform a component declares support for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub name: Option<String>,

    /// Platform attributes such as `os` and `architecture`
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// A published Greengrass component version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub arn: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub scope: ComponentScope,
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An edge device as reported by the fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(default)]
    pub installed_components: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_status_update: Option<DateTime<Utc>>,
}

/// Deployment status as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentStatus {
    Queued,
    InProgress,
    Succeeded,
    Failed,
    Canceled,
    Unknown(String),
}

impl DeploymentStatus {
    /// Whether the backend will report no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Succeeded | DeploymentStatus::Failed | DeploymentStatus::Canceled
        )
    }
}

impl FromStr for DeploymentStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match squash_status(s).as_str() {
            "queued" | "pending" | "created" => DeploymentStatus::Queued,
            "inprogress" | "active" | "running" => DeploymentStatus::InProgress,
            "succeeded" | "completed" | "success" => DeploymentStatus::Succeeded,
            "failed" | "error" => DeploymentStatus::Failed,
            "canceled" | "cancelled" | "inactive" => DeploymentStatus::Canceled,
            _ => DeploymentStatus::Unknown(s.to_string()),
        })
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Queued => f.write_str("queued"),
            DeploymentStatus::InProgress => f.write_str("in-progress"),
            DeploymentStatus::Succeeded => f.write_str("succeeded"),
            DeploymentStatus::Failed => f.write_str("failed"),
            DeploymentStatus::Canceled => f.write_str("canceled"),
            DeploymentStatus::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for DeploymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeploymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.parse::<Self>() {
            Ok(status) => Ok(status),
            Err(never) => match never {},
        }
    }
}

/// A deployment of components to a device or thing group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub deployment_id: String,
    #[serde(default)]
    pub deployment_name: Option<String>,
    #[serde(default)]
    pub target_arn: Option<String>,

    /// Component name to version
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Where a deployment goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeploymentTarget {
    Devices { device_ids: Vec<String> },
    Group { group_name: String },
}

/// Rollout configuration for a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutConfig {
    pub maximum_per_minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_in_minutes: Option<u32>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            maximum_per_minute: 1000,
            timeout_in_minutes: None,
        }
    }
}

/// Create deployment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    pub usecase_id: String,
    pub deployment_name: String,
    pub components: BTreeMap<String, String>,
    pub target: DeploymentTarget,
    pub rollout: RolloutConfig,
}

/// Create deployment response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeploymentResponse {
    pub deployment_id: String,
    #[serde(default)]
    pub iot_job_id: Option<String>,
}

/// SageMaker job status, shared by training, labeling and compilation jobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
    Stopping,
    Stopped,
    Unknown(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped)
    }
}

impl FromStr for JobStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match squash_status(s).as_str() {
            "inprogress" | "starting" | "running" => JobStatus::InProgress,
            "completed" | "succeeded" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            "stopping" => JobStatus::Stopping,
            "stopped" => JobStatus::Stopped,
            _ => JobStatus::Unknown(s.to_string()),
        })
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::InProgress => f.write_str("InProgress"),
            JobStatus::Completed => f.write_str("Completed"),
            JobStatus::Failed => f.write_str("Failed"),
            JobStatus::Stopping => f.write_str("Stopping"),
            JobStatus::Stopped => f.write_str("Stopped"),
            JobStatus::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for JobStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.parse::<Self>() {
            Ok(status) => Ok(status),
            Err(never) => match never {},
        }
    }
}

/// A SageMaker training job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingJob {
    pub training_job_name: String,
    pub status: JobStatus,
    #[serde(default)]
    pub model_artifact_uri: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A SageMaker Ground Truth labeling job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelingJob {
    pub labeling_job_name: String,
    pub status: JobStatus,
    #[serde(default)]
    pub output_manifest_uri: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Manifest validation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateManifestRequest {
    pub usecase_id: String,
    pub manifest_uri: String,
}

/// Manifest validation response carrying one sample line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestValidation {
    pub manifest_uri: String,
    pub sample_entry: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub total_entries: Option<u64>,
}

/// Manifest transformation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformManifestRequest {
    pub usecase_id: String,
    pub manifest_uri: String,

    /// Ground Truth label attribute to rewrite into the DDA label key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_attribute: Option<String>,
}

/// Manifest transformation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestTransform {
    pub manifest_uri: String,
    #[serde(default)]
    pub transformed_entries: Option<u64>,
}

/// Model inspection request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectModelRequest {
    pub usecase_id: String,
    pub model_uri: String,
}

/// What the backend found inside a model archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInspection {
    pub framework: String,
    #[serde(default)]
    pub framework_version: Option<String>,
    #[serde(default)]
    pub input_shape: Option<Vec<u32>>,
    #[serde(default)]
    pub needs_conversion: bool,
}

/// Model conversion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertModelRequest {
    pub usecase_id: String,
    pub model_uri: String,
    pub target_framework: String,
}

/// Model conversion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConversion {
    pub converted_model_uri: String,
}

/// Neo compilation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPlatform {
    pub os: String,
    pub arch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerator: Option<String>,
}

/// Neo compilation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCompilationRequest {
    pub usecase_id: String,
    pub compilation_job_name: String,
    pub training_job_name: String,
    pub target_platform: TargetPlatform,
}

/// Neo compilation job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationJob {
    pub compilation_job_name: String,
    pub status: JobStatus,
    #[serde(default)]
    pub compiled_model_uri: Option<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorResponse {
    /// The most specific message the backend supplied, verbatim
    pub fn best_message(&self) -> Option<&str> {
        [&self.message, &self.error_message, &self.detail, &self.error]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|m| !m.trim().is_empty())
    }
}
