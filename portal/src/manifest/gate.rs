//! Training gate for labeling manifests
//!
//! A manifest must be checked before it can feed a training job. Ground Truth
//! manifests stay blocked until the backend has transformed them, and the
//! transformed URI replaces the original from then on.

use openapi_client::models::{TransformManifestRequest, ValidateManifestRequest};
use tracing::{info, warn};

use crate::errors::PortalError;
use crate::http::api::PortalApi;
use crate::manifest::detector::{detect_format, ground_truth_label_attribute, ManifestFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
enum GateState {
    Unchecked,
    Checked {
        format: ManifestFormat,
        label_attribute: Option<String>,
    },
    Transformed {
        manifest_uri: String,
    },
}

/// Per-manifest gate in front of training submission
#[derive(Debug, Clone)]
pub struct ManifestGate {
    usecase_id: String,
    source_uri: String,
    state: GateState,
}

impl ManifestGate {
    pub fn new(usecase_id: impl Into<String>, manifest_uri: impl Into<String>) -> Self {
        Self {
            usecase_id: usecase_id.into(),
            source_uri: manifest_uri.into(),
            state: GateState::Unchecked,
        }
    }

    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// Detected format, once checked. A transformed manifest reports `Dda`.
    pub fn format(&self) -> Option<ManifestFormat> {
        match &self.state {
            GateState::Unchecked => None,
            GateState::Checked { format, .. } => Some(*format),
            GateState::Transformed { .. } => Some(ManifestFormat::Dda),
        }
    }

    pub fn needs_transform(&self) -> bool {
        matches!(
            self.state,
            GateState::Checked {
                format: ManifestFormat::GroundTruth,
                ..
            }
        )
    }

    /// Fetch a sample entry and classify the manifest. Once transformed the
    /// gate keeps the new URI and reports `Dda` without calling the backend.
    pub async fn check<A: PortalApi + ?Sized>(&mut self, api: &A) -> Result<ManifestFormat, PortalError> {
        if let GateState::Transformed { manifest_uri } = &self.state {
            info!("Manifest {} already transformed into {}", self.source_uri, manifest_uri);
            return Ok(ManifestFormat::Dda);
        }

        let validation = api
            .validate_manifest(&ValidateManifestRequest {
                usecase_id: self.usecase_id.clone(),
                manifest_uri: self.source_uri.clone(),
            })
            .await?;

        let format = detect_format(&validation.sample_entry);
        let label_attribute = match format {
            ManifestFormat::GroundTruth => ground_truth_label_attribute(&validation.sample_entry),
            _ => None,
        };
        info!("Manifest {} detected as {}", self.source_uri, format);

        self.state = GateState::Checked {
            format,
            label_attribute,
        };
        Ok(format)
    }

    /// Ask the backend to rewrite a Ground Truth manifest. Returns the new URI.
    pub async fn transform<A: PortalApi + ?Sized>(&mut self, api: &A) -> Result<String, PortalError> {
        let label_attribute = match &self.state {
            GateState::Checked {
                format: ManifestFormat::GroundTruth,
                label_attribute,
            } => label_attribute.clone(),
            GateState::Transformed { manifest_uri } => return Ok(manifest_uri.clone()),
            GateState::Unchecked => {
                return Err(PortalError::ValidationError(
                    "Check the manifest format before transforming it".to_string(),
                ))
            }
            GateState::Checked { format, .. } => {
                return Err(PortalError::ValidationError(format!(
                    "Only ground-truth manifests can be transformed, this one is {}",
                    format
                )))
            }
        };

        let transformed = api
            .transform_manifest(&TransformManifestRequest {
                usecase_id: self.usecase_id.clone(),
                manifest_uri: self.source_uri.clone(),
                label_attribute,
            })
            .await?;

        info!(
            "Manifest {} transformed into {}",
            self.source_uri, transformed.manifest_uri
        );
        self.state = GateState::Transformed {
            manifest_uri: transformed.manifest_uri.clone(),
        };
        Ok(transformed.manifest_uri)
    }

    /// The manifest URI a training job may use, or why training is blocked
    pub fn training_manifest_uri(&self) -> Result<&str, PortalError> {
        match &self.state {
            GateState::Transformed { manifest_uri } => Ok(manifest_uri),
            GateState::Checked {
                format: ManifestFormat::Dda,
                ..
            } => Ok(&self.source_uri),
            GateState::Checked {
                format: ManifestFormat::GroundTruth,
                ..
            } => {
                warn!("Training blocked: {} is still in ground-truth format", self.source_uri);
                Err(PortalError::ManifestBlocked(
                    "This manifest is in Ground Truth format. Transform it before training.".to_string(),
                ))
            }
            GateState::Checked {
                format: ManifestFormat::Unknown,
                ..
            } => Err(PortalError::ManifestBlocked(
                "The manifest format is not recognized. Expected a DDA or Ground Truth manifest.".to_string(),
            )),
            GateState::Unchecked => Err(PortalError::ManifestBlocked(
                "The manifest has not been validated yet.".to_string(),
            )),
        }
    }
}
