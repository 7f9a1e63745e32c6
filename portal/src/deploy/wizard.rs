//! Create-deployment wizard
//!
//! Holds the wizard's working state: the loaded components and devices, the
//! current target, the chosen components and the resolver output that drives
//! which components may be picked.

use std::collections::BTreeMap;
use std::sync::Arc;

use openapi_client::models::{
    Component, ComponentScope, CreateDeploymentRequest, Device, DeploymentTarget, RolloutConfig,
};
use tracing::{debug, info, warn};

use crate::compat::resolver::{explain_incompatibility, Resolution, Resolver};
use crate::deploy::validation::{validate_deployment_name, validate_rollout};
use crate::errors::PortalError;
use crate::http::api::PortalApi;
use crate::http::components::ComponentQuery;

/// Deployment target as edited in the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardTarget {
    Devices(Vec<String>),
    Group(String),
}

impl Default for WizardTarget {
    fn default() -> Self {
        WizardTarget::Devices(Vec::new())
    }
}

pub struct DeploymentWizard<A: PortalApi + ?Sized> {
    api: Arc<A>,
    usecase_id: String,
    resolver: Resolver,
    components: Vec<Component>,
    devices: Vec<Device>,
    target: WizardTarget,
    selected: BTreeMap<String, String>,
    name: String,
    rollout: RolloutConfig,
    resolution: Resolution,
}

impl<A: PortalApi + ?Sized> DeploymentWizard<A> {
    /// Load private components, public components and devices in parallel
    pub async fn load(api: Arc<A>, usecase_id: &str, resolver: Resolver) -> Result<Self, PortalError> {
        let private_query = ComponentQuery::new(usecase_id, ComponentScope::Private);
        let public_query = ComponentQuery::new(usecase_id, ComponentScope::Public);

        let (private, public, devices) = tokio::try_join!(
            api.list_components(&private_query),
            api.list_components(&public_query),
            api.list_devices(usecase_id),
        )?;
        info!(
            "Loaded {} private, {} public components and {} devices for {}",
            private.len(),
            public.len(),
            devices.len(),
            usecase_id
        );

        let components: Vec<Component> = private.into_iter().chain(public).collect();
        let resolution = resolver.resolve(&components, &devices, &[]);

        Ok(Self {
            api,
            usecase_id: usecase_id.to_string(),
            resolver,
            components,
            devices,
            target: WizardTarget::default(),
            selected: BTreeMap::new(),
            name: String::new(),
            rollout: RolloutConfig::default(),
            resolution,
        })
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn target(&self) -> &WizardTarget {
        &self.target
    }

    /// Chosen components, name to version
    pub fn selected_components(&self) -> &BTreeMap<String, String> {
        &self.selected
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_rollout(&mut self, rollout: RolloutConfig) {
        self.rollout = rollout;
    }

    fn selected_device_ids(&self) -> &[String] {
        match &self.target {
            WizardTarget::Devices(ids) => ids,
            WizardTarget::Group(_) => &[],
        }
    }

    /// Re-run the resolver and drop chosen components it now rejects.
    /// Returns the names that were dropped.
    fn refresh(&mut self) -> Vec<String> {
        self.resolution = self
            .resolver
            .resolve(&self.components, &self.devices, self.selected_device_ids());

        let dropped: Vec<String> = self
            .selected_incompatibilities()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        for name in &dropped {
            warn!("Deselecting {}: incompatible with the selected devices", name);
            self.selected.remove(name);
        }
        dropped
    }

    /// Chosen components the current selection rejects, with the reason
    fn selected_incompatibilities(&self) -> Vec<(String, String)> {
        self.selected
            .iter()
            .filter_map(|(name, version)| {
                let component = self
                    .components
                    .iter()
                    .find(|c| &c.name == name && &c.version == version)?;
                explain_incompatibility(component, &self.resolution.selection)
                    .map(|reason| (name.clone(), reason))
            })
            .collect()
    }

    /// Target exactly these devices
    pub fn select_devices(&mut self, device_ids: Vec<String>) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(device_ids.len());
        for id in device_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.target = WizardTarget::Devices(ids);
        self.refresh()
    }

    /// Add or remove one device from the target
    pub fn toggle_device(&mut self, device_id: &str) -> Vec<String> {
        let mut ids = self.selected_device_ids().to_vec();
        match ids.iter().position(|id| id == device_id) {
            Some(pos) => {
                ids.remove(pos);
            }
            None => ids.push(device_id.to_string()),
        }
        self.select_devices(ids)
    }

    /// Target a thing group. Group membership is not known here, so the
    /// architecture filter does not apply.
    pub fn target_group(&mut self, group_name: impl Into<String>) {
        self.target = WizardTarget::Group(group_name.into());
        self.refresh();
    }

    /// Choose a component. Without a version the first compatible one in
    /// listing order is used.
    pub fn select_component(&mut self, name: &str, version: Option<&str>) -> Result<(), PortalError> {
        let candidates: Vec<&Component> = self
            .components
            .iter()
            .filter(|c| c.name == name && version.is_none_or(|v| c.version == v))
            .collect();
        let Some(first) = candidates.first() else {
            return Err(PortalError::NotFound(match version {
                Some(v) => format!("Component {}@{} not found", name, v),
                None => format!("Component {} not found", name),
            }));
        };

        let component = candidates
            .iter()
            .find(|c| explain_incompatibility(c, &self.resolution.selection).is_none())
            .ok_or_else(|| {
                let reason = explain_incompatibility(first, &self.resolution.selection)
                    .unwrap_or_else(|| format!("{} is incompatible with the selected devices", name));
                PortalError::IncompatibleComponent(reason)
            })?;

        debug!("Selected {}@{}", component.name, component.version);
        self.selected
            .insert(component.name.clone(), component.version.clone());
        Ok(())
    }

    pub fn deselect_component(&mut self, name: &str) -> bool {
        self.selected.remove(name).is_some()
    }

    /// Choose every recommended component not chosen yet
    pub fn apply_recommended(&mut self) -> usize {
        let mut added = 0;
        for component in &self.resolution.recommended {
            if !self.selected.contains_key(&component.name) {
                self.selected
                    .insert(component.name.clone(), component.version.clone());
                added += 1;
            }
        }
        added
    }

    /// Check the form and build the request that `submit` would send
    pub fn validate(&self) -> Result<CreateDeploymentRequest, PortalError> {
        let mut errors: Vec<String> = Vec::new();

        if let Err(e) = validate_deployment_name(&self.name) {
            errors.push(e);
        }
        if self.selected.is_empty() {
            errors.push("Select at least one component".to_string());
        }
        let target = match &self.target {
            WizardTarget::Devices(ids) if ids.is_empty() => {
                errors.push("Select at least one target device or a thing group".to_string());
                None
            }
            WizardTarget::Devices(ids) => Some(DeploymentTarget::Devices {
                device_ids: ids.clone(),
            }),
            WizardTarget::Group(group) if group.trim().is_empty() => {
                errors.push("Thing group name is required".to_string());
                None
            }
            WizardTarget::Group(group) => Some(DeploymentTarget::Group {
                group_name: group.clone(),
            }),
        };
        errors.extend(
            self.selected_incompatibilities()
                .into_iter()
                .map(|(_, reason)| reason),
        );
        errors.extend(validate_rollout(&self.rollout));

        match target {
            Some(target) if errors.is_empty() => Ok(CreateDeploymentRequest {
                usecase_id: self.usecase_id.clone(),
                deployment_name: self.name.clone(),
                components: self.selected.clone(),
                target,
                rollout: self.rollout.clone(),
            }),
            _ => Err(PortalError::ValidationError(errors.join("; "))),
        }
    }

    /// Validate and create the deployment. Returns the new deployment id.
    pub async fn submit(&self) -> Result<String, PortalError> {
        let request = self.validate()?;
        let response = self.api.create_deployment(&request).await?;
        info!(
            "Created deployment {} ({}) with {} components",
            response.deployment_id,
            request.deployment_name,
            request.components.len()
        );
        Ok(response.deployment_id)
    }
}
