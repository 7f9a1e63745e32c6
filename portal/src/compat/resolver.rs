//! Component/device compatibility resolver used by the deployment wizard

use std::collections::BTreeSet;

use openapi_client::models::{Component, ComponentScope, Device};
use serde::Serialize;
use tracing::debug;

use crate::compat::arch::{ArchSupport, DeviceArch};

/// Compatible components split by where they were published
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompatibleComponents {
    pub private: Vec<Component>,
    pub public: Vec<Component>,
}

impl CompatibleComponents {
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.private.iter().chain(self.public.iter())
    }

    pub fn len(&self) -> usize {
        self.private.len() + self.public.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of resolving components against a device selection
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    /// Distinct normalised architectures of the selected devices
    pub selection: BTreeSet<DeviceArch>,
    pub recommended: Vec<Component>,
    pub compatible: CompatibleComponents,
    pub incompatible: Vec<Component>,
}

fn is_named(component: &Component, name: &str, version: Option<&str>) -> bool {
    component.name == name && version.is_none_or(|v| component.version == v)
}

impl Resolution {
    /// Whether `name` may be deployed. With `version` unset this asks whether
    /// any published version of it passes.
    pub fn is_compatible(&self, name: &str, version: Option<&str>) -> bool {
        self.compatible.iter().any(|c| is_named(c, name, version))
    }

    /// First compatible version of `name`, in listing order
    pub fn compatible_version(&self, name: &str) -> Option<&Component> {
        self.compatible.iter().find(|c| c.name == name)
    }

    /// Explain why a component was filtered out, or `None` if it was not.
    /// With `version` unset, `None` as soon as any version passes.
    pub fn incompatibility_reason(&self, name: &str, version: Option<&str>) -> Option<String> {
        if self.is_compatible(name, version) {
            return None;
        }
        let component = self.incompatible.iter().find(|c| is_named(c, name, version))?;
        explain_incompatibility(component, &self.selection)
    }
}

/// Why `component` cannot run on every architecture in `selection`, or `None`
/// if it can
pub fn explain_incompatibility(component: &Component, selection: &BTreeSet<DeviceArch>) -> Option<String> {
    let support = ArchSupport::from_platforms(component.platforms.as_deref());
    if support.supports_all(selection) {
        return None;
    }
    let selected: Vec<String> = selection.iter().map(ToString::to_string).collect();
    Some(format!(
        "{} supports {} but the selected devices are {}",
        component.name,
        support,
        selected.join(", ")
    ))
}

/// Collect the distinct architectures of the selected devices. Ids with no
/// matching device count as unrecognised.
pub fn selection_architectures(devices: &[Device], selected_ids: &[String]) -> BTreeSet<DeviceArch> {
    selected_ids
        .iter()
        .map(|id| {
            let reported = devices
                .iter()
                .find(|d| &d.device_id == id)
                .and_then(|d| d.architecture.as_deref());
            DeviceArch::from_reported(reported)
        })
        .collect()
}

/// Resolves which components may go to a device selection
#[derive(Debug, Clone)]
pub struct Resolver {
    recommended_prefix: String,
}

impl Resolver {
    pub fn new(recommended_prefix: impl Into<String>) -> Self {
        Self {
            recommended_prefix: recommended_prefix.into(),
        }
    }

    /// Whether a component is recommended before compatibility is considered
    fn is_recommendable(&self, component: &Component) -> bool {
        let infrastructure =
            !self.recommended_prefix.is_empty() && component.name.starts_with(&self.recommended_prefix);
        let model = component
            .model_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        infrastructure || model
    }

    /// Partition `components` for the devices in `selected_ids`.
    ///
    /// A component passes only if it runs on every architecture in the
    /// selection, so mixed selections shrink the compatible set. With nothing
    /// selected every component passes.
    pub fn resolve(&self, components: &[Component], devices: &[Device], selected_ids: &[String]) -> Resolution {
        let selection = selection_architectures(devices, selected_ids);
        let mut resolution = Resolution {
            selection,
            ..Default::default()
        };

        for component in components {
            let support = ArchSupport::from_platforms(component.platforms.as_deref());
            if !support.supports_all(&resolution.selection) {
                debug!("{} ({}) is incompatible with the selection", component.name, support);
                resolution.incompatible.push(component.clone());
                continue;
            }

            if self.is_recommendable(component) {
                resolution.recommended.push(component.clone());
            }
            match component.scope {
                ComponentScope::Private => resolution.compatible.private.push(component.clone()),
                ComponentScope::Public => resolution.compatible.public.push(component.clone()),
            }
        }

        resolution
    }
}
