//! Create-deployment wizard tests

use std::sync::Arc;

use ddaportal::compat::resolver::Resolver;
use ddaportal::deploy::wizard::{DeploymentWizard, WizardTarget};
use ddaportal::errors::PortalError;
use openapi_client::models::{Component, ComponentScope, DeploymentTarget, RolloutConfig};

use crate::support::{component, device, fleet, ids, FakeApi, LOCAL_SERVER};

async fn load(api: Arc<FakeApi>) -> DeploymentWizard<FakeApi> {
    DeploymentWizard::load(api, "uc-1", Resolver::new(LOCAL_SERVER))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_load_fetches_both_scopes_and_devices() {
    let api = Arc::new(fleet());
    let wizard = load(api.clone()).await;
    assert_eq!(api.call_count("list_components"), 2);
    assert_eq!(api.call_count("list_devices"), 1);
    assert_eq!(wizard.components().len(), 4);
    assert_eq!(wizard.devices().len(), 3);
}

#[tokio::test]
async fn test_load_failure_surfaces_backend_message() {
    let api = Arc::new(FakeApi {
        fail_with: Some("Use case uc-1 does not exist".to_string()),
        ..Default::default()
    });
    let result = DeploymentWizard::load(api, "uc-1", Resolver::new(LOCAL_SERVER)).await;
    let err = result.err().unwrap();
    assert_eq!(err.alert_message(), "Use case uc-1 does not exist");
}

#[tokio::test]
async fn test_submit_recommended_to_arm_devices() {
    let api = Arc::new(fleet());
    let mut wizard = load(api.clone()).await;

    wizard.set_name("line-3-rollout");
    wizard.select_devices(ids(&["jetson-1", "jetson-2", "jetson-1"]));
    assert_eq!(wizard.target(), &WizardTarget::Devices(ids(&["jetson-1", "jetson-2"])));
    assert_eq!(wizard.apply_recommended(), 2);

    let deployment_id = wizard.submit().await.unwrap();
    assert_eq!(deployment_id, "dep-0001");

    let created = api.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let request = &created[0];
    assert_eq!(request.deployment_name, "line-3-rollout");
    assert_eq!(
        request.components.keys().cloned().collect::<Vec<_>>(),
        vec!["aws.edgeml.dda.LocalServer.arm64", "cookie-model-arm"]
    );
    assert_eq!(
        request.target,
        DeploymentTarget::Devices {
            device_ids: ids(&["jetson-1", "jetson-2"])
        }
    );
}

#[tokio::test]
async fn test_incompatible_component_is_refused() {
    let mut wizard = load(Arc::new(fleet())).await;
    wizard.select_devices(ids(&["nuc-1"]));

    let err = wizard
        .select_component("cookie-model-arm", None)
        .unwrap_err();
    assert!(matches!(err, PortalError::IncompatibleComponent(_)));
    assert!(err.alert_message().contains("amd64"));

    wizard.select_component("aws.greengrass.Nucleus", Some("1.0.0")).unwrap();
    assert!(matches!(
        wizard.select_component("aws.greengrass.Nucleus", Some("9.9.9")),
        Err(PortalError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_changing_devices_drops_incompatible_choices() {
    let mut wizard = load(Arc::new(fleet())).await;
    wizard.select_devices(ids(&["jetson-1"]));
    wizard.select_component("cookie-model-arm", None).unwrap();
    wizard.select_component("aws.greengrass.Nucleus", None).unwrap();

    let dropped = wizard.toggle_device("nuc-1");
    assert_eq!(dropped, vec!["cookie-model-arm".to_string()]);
    assert_eq!(wizard.selected_components().len(), 1);

    wizard.toggle_device("nuc-1");
    assert_eq!(wizard.target(), &WizardTarget::Devices(ids(&["jetson-1"])));
}

#[tokio::test]
async fn test_group_target_disables_filter() {
    let mut wizard = load(Arc::new(fleet())).await;
    wizard.target_group("line-3-cameras");
    assert!(wizard.resolution().incompatible.is_empty());
    wizard.select_component("aws.edgeml.dda.LocalServer.amd64", None).unwrap();
    wizard.set_name("group-rollout");
    let request = wizard.validate().unwrap();
    assert_eq!(
        request.target,
        DeploymentTarget::Group {
            group_name: "line-3-cameras".to_string()
        }
    );
}

#[tokio::test]
async fn test_validation_collects_every_problem() {
    let api = Arc::new(fleet());
    let mut wizard = load(api.clone()).await;
    wizard.set_name("bad name");
    wizard.set_rollout(RolloutConfig {
        maximum_per_minute: 0,
        timeout_in_minutes: None,
    });

    let err = wizard.submit().await.unwrap_err();
    let message = match err {
        PortalError::ValidationError(message) => message,
        other => panic!("unexpected error: {other}"),
    };
    assert!(message.contains("Deployment name"));
    assert!(message.contains("at least one component"));
    assert!(message.contains("target device"));
    assert!(message.contains("per minute"));
    assert_eq!(api.call_count("create_deployment"), 0);
}

#[tokio::test]
async fn test_unversioned_choice_picks_first_compatible_version() {
    let api = Arc::new(FakeApi {
        components: vec![
            component("model.x", ComponentScope::Private, &["aarch64"]),
            Component {
                version: "2.0.0".to_string(),
                ..component("model.x", ComponentScope::Private, &["x86_64"])
            },
        ],
        devices: vec![device("nuc", "x86_64"), device("jetson", "aarch64")],
        ..Default::default()
    });
    let mut wizard = load(api).await;
    wizard.select_devices(ids(&["nuc"]));

    assert!(wizard.resolution().is_compatible("model.x", None));
    assert!(wizard.resolution().incompatibility_reason("model.x", None).is_none());
    wizard.select_component("model.x", None).unwrap();
    assert_eq!(wizard.selected_components().get("model.x").map(String::as_str), Some("2.0.0"));

    let err = wizard.select_component("model.x", Some("1.0.0")).unwrap_err();
    assert!(matches!(err, PortalError::IncompatibleComponent(_)));

    // Neither version runs on a mixed fleet
    wizard.select_devices(ids(&["nuc", "jetson"]));
    assert!(wizard.selected_components().is_empty());
    assert!(!wizard.resolution().is_compatible("model.x", None));
    let err = wizard.select_component("model.x", None).unwrap_err();
    assert!(matches!(err, PortalError::IncompatibleComponent(_)));
}
