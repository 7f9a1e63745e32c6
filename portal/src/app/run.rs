//! Command dispatch

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;
use openapi_client::models::{
    ComponentScope, ConvertModelRequest, InspectModelRequest, RolloutConfig,
    StartCompilationRequest, TargetPlatform,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::options::AppOptions;
use crate::compat::resolver::Resolver;
use crate::deploy::validation::validate_job_name;
use crate::deploy::wizard::DeploymentWizard;
use crate::errors::PortalError;
use crate::http::api::PortalApi;
use crate::http::client::HttpClient;
use crate::http::components::ComponentQuery;
use crate::manifest::gate::ManifestGate;
use crate::utils::split_csv;
use crate::workers::poller;

/// Commands understood by `run`
pub const COMMANDS: [&str; 15] = [
    "usecases",
    "devices",
    "components",
    "resolve",
    "deploy",
    "deployment",
    "watch-deployment",
    "training-jobs",
    "watch-training",
    "labeling-jobs",
    "check-manifest",
    "transform-manifest",
    "inspect-model",
    "convert-model",
    "compile",
];

fn required<'a>(args: &'a HashMap<String, String>, key: &str) -> Result<&'a str, PortalError> {
    args.get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| PortalError::ValidationError(format!("--{} is required", key)))
}

fn optional<'a>(args: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    args.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// A standalone `--flag` parses as `true`; `--flag=false` turns it off
fn flag(args: &HashMap<String, String>, key: &str) -> bool {
    optional(args, key).is_some_and(|v| {
        matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
    })
}

fn parse_u32(args: &HashMap<String, String>, key: &str) -> Result<Option<u32>, PortalError> {
    optional(args, key)
        .map(|raw| {
            raw.parse::<u32>().map_err(|_| {
                PortalError::ValidationError(format!("--{} must be a whole number, got '{}'", key, raw))
            })
        })
        .transpose()
}

fn print_status(kind: &str, status: &str) {
    let stamp = Utc::now().format("%H:%M:%S");
    eprintln!("[{}] {} {}", stamp, format!("{} status:", kind).bold(), status.cyan());
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, PortalError> {
    Ok(serde_json::to_value(value)?)
}

/// Run one command against the backend and return its JSON output
pub async fn run(
    options: &AppOptions,
    command: &str,
    args: &HashMap<String, String>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<Value, PortalError> {
    let client = HttpClient::new(&options.backend_base_url, options.request_timeout)?
        .with_api_token(options.api_token.clone());
    info!("Running '{}' against {}", command, client.base_url());

    dispatch(Arc::new(client), options, command, args, shutdown_signal).await
}

/// Dispatch a command to any `PortalApi` implementation
pub async fn dispatch<A: PortalApi + ?Sized>(
    api: Arc<A>,
    options: &AppOptions,
    command: &str,
    args: &HashMap<String, String>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<Value, PortalError> {
    match command {
        "usecases" => to_json(&api.list_use_cases().await?),
        "devices" => to_json(&api.list_devices(required(args, "usecase")?).await?),
        "components" => {
            let usecase_id = required(args, "usecase")?;
            match optional(args, "scope") {
                Some(scope) => {
                    let scope: ComponentScope = scope.parse().map_err(PortalError::ValidationError)?;
                    let query = ComponentQuery::new(usecase_id, scope);
                    to_json(&api.list_components(&query).await?)
                }
                None => {
                    let private = ComponentQuery::new(usecase_id, ComponentScope::Private);
                    let public = ComponentQuery::new(usecase_id, ComponentScope::Public);
                    let (private, public) =
                        tokio::try_join!(api.list_components(&private), api.list_components(&public))?;
                    Ok(json!({ "private": private, "public": public }))
                }
            }
        }
        "resolve" => {
            let usecase_id = required(args, "usecase")?;
            let resolver = Resolver::new(options.recommended_prefix.clone());
            let mut wizard = DeploymentWizard::load(api, usecase_id, resolver).await?;
            wizard.select_devices(split_csv(optional(args, "devices").unwrap_or_default()));
            to_json(wizard.resolution())
        }
        "deploy" => deploy(api, options, args).await,
        "deployment" => to_json(&api.get_deployment(required(args, "id")?).await?),
        "watch-deployment" => {
            let deployment_id = required(args, "id")?;
            let deployment = poller::watch_deployment(
                &*api,
                deployment_id,
                &options.deployment_poller,
                tokio::time::sleep,
                Box::pin(shutdown_signal),
                |d| print_status("deployment", &d.status.to_string()),
            )
            .await?;
            to_json(&deployment)
        }
        "training-jobs" => to_json(&api.list_training_jobs(required(args, "usecase")?).await?),
        "watch-training" => {
            let usecase_id = required(args, "usecase")?;
            let job_name = required(args, "job")?;
            let job = poller::watch_training_job(
                &*api,
                usecase_id,
                job_name,
                &options.training_poller,
                tokio::time::sleep,
                Box::pin(shutdown_signal),
                |j| print_status("training job", &j.status.to_string()),
            )
            .await?;
            to_json(&job)
        }
        "labeling-jobs" => to_json(&api.list_labeling_jobs(required(args, "usecase")?).await?),
        "check-manifest" => {
            let mut gate = ManifestGate::new(required(args, "usecase")?, required(args, "manifest")?);
            let format = gate.check(&*api).await?;
            Ok(json!({
                "manifest_uri": gate.source_uri(),
                "format": format,
                "needs_transform": gate.needs_transform(),
                "ready_for_training": gate.training_manifest_uri().is_ok(),
            }))
        }
        "transform-manifest" => {
            let mut gate = ManifestGate::new(required(args, "usecase")?, required(args, "manifest")?);
            let format = gate.check(&*api).await?;
            if gate.needs_transform() {
                gate.transform(&*api).await?;
            }
            let training_uri = gate.training_manifest_uri()?;
            Ok(json!({
                "source_uri": gate.source_uri(),
                "detected_format": format,
                "manifest_uri": training_uri,
            }))
        }
        "inspect-model" => {
            let request = InspectModelRequest {
                usecase_id: required(args, "usecase")?.to_string(),
                model_uri: required(args, "model")?.to_string(),
            };
            to_json(&api.inspect_model(&request).await?)
        }
        "convert-model" => {
            let request = ConvertModelRequest {
                usecase_id: required(args, "usecase")?.to_string(),
                model_uri: required(args, "model")?.to_string(),
                target_framework: required(args, "framework")?.to_string(),
            };
            to_json(&api.convert_model(&request).await?)
        }
        "compile" => {
            let job_name = required(args, "job")?;
            validate_job_name(job_name).map_err(PortalError::ValidationError)?;
            let request = StartCompilationRequest {
                usecase_id: required(args, "usecase")?.to_string(),
                compilation_job_name: job_name.to_string(),
                training_job_name: required(args, "training-job")?.to_string(),
                target_platform: TargetPlatform {
                    os: optional(args, "os").unwrap_or("LINUX").to_string(),
                    arch: required(args, "arch")?.to_string(),
                    accelerator: optional(args, "accelerator").map(str::to_string),
                },
            };
            to_json(&api.start_compilation(&request).await?)
        }
        other => Err(PortalError::ValidationError(format!(
            "Unknown command '{}'. Expected one of: {}",
            other,
            COMMANDS.join(", ")
        ))),
    }
}

async fn deploy<A: PortalApi + ?Sized>(
    api: Arc<A>,
    options: &AppOptions,
    args: &HashMap<String, String>,
) -> Result<Value, PortalError> {
    let usecase_id = required(args, "usecase")?;
    let resolver = Resolver::new(options.recommended_prefix.clone());
    let mut wizard = DeploymentWizard::load(api, usecase_id, resolver).await?;

    wizard.set_name(required(args, "name")?);
    match optional(args, "group") {
        Some(group) => wizard.target_group(group),
        None => {
            wizard.select_devices(split_csv(optional(args, "devices").unwrap_or_default()));
        }
    }

    if flag(args, "recommended") {
        wizard.apply_recommended();
    }
    for spec in split_csv(optional(args, "components").unwrap_or_default()) {
        match spec.split_once('@') {
            Some((name, version)) => wizard.select_component(name, Some(version))?,
            None => wizard.select_component(&spec, None)?,
        }
    }

    let mut rollout = RolloutConfig::default();
    if let Some(rate) = parse_u32(args, "max-per-minute")? {
        rollout.maximum_per_minute = rate;
    }
    rollout.timeout_in_minutes = parse_u32(args, "timeout-minutes")?;
    wizard.set_rollout(rollout);

    let deployment_id = wizard.submit().await?;
    Ok(json!({
        "deployment_id": deployment_id,
        "components": wizard.selected_components(),
    }))
}
