//! Form validation for deployment and job submissions

use once_cell::sync::Lazy;
use openapi_client::models::RolloutConfig;
use regex::Regex;

static DEPLOYMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]{0,127}$").expect("deployment name regex"));

// SageMaker job names: 1-63 chars, alphanumerics and inner hyphens
static JOB_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9](-*[a-zA-Z0-9]){0,62}$").expect("job name regex"));

/// Largest rollout rate Greengrass accepts
pub const MAX_ROLLOUT_PER_MINUTE: u32 = 1000;

pub fn validate_deployment_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Deployment name is required".to_string());
    }
    if !DEPLOYMENT_NAME.is_match(name) {
        return Err(format!(
            "Deployment name '{}' must start with a letter or digit and contain only letters, digits, '-' or '_' (max 128)",
            name
        ));
    }
    Ok(())
}

pub fn validate_job_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Job name is required".to_string());
    }
    if !JOB_NAME.is_match(name) {
        return Err(format!(
            "Job name '{}' may contain only letters, digits and inner hyphens (max 63)",
            name
        ));
    }
    Ok(())
}

pub fn validate_rollout(rollout: &RolloutConfig) -> Vec<String> {
    let mut errors = Vec::new();
    if !(1..=MAX_ROLLOUT_PER_MINUTE).contains(&rollout.maximum_per_minute) {
        errors.push(format!(
            "Maximum devices per minute must be between 1 and {}",
            MAX_ROLLOUT_PER_MINUTE
        ));
    }
    if rollout.timeout_in_minutes == Some(0) {
        errors.push("Rollout timeout must be at least one minute".to_string());
    }
    errors
}
