//! Fixed-interval status polling for training jobs and deployments
//!
//! The same read is re-issued every `interval` until the resource reaches a
//! terminal status. There is no backoff: a failed read ends the poll and the
//! error is handed back to the caller.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use openapi_client::models::{Deployment, TrainingJob};
use tracing::{debug, info};

use crate::errors::PortalError;
use crate::http::api::PortalApi;

/// Poller options
#[derive(Debug, Clone)]
pub struct Options {
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

/// A resource whose status the backend drives
pub trait Polled {
    fn status_label(&self) -> String;

    fn is_terminal(&self) -> bool;
}

impl Polled for Deployment {
    fn status_label(&self) -> String {
        self.status.to_string()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

impl Polled for TrainingJob {
    fn status_label(&self) -> String {
        self.status.to_string()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Poll `read` until it returns a terminal resource
pub async fn run<T, R, RF, S, F, C>(
    label: &str,
    options: &Options,
    read: R,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
    mut on_change: C,
) -> Result<T, PortalError>
where
    T: Polled,
    R: Fn() -> RF,
    RF: Future<Output = Result<T, PortalError>>,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
    C: FnMut(&T),
{
    info!("Watching {} every {:?}", label, options.interval);
    let mut last_status: Option<String> = None;

    loop {
        let current = read().await?;
        let status = current.status_label();
        if last_status.as_deref() != Some(status.as_str()) {
            info!("{} is {}", label, status);
            on_change(&current);
            last_status = Some(status);
        } else {
            debug!("{} unchanged", label);
        }

        if current.is_terminal() {
            return Ok(current);
        }

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Stopped watching {}", label);
                return Err(PortalError::Shutdown(format!("stopped watching {}", label)));
            }
            _ = sleep_fn(options.interval) => {}
        }
    }
}

/// Poll a deployment until it succeeds, fails or is canceled
pub async fn watch_deployment<A, S, F, C>(
    api: &A,
    deployment_id: &str,
    options: &Options,
    sleep_fn: S,
    shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
    on_change: C,
) -> Result<Deployment, PortalError>
where
    A: PortalApi + ?Sized,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
    C: FnMut(&Deployment),
{
    let label = format!("deployment {}", deployment_id);
    run(
        &label,
        options,
        || api.get_deployment(deployment_id),
        sleep_fn,
        shutdown_signal,
        on_change,
    )
    .await
}

/// Poll a training job until it completes, fails or is stopped
pub async fn watch_training_job<A, S, F, C>(
    api: &A,
    usecase_id: &str,
    job_name: &str,
    options: &Options,
    sleep_fn: S,
    shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
    on_change: C,
) -> Result<TrainingJob, PortalError>
where
    A: PortalApi + ?Sized,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
    C: FnMut(&TrainingJob),
{
    let label = format!("training job {}", job_name);
    run(
        &label,
        options,
        || api.get_training_job(usecase_id, job_name),
        sleep_fn,
        shutdown_signal,
        on_change,
    )
    .await
}
