//! Training and labeling job API client

use openapi_client::models::{LabelingJob, TrainingJob};

use crate::errors::PortalError;
use crate::http::client::{unwrap_list, HttpClient};
use crate::http::segment;

impl HttpClient {
    pub async fn list_training_jobs(&self, usecase_id: &str) -> Result<Vec<TrainingJob>, PortalError> {
        let path = format!("/usecases/{}/training-jobs", segment(usecase_id));
        let payload: serde_json::Value = self.get(&path, &[]).await?;
        unwrap_list(payload, "training_jobs")
    }

    pub async fn get_training_job(
        &self,
        usecase_id: &str,
        job_name: &str,
    ) -> Result<TrainingJob, PortalError> {
        let path = format!(
            "/usecases/{}/training-jobs/{}",
            segment(usecase_id),
            segment(job_name)
        );
        self.get(&path, &[]).await
    }

    pub async fn list_labeling_jobs(&self, usecase_id: &str) -> Result<Vec<LabelingJob>, PortalError> {
        let path = format!("/usecases/{}/labeling-jobs", segment(usecase_id));
        let payload: serde_json::Value = self.get(&path, &[]).await?;
        unwrap_list(payload, "labeling_jobs")
    }
}
