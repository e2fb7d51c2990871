//! Outbreak map endpoints

use crate::client::BackendClient;
use anyhow::{Context, Result};
use diagnosis_core::outbreak::{OUTBREAK_ADD_PATH, OUTBREAK_DATA_PATH};
use diagnosis_core::{OutbreakAddResponse, OutbreakPoint, OutbreakReport};
use reqwest::multipart::Form;

impl BackendClient {
    /// Fetch every recorded outbreak
    pub async fn fetch_outbreaks(&self) -> Result<Vec<OutbreakPoint>> {
        let url = self.config.endpoint(OUTBREAK_DATA_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to outbreak API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Outbreak API error ({}): {}", status, error_text);
        }

        let points: Vec<OutbreakPoint> = response
            .json()
            .await
            .context("Failed to parse outbreak data")?;
        tracing::debug!(count = points.len(), "outbreaks fetched");
        Ok(points)
    }

    /// Record a new outbreak; returns the updated data set
    pub async fn add_outbreak(&self, report: &OutbreakReport) -> Result<Vec<OutbreakPoint>> {
        let url = self.config.endpoint(OUTBREAK_ADD_PATH);
        let form = report
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        tracing::info!(
            place = report.place(),
            disease = %report.disease(),
            severity = report.severity(),
            "adding outbreak"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send request to outbreak API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read outbreak API response")?;

        let parsed: OutbreakAddResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                anyhow::bail!("Outbreak API error ({}): {}", status, body)
            }
            Err(e) => return Err(e).context("Failed to parse outbreak API response"),
        };

        if !parsed.success {
            anyhow::bail!(
                "{}",
                parsed
                    .error
                    .unwrap_or_else(|| "Outbreak was not recorded".to_string())
            );
        }
        Ok(parsed.data.unwrap_or_default())
    }
}
