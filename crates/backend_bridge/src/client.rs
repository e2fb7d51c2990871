//! HTTP client for the diagnosis backend

use crate::config::BackendConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use diagnosis_core::submission::{DIAGNOSE_PATH, ENV_PART, IMAGE_PART};
use diagnosis_core::{RawReply, SubmissionError, SubmissionRequest};
use reqwest::multipart::{Form, Part};

/// Anything that can carry one diagnosis request to a backend
#[async_trait]
pub trait DiagnosisTransport: Send + Sync {
    /// Issue the POST once; no retry
    async fn send(&self, request: &SubmissionRequest) -> Result<RawReply, SubmissionError>;
}

/// Backend API client
pub struct BackendClient {
    pub(crate) config: BackendConfig,
    pub(crate) client: reqwest::Client,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: BackendConfig) -> Result<Self> {
        reqwest::Url::parse(&config.base_url)
            .with_context(|| format!("Invalid backend URL {:?}", config.base_url))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn diagnosis_form(request: &SubmissionRequest) -> Result<Form, SubmissionError> {
        let image = Part::bytes(request.image.bytes.clone())
            .file_name(request.image.name.clone())
            .mime_str(&request.image.content_type())
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        Ok(Form::new()
            .part(IMAGE_PART, image)
            .text(ENV_PART, request.env_json()))
    }
}

#[async_trait]
impl DiagnosisTransport for BackendClient {
    async fn send(&self, request: &SubmissionRequest) -> Result<RawReply, SubmissionError> {
        let url = self.config.endpoint(DIAGNOSE_PATH);
        let form = Self::diagnosis_form(request)?;

        tracing::info!(
            %url,
            image = %request.image.name,
            bytes = request.image.bytes.len(),
            "sending diagnosis request"
        );
        tracing::debug!(env_data = %request.env_json(), "environment payload");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        tracing::info!(status = status.as_u16(), "diagnosis response received");

        Ok(RawReply {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}
