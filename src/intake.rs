//! Contract intake: confirmed contract data is POSTed as JSON to the intake
//! endpoint of its contract type.

use crate::config::AiTimeouts;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("intake request failed: {0}")]
    Request(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

pub trait IntakeSink: Send + Sync {
    fn submit(&self, url: &str, payload: &Value) -> Result<(), IntakeError>;
}

/// The intake endpoints are fire-and-forget scripts whose responses carry no
/// usable status, so only transport failures count as errors.
pub struct WebhookClient {
    http: reqwest::blocking::Client,
}

impl WebhookClient {
    pub fn new(timeouts: AiTimeouts) -> Result<Self, IntakeError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| IntakeError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

impl IntakeSink for WebhookClient {
    fn submit(&self, url: &str, payload: &Value) -> Result<(), IntakeError> {
        let fields = payload.as_object().map_or(0, |o| o.len());
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .map_err(|e| {
                warn!(error = %e, "intake dispatch failed");
                IntakeError::Request(e.to_string())
            })?;
        info!(status = response.status().as_u16(), fields, "intake dispatched");
        Ok(())
    }
}
