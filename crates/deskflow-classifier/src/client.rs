// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the text classification service.
//!
//! Provides [`ClassifierClient`], which handles request construction, optional
//! bearer authentication, and transient error retry for the `/classify` and
//! `/train` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use deskflow_config::model::ClassifierConfig;
use deskflow_core::{Classification, Classifier, DeskflowError, TrainingExample, TrainingReport};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::types::{ApiErrorResponse, ClassifyRequest};

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for classification service communication.
///
/// Retries transient errors (429, 500, 503) up to `max_retries` times.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl ClassifierClient {
    pub fn new(config: &ClassifierConfig) -> Result<Self, DeskflowError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                DeskflowError::Config(format!("invalid classifier API token header value: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DeskflowError::Classifier {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, DeskflowError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, endpoint, "retrying classifier request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| DeskflowError::Classifier {
                    message: format!("HTTP request to {endpoint} failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, endpoint, "classifier response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| DeskflowError::Classifier {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| DeskflowError::Classifier {
                    message: format!("failed to parse {endpoint} response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(DeskflowError::Classifier {
                    message: format!("classifier returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("classifier error ({status}): {}", api_err.detail),
                Err(_) => format!("classifier returned {status}: {body}"),
            };
            return Err(DeskflowError::Classifier {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| DeskflowError::Classifier {
            message: format!("{endpoint} request failed after retries"),
            source: None,
        }))
    }
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn classify(&self, text: &str) -> Result<Classification, DeskflowError> {
        let classification: Classification = self
            .post_json("/classify", &ClassifyRequest { description: text })
            .await?;
        debug!(
            label = %classification.classification,
            score = classification.score,
            "description classified"
        );
        Ok(classification)
    }

    async fn train(&self, examples: &[TrainingExample]) -> Result<TrainingReport, DeskflowError> {
        let report: TrainingReport = self.post_json("/train", examples).await?;
        info!(
            sent = examples.len(),
            examples = report.examples,
            message = %report.message,
            "classifier retrained"
        );
        Ok(report)
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
