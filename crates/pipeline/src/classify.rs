//! Spam classification client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use comment_core::{ClassifierSettings, CommentStatus, Error, Result};

/// Submission metadata handed to the classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest {
    pub ip: String,
    pub name: String,
    pub email: String,
    pub content: String,
    pub url: String,
    /// "comment" for top-level submissions, "reply" otherwise.
    pub r#type: &'static str,
    pub useragent: String,
}

/// Moderation verdict provider.
#[async_trait]
pub trait SpamClassifier: Send + Sync {
    /// Classify one submission. A transport failure is an error; the
    /// submission pipeline maps it to the configured fallback status
    /// rather than failing the submission.
    async fn classify(&self, request: &ClassifyRequest) -> Result<CommentStatus>;
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    status: CommentStatus,
}

/// HTTP classifier client.
///
/// With no endpoint configured every submission is admitted, matching a
/// deployment that never signed up for a classification service.
pub struct HttpClassifier {
    endpoint: Option<String>,
    key: Option<String>,
    site_url: String,
    http: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(settings: &ClassifierSettings, site_url: impl Into<String>) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            key: settings.key.clone(),
            site_url: site_url.into(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl SpamClassifier for HttpClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<CommentStatus> {
        let Some(endpoint) = &self.endpoint else {
            debug!("no classifier configured, admitting submission");
            return Ok(CommentStatus::Accept);
        };

        let body = serde_json::json!({
            "key": self.key,
            "site": self.site_url,
            "ip": request.ip,
            "name": request.name,
            "email": request.email,
            "content": request.content,
            "url": request.url,
            "type": request.r#type,
            "useragent": request.useragent,
        });

        let response = self
            .http
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::internal(format!("classifier unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::internal(format!(
                "classifier returned {}",
                response.status()
            )));
        }

        let verdict: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| Error::internal(format!("invalid classifier response: {e}")))?;

        Ok(verdict.status)
    }
}
