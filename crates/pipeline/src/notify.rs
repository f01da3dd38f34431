//! Best-effort new-comment notification.
//!
//! The submission pipeline waits at most [`NOTIFY_WAIT`] for the dispatch;
//! the spawned call keeps running past that bound, only the wait stops.
//! Outcomes are logged, never surfaced, and never roll back the insert.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use std::time::Duration;

use comment_core::{Comment, CommentConfig, Error, Result};

/// Upper bound on how long a submission waits for its notification.
pub const NOTIFY_WAIT: Duration = Duration::from_millis(500);

/// Marker distinguishing push-mail events on the wire.
const PUSH_MAIL: &str = "PUSH_MAIL";

/// New-comment event posted to the push endpoint. Carries the one-time
/// credential and the event marker; neither exists on the stored record,
/// so they can never leak into a client response.
#[derive(Debug, Clone, Serialize)]
pub struct PushEvent {
    #[serde(flatten)]
    pub comment: Comment,
    pub token: String,
    pub r#type: &'static str,
}

/// Outbound notification dispatcher.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Single delivery attempt, no retry.
    async fn push(&self, event: PushEvent) -> Result<()>;
}

/// POSTs push events to the configured endpoint with the site origin.
pub struct HttpNotifier {
    url: Option<String>,
    origin: String,
    http: reqwest::Client,
}

impl HttpNotifier {
    pub fn new(config: &CommentConfig) -> Self {
        Self {
            url: config.push_url.clone(),
            origin: config.site_url.clone(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn push(&self, event: PushEvent) -> Result<()> {
        let Some(url) = &self.url else {
            return Err(Error::notification("no push endpoint configured"));
        };

        let response = self
            .http
            .post(url)
            .header("origin", &self.origin)
            .json(&event)
            .send()
            .await
            .map_err(|e| Error::notification(format!("push endpoint unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::notification(format!(
                "push endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Derive the one-time push credential from the owner's secret material.
/// Deterministic so the receiving dispatcher can recompute and compare.
pub fn push_credential(username: &str, password: &str, owner_mail: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(password.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(username.as_bytes());
    mac.update(owner_mail.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Assemble the push event for a stored comment, or `None` when the
/// outbound-mail configuration is incomplete or no push endpoint is set.
pub fn build_push_event(config: &CommentConfig, comment: &Comment) -> Option<PushEvent> {
    if !config.mail.is_complete() {
        return None;
    }
    config.push_url.as_ref()?;

    Some(PushEvent {
        comment: comment.clone(),
        token: push_credential(&config.username, &config.password, &config.owner_mail),
        r#type: PUSH_MAIL,
    })
}
