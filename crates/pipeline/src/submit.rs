//! Write-side operation: validate, classify, persist, notify.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};
use validator::Validate;

use comment_core::{
    normalize_path, Comment, CommentConfig, CommentStatus, CommentView, Error, Result,
};
use comment_store::CommentStore;
use telemetry::metrics;

use crate::auth::TokenVerifier;
use crate::classify::{ClassifyRequest, SpamClassifier};
use crate::notify::{build_push_event, Notifier, NOTIFY_WAIT};
use crate::rate_limit::SubmissionLimiter;

/// Submitter-provided fields of one submission. The client IP arrives
/// separately from the transport layer. Required fields default to empty
/// on the wire so an absent field surfaces as this pipeline's validation
/// error, not a deserialization rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub nick: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub mail: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub ua: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub path: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub pid: String,
    #[serde(default)]
    pub rid: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Run the full submission pipeline. Steps are strictly sequential; every
/// rejection happens before the write, and the notification attempt after
/// it can never undo it.
#[allow(clippy::too_many_arguments)]
pub async fn submit(
    store: &dyn CommentStore,
    classifier: &dyn SpamClassifier,
    verifier: &TokenVerifier,
    notifier: &Arc<dyn Notifier>,
    limiter: &SubmissionLimiter,
    config: &CommentConfig,
    request: SubmitRequest,
    ip: String,
) -> Result<CommentView> {
    let start = Instant::now();
    metrics().submissions_received.inc();

    let result = run_steps(store, classifier, verifier, notifier, limiter, config, request, ip)
        .await;

    metrics()
        .submit_latency_ms
        .observe(start.elapsed().as_millis() as u64);
    if let Err(e) = &result {
        if matches!(e, Error::RateLimited { .. }) {
            metrics().submissions_rate_limited.inc();
        }
        metrics().submissions_rejected.inc();
    }
    result
}

#[allow(clippy::too_many_arguments)]
async fn run_steps(
    store: &dyn CommentStore,
    classifier: &dyn SpamClassifier,
    verifier: &TokenVerifier,
    notifier: &Arc<dyn Notifier>,
    limiter: &SubmissionLimiter,
    config: &CommentConfig,
    request: SubmitRequest,
    ip: String,
) -> Result<CommentView> {
    // 1. Required fields.
    check_required(&request)?;

    // 2. Privilege.
    let privileged = verifier.verify(request.token.as_deref()).await;

    // 3. Length quotas, anonymous submitters only.
    if !privileged {
        config
            .word_limit
            .check(&request.content, &request.nick, &request.mail, &request.site)?;
    }

    // 4. Anonymous use of the owner's mail requires signing in first.
    if !privileged && !config.owner_mail.is_empty() && request.mail == config.owner_mail {
        return Err(Error::IdentityConflict);
    }

    // 5. Rate limit per client identifier.
    limiter.check(&ip)?;

    // 6. Moderation verdict. The owner's own comments skip the classifier;
    //    classifier failures degrade to the configured fallback status.
    let status = if privileged {
        CommentStatus::Accept
    } else {
        let classify_request = ClassifyRequest {
            ip: ip.clone(),
            name: request.nick.clone(),
            email: request.mail.clone(),
            content: request.content.clone(),
            url: request.site.clone(),
            r#type: if request.rid.is_empty() { "comment" } else { "reply" },
            useragent: request.ua.clone(),
        };
        match classifier.classify(&classify_request).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, fallback = config.classifier.fallback.as_str(),
                    "classifier failed, applying fallback status");
                config.classifier.fallback
            }
        }
    };

    // 7. Persist the canonical record.
    let (pid, rid) = normalize_thread_refs(&request.pid, &request.rid);
    let record = Comment {
        id: String::new(),
        pid,
        rid,
        path: normalize_path(&request.path),
        nick: request.nick,
        mail: request.mail,
        site: request.site,
        content: request.content,
        ua: request.ua,
        ip,
        status,
        stick: false,
        created: Utc::now(),
    };
    let stored = store
        .insert(record)
        .await
        .map_err(|e| Error::persistence(e.to_string()))?;

    match status {
        CommentStatus::Accept => metrics().comments_accepted.inc(),
        CommentStatus::Waiting => metrics().comments_waiting.inc(),
        CommentStatus::Spam => metrics().comments_spam.inc(),
    }
    info!(id = %stored.id, path = %stored.path, status = status.as_str(), "comment stored");

    // 8. Best-effort notification, bounded wait, outcome discarded.
    dispatch_notification(notifier, config, &stored).await;

    // 9. The response view masks private fields; the push credential and
    //    event marker never existed on the stored record.
    Ok(CommentView::from_comment(&stored, Utc::now()))
}

fn check_required(request: &SubmitRequest) -> Result<()> {
    if request.validate().is_ok() {
        return Ok(());
    }
    for (name, value) in [
        ("nick", &request.nick),
        ("mail", &request.mail),
        ("content", &request.content),
        ("ua", &request.ua),
        ("path", &request.path),
    ] {
        if value.is_empty() {
            return Err(Error::validation(name));
        }
    }
    Ok(())
}

/// A reply names its thread root in `pid` and its direct parent in `rid`.
/// Clients replying to a top-level comment may send only `rid`.
fn normalize_thread_refs(pid: &str, rid: &str) -> (String, String) {
    if rid.is_empty() {
        (String::new(), String::new())
    } else if pid.is_empty() {
        (rid.to_string(), rid.to_string())
    } else {
        (pid.to_string(), rid.to_string())
    }
}

/// Race the dispatch against [`NOTIFY_WAIT`]. The spawned call survives the
/// deadline; only the wait ends. Errors are logged and swallowed.
async fn dispatch_notification(
    notifier: &Arc<dyn Notifier>,
    config: &CommentConfig,
    stored: &Comment,
) {
    let Some(event) = build_push_event(config, stored) else {
        debug!("notification skipped: mail or push configuration incomplete");
        return;
    };

    let notifier = notifier.clone();
    let handle = tokio::spawn(async move { notifier.push(event).await });

    match tokio::time::timeout(NOTIFY_WAIT, handle).await {
        Ok(Ok(Ok(()))) => {
            metrics().notifications_sent.inc();
        }
        Ok(Ok(Err(e))) => {
            metrics().notification_failures.inc();
            warn!(error = %e, "mail notification failed");
        }
        Ok(Err(e)) => {
            metrics().notification_failures.inc();
            warn!(error = %e, "notification task panicked");
        }
        Err(_) => {
            metrics().notification_timeouts.inc();
            debug!("notification still in flight, not waiting");
        }
    }
}
