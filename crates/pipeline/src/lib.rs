//! Comment query and submission pipelines.
//!
//! [`CommentPipeline`] composes the store port with the external
//! collaborators (spam classifier, token verifier, push notifier) and the
//! in-process submission rate limiter. Configuration is passed into every
//! entry point; the pipeline holds no ambient state beyond the limiter it
//! was constructed with.

pub mod auth;
pub mod classify;
pub mod notify;
pub mod query;
pub mod rate_limit;
pub mod replies;
pub mod submit;

use std::sync::Arc;

use comment_core::{CommentConfig, CommentView, Result};
use comment_store::CommentStore;

pub use auth::TokenVerifier;
pub use classify::{ClassifyRequest, HttpClassifier, SpamClassifier};
pub use notify::{HttpNotifier, Notifier, PushEvent};
pub use query::{CommentPage, CountRequest, ListRequest, PathCount, RecentRequest};
pub use rate_limit::SubmissionLimiter;
pub use submit::SubmitRequest;

/// The comment engine's orchestration layer.
pub struct CommentPipeline {
    store: Arc<dyn CommentStore>,
    classifier: Arc<dyn SpamClassifier>,
    verifier: TokenVerifier,
    notifier: Arc<dyn Notifier>,
    limiter: Arc<SubmissionLimiter>,
}

impl CommentPipeline {
    pub fn new(
        store: Arc<dyn CommentStore>,
        classifier: Arc<dyn SpamClassifier>,
        verifier: TokenVerifier,
        notifier: Arc<dyn Notifier>,
        limiter: Arc<SubmissionLimiter>,
    ) -> Self {
        Self {
            store,
            classifier,
            verifier,
            notifier,
            limiter,
        }
    }

    pub fn store(&self) -> &Arc<dyn CommentStore> {
        &self.store
    }

    pub fn limiter(&self) -> &Arc<SubmissionLimiter> {
        &self.limiter
    }

    /// List one page of a path's comment thread.
    pub async fn list(&self, config: &CommentConfig, request: ListRequest) -> Result<CommentPage> {
        query::list(self.store.as_ref(), config, request).await
    }

    /// Most recent accepted comments site-wide.
    pub async fn recent(
        &self,
        config: &CommentConfig,
        request: RecentRequest,
    ) -> Result<Vec<CommentView>> {
        query::recent(self.store.as_ref(), config, request).await
    }

    /// Per-path accepted comment counts, input order preserved.
    pub async fn counts(&self, request: CountRequest) -> Result<Vec<PathCount>> {
        query::counts(self.store.as_ref(), request).await
    }

    /// Validate, classify, persist, and notify for one submission.
    pub async fn submit(
        &self,
        config: &CommentConfig,
        request: SubmitRequest,
        ip: String,
    ) -> Result<CommentView> {
        submit::submit(
            self.store.as_ref(),
            self.classifier.as_ref(),
            &self.verifier,
            &self.notifier,
            &self.limiter,
            config,
            request,
            ip,
        )
        .await
    }
}
