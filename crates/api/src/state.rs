//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use comment_core::CommentConfig;
use comment_store::CommentStore;
use pipeline::{CommentPipeline, HttpClassifier, HttpNotifier, SubmissionLimiter, TokenVerifier};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Query and submission orchestration.
    pub pipeline: Arc<CommentPipeline>,
    /// Store handle for health probes.
    pub store: Arc<dyn CommentStore>,
    /// Resolved configuration, passed into every pipeline call.
    pub config: Arc<CommentConfig>,
}

impl AppState {
    /// Wire the default collaborators (HTTP classifier/notifier, token
    /// verifier, in-process limiter) around the given store.
    pub fn new(store: Arc<dyn CommentStore>, config: CommentConfig) -> Self {
        let classifier = Arc::new(HttpClassifier::new(&config.classifier, config.site_url.clone()));
        let verifier = TokenVerifier::new(&config.auth);
        let notifier = Arc::new(HttpNotifier::new(&config));
        let limiter = Arc::new(SubmissionLimiter::new(&config.rate_limit));

        let pipeline = Arc::new(CommentPipeline::new(
            store.clone(),
            classifier,
            verifier,
            notifier,
            limiter,
        ));

        Self {
            pipeline,
            store,
            config: Arc::new(config),
        }
    }

    /// Build state around a fully custom pipeline (used by tests to swap
    /// in scripted collaborators).
    pub fn with_pipeline(
        pipeline: Arc<CommentPipeline>,
        store: Arc<dyn CommentStore>,
        config: CommentConfig,
    ) -> Self {
        Self {
            pipeline,
            store,
            config: Arc::new(config),
        }
    }

    /// Start the rate limiter cleanup background task.
    pub fn start_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.pipeline.limiter().clone();
        let max_age = Duration::from_secs(self.config.rate_limit.window_secs.max(60) * 2);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.cleanup_stale(max_age);
            }
        })
    }
}
