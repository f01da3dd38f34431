//! Mock implementations for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use comment_core::{Comment, CommentStatus, Error, Result};
use comment_store::{CommentFilter, CommentStore, FindOptions, MemoryStore};
use pipeline::{ClassifyRequest, Notifier, PushEvent, SpamClassifier};

/// Classifier returning a scripted verdict, optionally failing instead.
///
/// Implements the same `SpamClassifier` trait as the real HTTP client, so
/// tests exercise every production code path except the network call.
pub struct ScriptedClassifier {
    verdict: Mutex<CommentStatus>,
    should_fail: Mutex<bool>,
    requests: Mutex<Vec<ClassifyRequest>>,
}

impl ScriptedClassifier {
    pub fn new(verdict: CommentStatus) -> Self {
        Self {
            verdict: Mutex::new(verdict),
            should_fail: Mutex::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_verdict(&self, verdict: CommentStatus) {
        *self.verdict.lock() = verdict;
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    /// Requests the pipeline actually sent.
    pub fn seen(&self) -> Vec<ClassifyRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl SpamClassifier for ScriptedClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<CommentStatus> {
        self.requests.lock().push(request.clone());
        if *self.should_fail.lock() {
            return Err(Error::internal("scripted classifier failure"));
        }
        Ok(*self.verdict.lock())
    }
}

/// Notifier that captures push events in memory. A configurable delay
/// simulates a slow push endpoint for the bounded-wait tests.
#[derive(Default)]
pub struct CapturingNotifier {
    events: Mutex<Vec<PushEvent>>,
    delay: Mutex<Option<Duration>>,
    should_fail: Mutex<bool>,
}

impl CapturingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    pub fn captured(&self) -> Vec<PushEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn push(&self, event: PushEvent) -> Result<()> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.should_fail.lock() {
            return Err(Error::notification("scripted notifier failure"));
        }
        self.events.lock().push(event);
        Ok(())
    }
}

/// Store whose writes always fail, for persistence-error paths.
#[derive(Default)]
pub struct FailingStore;

#[async_trait]
impl CommentStore for FailingStore {
    async fn find(&self, _filter: &CommentFilter, _options: FindOptions) -> Result<Vec<Comment>> {
        Ok(Vec::new())
    }

    async fn count(&self, _filter: &CommentFilter) -> Result<u64> {
        Ok(0)
    }

    async fn count_by_path(
        &self,
        _paths: &[String],
        _top_level_only: bool,
    ) -> Result<HashMap<String, u64>> {
        Ok(HashMap::new())
    }

    async fn insert(&self, _comment: Comment) -> Result<Comment> {
        Err(Error::persistence("scripted store failure"))
    }

    async fn ping(&self) -> bool {
        false
    }
}

/// Store wrapper counting find calls, for the single-round-trip contract
/// of the reply expander.
pub struct CountingStore {
    inner: Arc<MemoryStore>,
    find_calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            find_calls: AtomicUsize::new(0),
        }
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommentStore for CountingStore {
    async fn find(&self, filter: &CommentFilter, options: FindOptions) -> Result<Vec<Comment>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find(filter, options).await
    }

    async fn count(&self, filter: &CommentFilter) -> Result<u64> {
        self.inner.count(filter).await
    }

    async fn count_by_path(
        &self,
        paths: &[String],
        top_level_only: bool,
    ) -> Result<HashMap<String, u64>> {
        self.inner.count_by_path(paths, top_level_only).await
    }

    async fn insert(&self, comment: Comment) -> Result<Comment> {
        self.inner.insert(comment).await
    }

    async fn ping(&self) -> bool {
        self.inner.ping().await
    }
}
