//! Read-side operations: page listing, recent comments, batch counts.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use comment_core::{
    clamp_page, normalize_path, CommentConfig, CommentView, HighlightOptions, MarkedOptions,
    Result, WordLimits,
};
use comment_store::{CommentFilter, CommentStore, FindOptions, SortOrder};
use telemetry::metrics;

use crate::replies::expand_replies;

/// One page of a path's comments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRequest {
    pub path: String,
    /// Requested page; `None` (absent or unparseable) falls back to 1.
    pub page: Option<u64>,
}

/// Listing response: sticky comments, then the page slice, then every
/// reply to either, plus the display configuration clients need to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<CommentView>,
    pub counts: u64,
    pub page_count: u64,
    #[serde(rename = "wordNumber")]
    pub word_number: WordLimits,
    pub marked: MarkedOptions,
    pub highlight: HighlightOptions,
}

/// List one page of comments for a path.
pub async fn list(
    store: &dyn CommentStore,
    config: &CommentConfig,
    request: ListRequest,
) -> Result<CommentPage> {
    metrics().list_requests.inc();

    let path = normalize_path(&request.path);
    let base = CommentFilter::page_slice(path.clone());

    let counts = store.count(&base).await?;
    let window = clamp_page(request.page, config.comment_count, counts);

    // Sticky comments lead page 1 only and sit outside the normal count.
    let mut merged = if window.page == 1 {
        store
            .find(
                &CommentFilter::sticky(path.clone()),
                FindOptions::sorted(SortOrder::CreatedDesc),
            )
            .await?
    } else {
        Vec::new()
    };

    let slice = store
        .find(
            &base,
            FindOptions::page(
                SortOrder::CreatedDesc,
                window.skip(config.comment_count),
                config.comment_count,
            ),
        )
        .await?;
    merged.extend(slice);

    let replies = expand_replies(store, &merged).await?;
    merged.extend(replies);

    let now = Utc::now();
    let comments: Vec<CommentView> = merged
        .iter()
        .map(|c| CommentView::from_comment(c, now))
        .collect();
    metrics().comments_returned.inc_by(comments.len() as u64);

    Ok(CommentPage {
        comments,
        counts,
        page_count: window.page_count,
        word_number: config.word_limit.clone(),
        marked: config.marked.clone(),
        highlight: config.highlight.clone(),
    })
}

/// Site-wide recent comments.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RecentRequest {
    /// When false, only top-level comments are returned.
    pub include_replies: bool,
}

impl Default for RecentRequest {
    fn default() -> Self {
        Self {
            include_replies: true,
        }
    }
}

/// Fetch the most recent accepted comments, newest first, capped at the
/// configured page size.
pub async fn recent(
    store: &dyn CommentStore,
    config: &CommentConfig,
    request: RecentRequest,
) -> Result<Vec<CommentView>> {
    metrics().recent_requests.inc();

    let filter = CommentFilter::accepted(!request.include_replies);
    let comments = store
        .find(
            &filter,
            FindOptions::page(SortOrder::CreatedDesc, 0, config.comment_count),
        )
        .await?;

    let now = Utc::now();
    Ok(comments
        .iter()
        .map(|c| CommentView::from_comment(c, now))
        .collect())
}

/// Batched per-path comment counts.
#[derive(Debug, Clone, Deserialize)]
pub struct CountRequest {
    pub paths: Vec<String>,
    /// When false, replies are excluded from each count.
    pub include_replies: bool,
}

/// One entry of the count response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCount {
    pub path: String,
    pub count: u64,
}

/// Group-count accepted comments per path in one aggregation. The result
/// mirrors the input's order and length; paths without matches count 0.
pub async fn counts(store: &dyn CommentStore, request: CountRequest) -> Result<Vec<PathCount>> {
    metrics().count_requests.inc();

    let normalized: Vec<String> = request.paths.iter().map(|p| normalize_path(p)).collect();
    let grouped = store
        .count_by_path(&normalized, !request.include_replies)
        .await?;

    Ok(normalized
        .into_iter()
        .map(|path| {
            let count = grouped.get(&path).copied().unwrap_or(0);
            PathCount { path, count }
        })
        .collect())
}
