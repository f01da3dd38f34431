//! Comment endpoints.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use comment_core::CommentView;
use pipeline::{CommentPage, CountRequest, ListRequest, PathCount, RecentRequest, SubmitRequest};
use telemetry::metrics;

use crate::extractors::ClientIp;
use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub path: String,
    /// Kept as a string so a malformed page number degrades to page 1
    /// instead of rejecting the request.
    #[serde(rename = "pageNo", default)]
    pub page_no: Option<String>,
}

/// GET /comment — one page of a path's threaded comments.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CommentPage>, ApiError> {
    let start = Instant::now();

    let request = ListRequest {
        page: query.page_no.as_deref().and_then(|p| p.parse().ok()),
        path: query.path,
    };
    debug!(path = %request.path, page = ?request.page, "listing comments");

    let page = state.pipeline.list(&state.config, request).await?;

    metrics()
        .list_latency_ms
        .observe(start.elapsed().as_millis() as u64);
    Ok(Json(page))
}

/// POST /comment — submit a new comment.
pub async fn submit_handler(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<CommentView>, ApiError> {
    let ip = ip.unwrap_or_default();
    let path = request.path.clone();

    let view = state.pipeline.submit(&state.config, request, ip).await?;

    info!(id = %view.id, path = %path, "comment submitted");
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    /// `reply=false` excludes replies, matching the widget's query string.
    #[serde(default)]
    pub reply: Option<bool>,
}

/// GET /comment/recent — most recent accepted comments site-wide.
pub async fn recent_handler(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    let request = RecentRequest {
        include_replies: query.reply.unwrap_or(true),
    };
    let views = state.pipeline.recent(&state.config, request).await?;
    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct CountBody {
    pub paths: Vec<String>,
    #[serde(default)]
    pub reply: Option<bool>,
}

/// POST /comment/count — batched per-path comment counts.
pub async fn count_handler(
    State(state): State<AppState>,
    Json(body): Json<CountBody>,
) -> Result<Json<Vec<PathCount>>, ApiError> {
    let request = CountRequest {
        paths: body.paths,
        include_replies: body.reply.unwrap_or(true),
    };
    let counts = state.pipeline.counts(request).await?;
    Ok(Json(counts))
}
