//! Reply expansion for threaded listings.

use comment_core::{Comment, Result};
use comment_store::{CommentFilter, CommentStore, FindOptions, SortOrder};

/// Fetch every accepted reply to the given parents in one batched store
/// query, oldest first. Arbitrary reply depth collapses onto the thread
/// root through `pid`, so a single `pid IN ids` lookup covers the whole
/// thread. Parents with no replies contribute nothing.
pub async fn expand_replies(store: &dyn CommentStore, parents: &[Comment]) -> Result<Vec<Comment>> {
    let ids: Vec<String> = parents
        .iter()
        .filter(|c| !c.id.is_empty())
        .map(|c| c.id.clone())
        .collect();

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    store
        .find(
            &CommentFilter::replies_to(ids),
            FindOptions::sorted(SortOrder::CreatedAsc),
        )
        .await
}
