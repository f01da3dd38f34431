//! Document-collection port for comment persistence.
//!
//! The engine treats its store as a document collection with find, count,
//! group-count, and insert operations. Deployments plug a driver in by
//! implementing [`CommentStore`]; the bundled [`MemoryStore`] backs the
//! default binary and the test suite.

pub mod filter;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;

use comment_core::{Comment, Result};

pub use filter::{CommentFilter, FindOptions, PidFilter, SortOrder, StickFilter};
pub use memory::MemoryStore;

/// Persistence contract for comment records.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Fetch comments matching `filter`, sorted/sliced per `options`.
    async fn find(&self, filter: &CommentFilter, options: FindOptions) -> Result<Vec<Comment>>;

    /// Count comments matching `filter`.
    async fn count(&self, filter: &CommentFilter) -> Result<u64>;

    /// Group-count accepted comments per path in one aggregation.
    /// Paths with no matches are simply absent from the map.
    async fn count_by_path(
        &self,
        paths: &[String],
        top_level_only: bool,
    ) -> Result<HashMap<String, u64>>;

    /// Insert a record, assigning an id if the caller left it empty.
    /// Returns the stored record.
    async fn insert(&self, comment: Comment) -> Result<Comment>;

    /// Connectivity probe for health reporting.
    async fn ping(&self) -> bool;
}
