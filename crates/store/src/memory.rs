//! In-process store backend.
//!
//! Backs the default binary and the test suite. All operations take one
//! lock acquisition; insert is atomic with respect to concurrent finds.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use comment_core::{Comment, CommentStatus, Result};

use crate::filter::{CommentFilter, FindOptions, SortOrder};
use crate::CommentStore;

/// Comment collection held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, any status.
    pub fn len(&self) -> usize {
        self.comments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.read().is_empty()
    }

    /// Snapshot of every stored record, for test assertions.
    pub fn dump(&self) -> Vec<Comment> {
        self.comments.read().clone()
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find(&self, filter: &CommentFilter, options: FindOptions) -> Result<Vec<Comment>> {
        let comments = self.comments.read();
        let mut matched: Vec<Comment> = comments
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();

        match options.sort {
            SortOrder::CreatedDesc => matched.sort_by(|a, b| b.created.cmp(&a.created)),
            SortOrder::CreatedAsc => matched.sort_by(|a, b| a.created.cmp(&b.created)),
        }

        let skipped = matched.into_iter().skip(options.skip as usize);
        Ok(match options.limit {
            Some(limit) => skipped.take(limit as usize).collect(),
            None => skipped.collect(),
        })
    }

    async fn count(&self, filter: &CommentFilter) -> Result<u64> {
        let comments = self.comments.read();
        Ok(comments.iter().filter(|c| filter.matches(c)).count() as u64)
    }

    async fn count_by_path(
        &self,
        paths: &[String],
        top_level_only: bool,
    ) -> Result<HashMap<String, u64>> {
        let comments = self.comments.read();
        let mut grouped: HashMap<String, u64> = HashMap::new();
        for c in comments.iter() {
            if c.status != CommentStatus::Accept {
                continue;
            }
            if top_level_only && !c.pid.is_empty() {
                continue;
            }
            if paths.contains(&c.path) {
                *grouped.entry(c.path.clone()).or_default() += 1;
            }
        }
        Ok(grouped)
    }

    async fn insert(&self, mut comment: Comment) -> Result<Comment> {
        if comment.id.is_empty() {
            comment.id = Uuid::new_v4().to_string();
        }
        let mut comments = self.comments.write();
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn ping(&self) -> bool {
        true
    }
}
