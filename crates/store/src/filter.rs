//! Query shapes accepted by the store port.
//!
//! These mirror the filters the pipelines actually issue: exact path plus
//! status, a thread predicate on `pid`, a sticky predicate, created-order
//! sorting, and skip/limit slicing.

use comment_core::{Comment, CommentStatus};

/// Predicate on the `pid` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PidFilter {
    /// No constraint.
    #[default]
    Any,
    /// Top-level comments only (`pid == ""`).
    TopLevel,
    /// Replies to any of the given parent ids.
    In(Vec<String>),
}

/// Predicate on the `stick` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StickFilter {
    #[default]
    Any,
    /// Sticky comments only.
    Only,
    /// Everything but sticky comments.
    Exclude,
}

/// Conjunctive comment filter.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub path: Option<String>,
    pub status: Option<CommentStatus>,
    pub pid: PidFilter,
    pub stick: StickFilter,
}

impl CommentFilter {
    /// Base listing filter: accepted top-level comments of one page,
    /// sticky excluded.
    pub fn page_slice(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            status: Some(CommentStatus::Accept),
            pid: PidFilter::TopLevel,
            stick: StickFilter::Exclude,
        }
    }

    /// Accepted top-level sticky comments of one page.
    pub fn sticky(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            status: Some(CommentStatus::Accept),
            pid: PidFilter::TopLevel,
            stick: StickFilter::Only,
        }
    }

    /// Accepted replies to any of the given parents.
    pub fn replies_to(ids: Vec<String>) -> Self {
        Self {
            path: None,
            status: Some(CommentStatus::Accept),
            pid: PidFilter::In(ids),
            stick: StickFilter::Any,
        }
    }

    /// Accepted comments site-wide, optionally top-level only.
    pub fn accepted(top_level_only: bool) -> Self {
        Self {
            path: None,
            status: Some(CommentStatus::Accept),
            pid: if top_level_only {
                PidFilter::TopLevel
            } else {
                PidFilter::Any
            },
            stick: StickFilter::Any,
        }
    }

    /// Whether one record satisfies every predicate.
    pub fn matches(&self, comment: &Comment) -> bool {
        if let Some(path) = &self.path {
            if &comment.path != path {
                return false;
            }
        }
        if let Some(status) = self.status {
            if comment.status != status {
                return false;
            }
        }
        let pid_ok = match &self.pid {
            PidFilter::Any => true,
            PidFilter::TopLevel => comment.pid.is_empty(),
            PidFilter::In(ids) => ids.iter().any(|id| id == &comment.pid),
        };
        if !pid_ok {
            return false;
        }
        match self.stick {
            StickFilter::Any => true,
            StickFilter::Only => comment.stick,
            StickFilter::Exclude => !comment.stick,
        }
    }
}

/// Sort order on `created`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first — listings.
    #[default]
    CreatedDesc,
    /// Oldest first — replies within a thread.
    CreatedAsc,
}

/// Sorting and slicing for a find call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    pub sort: SortOrder,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn sorted(sort: SortOrder) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn page(sort: SortOrder, skip: u64, limit: u64) -> Self {
        Self {
            sort,
            skip,
            limit: Some(limit),
        }
    }
}
