//! Comment record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation state of a stored comment. Only `Accept` is publicly listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Accept,
    Waiting,
    Spam,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Waiting => "waiting",
            Self::Spam => "spam",
        }
    }
}

impl Default for CommentStatus {
    fn default() -> Self {
        Self::Accept
    }
}

/// A stored comment record, owned by the store.
///
/// `pid` names the top-level ancestor of the thread ("" for a top-level
/// comment); `rid` names the comment directly replied to, which may sit
/// deeper in the thread. Thread structure is reconstructed at query time
/// from these two fields, never stored as a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Opaque unique identifier, assigned by the store at insert.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pid: String,
    #[serde(default)]
    pub rid: String,
    /// Normalized page identifier (trailing index.html stripped).
    pub path: String,
    pub nick: String,
    pub mail: String,
    #[serde(default)]
    pub site: String,
    pub content: String,
    pub ua: String,
    #[serde(default)]
    pub ip: String,
    pub status: CommentStatus,
    /// Sticky comments are prepended to page 1 only and excluded from the
    /// normal pagination count.
    #[serde(default)]
    pub stick: bool,
    pub created: DateTime<Utc>,
}

impl Comment {
    /// A comment with an empty `pid` starts its own thread.
    pub fn is_top_level(&self) -> bool {
        self.pid.is_empty()
    }
}
