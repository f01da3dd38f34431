//! Display formatting for stored comments.
//!
//! The view is the only comment shape that leaves the service: mail, ip,
//! and user agent are masked, the raw timestamp is collapsed into its
//! relative-time label, and text fields pass through the HTML escaper so
//! no unsanitized content travels downstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comment::{Comment, CommentStatus};
use crate::timeago::time_ago;

/// Externally safe, display-ready shape of one comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub pid: String,
    pub rid: String,
    pub path: String,
    pub nick: String,
    pub site: String,
    pub content: String,
    pub status: CommentStatus,
    pub stick: bool,
    /// Relative-time label, e.g. "5 分钟前".
    pub time: String,
}

impl CommentView {
    pub fn from_comment(comment: &Comment, now: DateTime<Utc>) -> Self {
        Self {
            id: comment.id.clone(),
            pid: comment.pid.clone(),
            rid: comment.rid.clone(),
            path: comment.path.clone(),
            nick: html_escape::encode_safe(&comment.nick).into_owned(),
            site: html_escape::encode_safe(&comment.site).into_owned(),
            content: html_escape::encode_safe(&comment.content).into_owned(),
            status: comment.status,
            stick: comment.stick,
            time: time_ago(comment.created, now),
        }
    }
}
