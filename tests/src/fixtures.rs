//! Test fixtures and builders.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use comment_core::{Comment, CommentStatus};

/// Signing secret wired into the test config's token verifier.
pub const TEST_SECRET: &str = "test-secret";

/// Owner mail wired into the test config.
pub const OWNER_MAIL: &str = "owner@example.com";

/// A valid submission body for the given path.
pub fn submit_body(path: &str) -> serde_json::Value {
    serde_json::json!({
        "nick": "visitor",
        "mail": "visitor@example.com",
        "content": "Nice article!",
        "ua": "Mozilla/5.0 (Test)",
        "path": path,
    })
}

/// A stored comment with explicit id and age.
pub fn comment(id: &str, path: &str, pid: &str, minutes_ago: i64) -> Comment {
    Comment {
        id: id.into(),
        pid: pid.into(),
        rid: pid.into(),
        path: path.into(),
        nick: format!("nick-{id}"),
        mail: format!("{id}@example.com"),
        site: String::new(),
        content: format!("content of {id}"),
        ua: "Mozilla/5.0 (Test)".into(),
        ip: "203.0.113.7".into(),
        status: CommentStatus::Accept,
        stick: false,
        created: Utc::now() - Duration::minutes(minutes_ago),
    }
}

/// Same, with a non-accept status.
pub fn comment_with_status(
    id: &str,
    path: &str,
    minutes_ago: i64,
    status: CommentStatus,
) -> Comment {
    Comment {
        status,
        ..comment(id, path, "", minutes_ago)
    }
}

/// A sticky top-level comment.
pub fn sticky_comment(id: &str, path: &str, minutes_ago: i64) -> Comment {
    Comment {
        stick: true,
        ..comment(id, path, "", minutes_ago)
    }
}

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// A token the local verifier accepts.
pub fn signed_token() -> String {
    token_signed_with(TEST_SECRET)
}

/// A token signed with an arbitrary secret.
pub fn token_signed_with(secret: &str) -> String {
    let claims = Claims {
        sub: "admin".into(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
