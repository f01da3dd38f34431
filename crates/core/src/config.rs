//! Configuration consumed by the pipelines.
//!
//! The binary owns loading (files + environment); the pipelines receive the
//! resolved value explicitly on every entry point rather than reading any
//! ambient global.

use serde::{Deserialize, Serialize};

use crate::comment::CommentStatus;
use crate::limits::WordLimits;

/// Resolved configuration for the query and submission pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentConfig {
    /// Page size for listings and the recent-comment cap.
    #[serde(default = "default_comment_count")]
    pub comment_count: u64,

    /// Per-field length bounds applied to anonymous submissions.
    #[serde(default)]
    pub word_limit: WordLimits,

    /// The site owner's mail address. Anonymous submissions using it are
    /// rejected; it also enters the push credential derivation.
    #[serde(default)]
    pub owner_mail: String,

    /// Admin login name, part of the push credential secret material.
    #[serde(default)]
    pub username: String,

    /// Admin password, part of the push credential secret material.
    #[serde(default)]
    pub password: String,

    /// Public origin of the site, sent as the Origin header on push calls
    /// and forwarded to the spam classifier.
    #[serde(default)]
    pub site_url: String,

    /// Push endpoint receiving the new-comment event. Notification is
    /// skipped entirely when unset.
    #[serde(default)]
    pub push_url: Option<String>,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    #[serde(default)]
    pub mail: MailSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub classifier: ClassifierSettings,

    #[serde(default)]
    pub marked: MarkedOptions,

    #[serde(default)]
    pub highlight: HighlightOptions,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            comment_count: default_comment_count(),
            word_limit: WordLimits::default(),
            owner_mail: String::new(),
            username: String::new(),
            password: String::new(),
            site_url: String::new(),
            push_url: None,
            rate_limit: RateLimitSettings::default(),
            mail: MailSettings::default(),
            auth: AuthSettings::default(),
            classifier: ClassifierSettings::default(),
            marked: MarkedOptions::default(),
            highlight: HighlightOptions::default(),
        }
    }
}

fn default_comment_count() -> u64 {
    10
}

/// Submission rate limiting: at most `max_submissions` per identifier
/// inside a sliding `window_secs` window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_max_submissions")]
    pub max_submissions: usize,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_submissions() -> usize {
    5
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_secs: default_window_secs(),
        }
    }
}

/// Outbound-mail settings. The submission pipeline only checks completeness;
/// the actual mailing happens behind the push endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub from: Option<String>,
    pub accept: Option<String>,
    pub master_subject: Option<String>,
    pub reply_subject: Option<String>,
}

impl MailSettings {
    /// Every field must be present before a notification is attempted.
    pub fn is_complete(&self) -> bool {
        self.host.is_some()
            && self.port.is_some()
            && self.from.is_some()
            && self.accept.is_some()
            && self.master_subject.is_some()
            && self.reply_subject.is_some()
    }
}

/// Token verification settings. With an endpoint set, tokens are verified
/// remotely; otherwise they are decoded locally against `secret`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    pub endpoint: Option<String>,
    #[serde(default)]
    pub secret: String,
}

/// Spam classifier settings. `fallback` is the status applied when the
/// classifier errors out; the pipeline never fails a submission on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    pub endpoint: Option<String>,
    pub key: Option<String>,
    #[serde(default)]
    pub fallback: CommentStatus,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            key: None,
            fallback: CommentStatus::Accept,
        }
    }
}

/// Markdown toggle echoed to clients in list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkedOptions {
    #[serde(default)]
    pub enable: bool,
    pub source: Option<String>,
}

/// Syntax highlight toggle echoed to clients in list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighlightOptions {
    #[serde(default)]
    pub enable: bool,
    pub source: Option<String>,
    pub theme: Option<String>,
}
