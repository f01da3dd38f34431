//! Relative-time labels for display.

use chrono::{DateTime, Utc};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// Bucket the elapsed time since `created` into the coarsest-appropriate
/// human label. Buckets use integer division of the millisecond delta:
/// under 64 minutes shows minutes, under 24 hours shows hours, under 7
/// days shows days, beyond that the absolute date.
pub fn time_ago(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.timestamp_millis() - created.timestamp_millis();

    let minutes = diff / MINUTE_MS;
    let hours = diff / HOUR_MS;
    let days = diff / DAY_MS;

    if minutes == 0 {
        "刚刚".to_string()
    } else if minutes < 64 {
        format!("{minutes} 分钟前")
    } else if hours < 24 {
        format!("{hours} 小时前")
    } else if days < 7 {
        format!("{days} 天前")
    } else {
        created.format("%Y-%m-%d").to_string()
    }
}
