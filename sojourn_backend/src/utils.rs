//! Shared helpers and constants will live here.

use chrono::Utc;

pub const APP_NAME: &str = "sojourn_backend";

pub fn now_utc_iso() -> String {
    Utc::now().to_rfc3339()
}

/// Ids are derived from the wall clock, e.g. `post_1705312200000`.
pub fn timestamp_id(prefix: &str) -> String {
    format!("{prefix}_{}", Utc::now().timestamp_millis())
}
