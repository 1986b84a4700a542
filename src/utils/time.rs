//! Timestamp helpers. Record timestamps are written in Korea Standard Time
//! (UTC+9) so that they sort lexicographically among themselves.

use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};

const KST_OFFSET_SECS: i32 = 9 * 3600;

fn kst() -> FixedOffset {
    // 9h is always in range
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Formats `at` as an RFC 3339 string in KST with millisecond precision,
/// e.g. `2025-01-25T18:30:00.000+09:00`.
#[must_use]
pub fn kst_iso_string(at: DateTime<Utc>) -> String {
    at.with_timezone(&kst()).to_rfc3339_opts(SecondsFormat::Millis, false)
}

#[must_use]
pub fn kst_now_iso_string() -> String {
    kst_iso_string(Utc::now())
}
