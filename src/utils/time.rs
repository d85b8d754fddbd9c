use chrono::Utc;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// All persisted timestamps are epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn days_from_now_ms(days: i64) -> i64 {
    now_ms() + days * DAY_MS
}
