pub mod fetch;
pub mod info;
pub mod list;
pub mod register;
pub mod serve;
pub mod verify;

/// Unix timestamp as RFC 3339, or the raw number when out of range
pub fn format_timestamp(unix: i64) -> String {
    chrono::DateTime::from_timestamp(unix, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| unix.to_string())
}
