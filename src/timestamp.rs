use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// How `log_timestamp` is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampStyle {
    /// Wall-clock time in the configured zone followed by a literal `Z`,
    /// e.g. `2024-01-15T07:00:00Z` for 12:00 UTC in New York. This is
    /// what existing servers expect even though the suffix claims UTC.
    #[default]
    LocalWithZulu,
    /// RFC 3339 with the zone's real offset, e.g. `2024-01-15T07:00:00-05:00`.
    Rfc3339,
}

/// Render `instant` in `tz`.
pub fn format_timestamp(instant: DateTime<Utc>, tz: Tz, style: TimestampStyle) -> String {
    let local = instant.with_timezone(&tz);
    match style {
        TimestampStyle::LocalWithZulu => local.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        TimestampStyle::Rfc3339 => local.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
    }
}
