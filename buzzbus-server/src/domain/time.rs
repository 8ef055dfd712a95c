//! Clock times as reported by TransLoc.
//!
//! Arrival records carry times in the WCF JSON form
//! `/Date(1700000000000-0500)/`: milliseconds since the Unix epoch followed
//! by the local UTC offset. Some deployments send RFC 3339 instead.

use chrono::{DateTime, FixedOffset};

/// Parse a TransLoc timestamp into a zoned datetime.
///
/// Returns `None` for anything unrecognised; clock times are display-only
/// and never fail a request.
///
/// # Examples
///
/// ```
/// use buzzbus_server::domain::parse_transloc_timestamp;
///
/// let t = parse_transloc_timestamp("/Date(1700000000000-0500)/").unwrap();
/// assert_eq!(t.format("%H:%M").to_string(), "17:13");
///
/// assert!(parse_transloc_timestamp("soon").is_none());
/// ```
pub fn parse_transloc_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix("/Date(").and_then(|r| r.strip_suffix(")/")) {
        return parse_epoch_millis(inner);
    }

    DateTime::parse_from_rfc3339(s).ok()
}

/// Format a TransLoc timestamp as local `HH:MM`.
pub fn format_clock_time(s: &str) -> Option<String> {
    parse_transloc_timestamp(s).map(|t| t.format("%H:%M").to_string())
}

fn parse_epoch_millis(inner: &str) -> Option<DateTime<FixedOffset>> {
    // Skip position 0 so a negative epoch isn't read as an offset.
    let split = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i);

    let (millis, offset) = match split {
        Some(i) => (&inner[..i], parse_offset(&inner[i..])?),
        None => (inner, FixedOffset::east_opt(0)?),
    };

    let millis: i64 = millis.parse().ok()?;
    let utc = DateTime::from_timestamp_millis(millis)?;
    Some(utc.with_timezone(&offset))
}

/// Parse `+HHMM` / `-HHMM`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    if s.len() != 5 || !s.is_ascii() {
        return None;
    }

    let sign = match &s[..1] {
        "+" => 1,
        "-" => -1,
        _ => return None,
    };
    let hours: i32 = s[1..3].parse().ok()?;
    let mins: i32 = s[3..5].parse().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + mins * 60))
}
