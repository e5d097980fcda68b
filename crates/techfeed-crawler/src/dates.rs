//! Timestamp parsing for feed date fields.
//!
//! Installed as the feed parser's timestamp hook so every `published` /
//! `updated` value goes through the same ordered format list.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Zone abbreviations rewritten to numeric offsets before the lenient
/// RFC 822 pass. `KST` and `JST` are common in Korean and Japanese feeds.
const NAMED_ZONES: [(&str, &str); 5] = [
    ("KST", "+0900"),
    ("JST", "+0900"),
    ("GMT", "+0000"),
    ("UTC", "+0000"),
    ("Z", "+0000"),
];

/// Applied after the weekday prefix is removed, so a weekday that does not
/// match the date is ignored.
const RFC822_OFFSET_FORMATS: [&str; 4] = [
    "%d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %:z",
    "%d %b %Y %H:%M %z",
    "%d %b %Y %H:%M %:z",
];

const ISO_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Parse a feed timestamp, trying formats in order until one succeeds:
///
/// 1. RFC 822/2822 with a numeric offset or a standard zone name
/// 2. lenient RFC 822: weekday ignored, colon offsets, missing seconds, and
///    regional zone abbreviations (`KST`, `JST`, `UTC`)
/// 3. RFC 3339 / ISO 8601 with offset, with or without fractional seconds
/// 4. ISO 8601 with a colon-less offset (`+0900`)
/// 5. ISO 8601 without offset, read as UTC
/// 6. a bare `YYYY-MM-DD` date, read as midnight UTC
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_rfc822_lenient(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, ISO_OFFSET_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_rfc822_lenient(text: &str) -> Option<DateTime<FixedOffset>> {
    let body = strip_weekday(text);
    let rewritten = match body.rsplit_once(' ') {
        Some((rest, zone)) => match NAMED_ZONES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        {
            Some((_, offset)) => format!("{rest} {offset}"),
            None => body.to_string(),
        },
        None => return None,
    };
    RFC822_OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&rewritten, format).ok())
}

/// Drops a leading `"Tue, "` (any alphabetic word followed by a comma).
fn strip_weekday(text: &str) -> &str {
    match text.split_once(',') {
        Some((day, rest)) if !day.is_empty() && day.chars().all(char::is_alphabetic) => {
            rest.trim_start()
        }
        _ => text,
    }
}
