//! Data models for the news listing exchanged over `/news`.
//!
//! - [`Article`]: one news item as the endpoint serves it
//! - [`ArticleDate`]: the loosely-typed timestamp carried by an article
//!
//! The same record is produced by the server's providers and consumed by the
//! client renderer, so the field names here are the wire names.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news article.
///
/// Articles are transient: they live for one render pass and are dropped
/// when the next query runs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Headline shown as the card heading.
    pub title: String,
    /// Publisher name, e.g. `"CoinDesk"`.
    pub source: String,
    /// Publication timestamp.
    pub date: ArticleDate,
    /// Link target for "Read more".
    pub url: String,
}

/// Publication timestamp as it appears on the wire.
///
/// Providers disagree on the representation, so both JSON strings and JSON
/// numbers are accepted. Numbers are milliseconds since the Unix epoch;
/// integers stay integers so they serialize back unchanged.
/// A value that cannot be parsed is kept as-is and rendered as
/// `Invalid Date` rather than rejecting the whole response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArticleDate {
    /// Whole milliseconds since the Unix epoch.
    Millis(i64),
    /// Milliseconds since the Unix epoch with a fractional part.
    FractionalMillis(f64),
    /// Textual timestamp, see [`ArticleDate::parse`] for accepted forms.
    Text(String),
}

impl ArticleDate {
    /// Resolve the timestamp to an instant, if it is parseable.
    ///
    /// Text is tried as RFC 3339, then RFC 2822, then as an ISO-like
    /// date-time without offset (`T` or space separated, seconds and
    /// fraction optional, trailing `Z` allowed), then as a bare date.
    /// Values without an offset are read as UTC.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            ArticleDate::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            ArticleDate::FractionalMillis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms.trunc() as i64)
            }
            ArticleDate::FractionalMillis(_) => None,
            ArticleDate::Text(s) => parse_text_date(s.trim()),
        }
    }
}

impl From<&str> for ArticleDate {
    fn from(s: &str) -> Self {
        ArticleDate::Text(s.to_string())
    }
}

impl From<String> for ArticleDate {
    fn from(s: String) -> Self {
        ArticleDate::Text(s)
    }
}

/// Offset-less forms, e.g. NewsData.io's `2024-05-01 10:00:00`.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_text_date(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_rfc2822(s)) {
        return Some(d.with_timezone(&Utc));
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|n| n.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|n| n.and_utc())
        })
}
