//! Normalizers: raw wire records to typed, sorted records.
//!
//! All functions here are pure and total. They accept either raw or
//! already-normalized records (`impl Into<...>`), so normalizing twice is
//! the same as normalizing once.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::pipeline::Pipeline;
use crate::position::Position;
use crate::trade::Trade;

/// Naive formats the data API emits when it drops the offset. Read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`2023-01-01T10:00:00Z`, `...+02:00`) and offset-less
/// forms, which are taken as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Normalize trades and sort them most recent first.
///
/// Trades without an open time sort last.
pub fn organize_trades<I, T>(items: I) -> Vec<Trade>
where
    I: IntoIterator<Item = T>,
    T: Into<Trade>,
{
    let mut trades: Vec<Trade> = items.into_iter().map(Into::into).collect();
    trades.sort_by(|a, b| b.open_time.cmp(&a.open_time));
    trades
}

/// Normalize positions and sort them most recent first.
pub fn organize_positions<I, T>(items: I) -> Vec<Position>
where
    I: IntoIterator<Item = T>,
    T: Into<Position>,
{
    let mut positions: Vec<Position> = items.into_iter().map(Into::into).collect();
    positions.sort_by(|a, b| b.open_time.cmp(&a.open_time));
    positions
}

/// Normalize a single pipeline.
pub fn organize_pipeline(item: impl Into<Pipeline>) -> Pipeline {
    item.into()
}
