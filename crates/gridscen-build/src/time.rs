//! Time Index Resolver: canonical snapshot sequence from raw timestamp rows.
//!
//! Timestamps are parsed with an explicit day-first convention, matching the
//! source data's `DD/MM/YYYY` layout. ISO `YYYY-MM-DD` is accepted as a
//! fallback since it is unambiguous. Parse failures are fatal: a broken
//! canonical sequence would silently misalign every series built on top of it.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use gridscen_core::{ModelError, ModelResult, Snapshots};

use crate::records::SnapshotRecord;

/// Day-first formats tried in order, most specific first.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Date-only fallbacks; midnight is assumed.
const DATE_ONLY_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parse a timestamp string with the day-first convention.
pub fn parse_day_first(value: &str) -> ModelResult<NaiveDateTime> {
    let trimmed = value.trim();
    for format in DAY_FIRST_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    for format in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            // Date-only rows land on midnight.
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(ModelError::Timestamp(format!(
        "could not parse '{}' with the day-first convention",
        value
    )))
}

/// Resolve the canonical snapshot sequence: parse every row, sort ascending,
/// drop duplicate timestamps (first weight wins).
///
/// An unparseable row or an empty relation aborts the build.
pub fn resolve_snapshots(records: &[SnapshotRecord]) -> ModelResult<Snapshots> {
    let mut entries = Vec::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        let time = parse_day_first(&record.snapshot_time).map_err(|e| {
            ModelError::Timestamp(format!("snapshots row {}: {}", row, e))
        })?;
        entries.push((time, record.weight));
    }

    Snapshots::from_unordered(entries)
        .ok_or_else(|| ModelError::Structure("snapshots relation is empty".into()))
}
