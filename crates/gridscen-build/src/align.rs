//! Profile Aligner: maps raw time series onto the canonical snapshot sequence.
//!
//! Fill policy differs by series kind. Availability profiles fill missing
//! entries with 1.0 so that gaps in the data never artificially curtail a
//! generator below its nominal capacity. Demand series fill with 0.0: an
//! absent row means no demand was recorded, not a presumed constant demand.

use std::collections::{btree_map, BTreeMap, HashMap};

use chrono::NaiveDateTime;
use gridscen_core::{ModelError, ModelResult, Snapshots};
use tracing::debug;

use crate::records::{DemandRecord, ProfileRecord};
use crate::time::parse_day_first;

/// Named availability profiles indexed by their own timestamps, ready to be
/// reindexed onto a snapshot sequence.
#[derive(Debug, Default)]
pub struct ProfileSet {
    series: HashMap<String, BTreeMap<NaiveDateTime, f64>>,
}

impl ProfileSet {
    /// Index raw profile rows by name and timestamp.
    ///
    /// Rows with unparseable timestamps are skipped: they can never match a
    /// canonical snapshot, so their slots fall back to the 1.0 fill. `kind`
    /// only labels the debug log ("wind"/"solar").
    pub fn from_records(records: &[ProfileRecord], kind: &str) -> Self {
        let mut series: HashMap<String, BTreeMap<NaiveDateTime, f64>> = HashMap::new();
        for record in records {
            match parse_day_first(&record.snapshot_time) {
                Ok(time) => {
                    series
                        .entry(record.profile_name.clone())
                        .or_default()
                        .insert(time, record.profile);
                }
                Err(_) => {
                    debug!(
                        profile = %record.profile_name,
                        value = %record.snapshot_time,
                        "skipping {} profile row with unparseable timestamp",
                        kind
                    );
                }
            }
        }
        Self { series }
    }

    /// Whether a profile with this name has at least one sample.
    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Availability for the named profile at every snapshot, filling missing
    /// entries with 1.0.
    ///
    /// Returns `None` when the name is absent or no name was given; the
    /// caller then assigns constant full availability.
    pub fn availability_for(&self, name: Option<&str>, snapshots: &Snapshots) -> Option<Vec<f64>> {
        let series = self.series.get(name?)?;
        Some(align_series(series, snapshots, 1.0))
    }
}

/// Reindex a timestamp-keyed series onto the canonical sequence, filling
/// missing entries with `fill`.
pub fn align_series(
    series: &BTreeMap<NaiveDateTime, f64>,
    snapshots: &Snapshots,
    fill: f64,
) -> Vec<f64> {
    snapshots
        .times()
        .iter()
        .map(|t| series.get(t).copied().unwrap_or(fill))
        .collect()
}

/// Pivot the flat demand relation into one timestamp-keyed series per bus.
///
/// Duplicate (bus, snapshot) pairs are a structural error: the pivot would
/// silently pick one of two conflicting values. Unparseable timestamps are
/// fatal for the same reason as in the snapshot relation.
pub fn pivot_demand(
    records: &[DemandRecord],
) -> ModelResult<BTreeMap<i64, BTreeMap<NaiveDateTime, f64>>> {
    let mut pivot: BTreeMap<i64, BTreeMap<NaiveDateTime, f64>> = BTreeMap::new();
    for (row, record) in records.iter().enumerate() {
        let time = parse_day_first(&record.snapshot).map_err(|e| {
            ModelError::Timestamp(format!("demand_profile row {}: {}", row, e))
        })?;
        match pivot.entry(record.bus_id).or_default().entry(time) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record.demand_mw);
            }
            btree_map::Entry::Occupied(_) => {
                return Err(ModelError::Structure(format!(
                    "duplicate demand record for bus {} at {}",
                    record.bus_id, record.snapshot
                )));
            }
        }
    }
    Ok(pivot)
}

/// Align one bus's demand series onto the snapshots, zero-filling gaps.
pub fn align_demand(series: &BTreeMap<NaiveDateTime, f64>, snapshots: &Snapshots) -> Vec<f64> {
    align_series(series, snapshots, 0.0)
}
