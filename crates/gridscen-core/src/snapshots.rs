//! The canonical scenario time axis.
//!
//! Every time-indexed quantity in a [`crate::NetworkModel`] (generator
//! availability, load demand) holds exactly one value per snapshot, in
//! snapshot order. The sequence is strictly increasing and duplicate-free
//! by construction.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An ordered, de-duplicated sequence of scenario timestamps with per-snapshot
/// weights.
///
/// Weights default to 1.0 and are carried through for solver collaborators
/// that weight snapshots by represented duration; the adequacy checks ignore
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshots {
    times: Vec<NaiveDateTime>,
    weights: Vec<f64>,
}

impl Snapshots {
    /// Build the canonical sequence from possibly unordered, possibly
    /// duplicated timestamps. On duplicate timestamps the first weight wins.
    ///
    /// Returns `None` if the input is empty.
    pub fn from_unordered(mut entries: Vec<(NaiveDateTime, f64)>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        // Stable sort keeps the first occurrence of a duplicate in front.
        entries.sort_by_key(|(t, _)| *t);
        entries.dedup_by_key(|(t, _)| *t);

        let (times, weights) = entries.into_iter().unzip();
        Some(Self { times, weights })
    }

    /// Number of snapshots (the fixed length N of every aligned series).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The ordered timestamps.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Per-snapshot weights, aligned with [`Self::times`].
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Position of a timestamp in the canonical sequence, if present.
    pub fn position(&self, t: NaiveDateTime) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDateTime> {
        self.times.iter()
    }
}
