//! # gridscen-core: Scenario Network Model Core
//!
//! Fundamental data structures for time-resolved electrical network
//! scenarios: buses, generators, storage units, lines, and per-bus loads,
//! all aligned onto a canonical snapshot sequence.
//!
//! ## Design Philosophy
//!
//! A [`NetworkModel`] is a plain value: it is assembled in one pass by
//! `gridscen-build` from normalized tabular records and is read-only
//! afterwards. Elements reference buses by typed id ([`BusId`]), never by
//! back-pointer, which keeps the model an acyclic value graph that is safe
//! to share across threads. Any edit to the underlying records requires a
//! full rebuild before the next check or optimization run.
//!
//! Every time-indexed quantity (generator availability, load demand) holds
//! exactly one value per snapshot, so consumers can zip series by position
//! without re-aligning timestamps.
//!
//! ## Modules
//!
//! - [`diagnostics`] - Structured build diagnostics (dropped rows, clamped values)
//! - [`dispatch`] - The contract for external dispatch solvers
//! - [`snapshots`] - The canonical time axis
//! - [`units`] - Unit newtypes (MW, MWh, kV)

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod snapshots;
pub mod units;

pub use diagnostics::{BuildDiagnostics, BuildIssue, BuildStats, RecordKind, Severity};
pub use dispatch::{DispatchResult, DispatchSolver};
pub use error::{ModelError, ModelResult};
pub use snapshots::Snapshots;
pub use units::{Kilovolts, MegawattHours, Megawatts};

/// Sentinel substituted for non-finite capacity and cost values so that
/// downstream numeric consumers (including external solvers) stay
/// well-defined. Applied with the sign of the replaced value.
pub const CAPACITY_SENTINEL: f64 = 1e6;

// Newtype wrappers for IDs for type safety. IDs are the stable identifiers
// from the source relations, unique within their kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(i64);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratorId(i64);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageUnitId(i64);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(i64);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(i64);

macro_rules! impl_id {
    ($type:ty) => {
        impl $type {
            #[inline]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }
            #[inline]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }
    };
}

impl_id!(BusId);
impl_id!(GeneratorId);
impl_id!(StorageUnitId);
impl_id!(LineId);
impl_id!(LoadId);

/// A network node. Leaf entity; generators, storage units, lines, and loads
/// reference it by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bus {
    pub id: BusId,
    pub name: String,
    /// Nominal voltage
    pub voltage_kv: Kilovolts,
    pub longitude: f64,
    pub latitude: f64,
}

/// A generating unit with per-snapshot availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    pub id: GeneratorId,
    pub name: String,
    pub bus: BusId,
    /// Nominal capacity (MW), finite after build
    pub capacity: Megawatts,
    /// Short-run marginal cost ($/MWh)
    pub marginal_cost: f64,
    /// Fuel/type tag from the source records ("Solar", "Wind", "Coal", ...)
    pub fuel: String,
    /// Name of the availability profile this generator was matched against
    pub profile_name: Option<String>,
    /// Availability multiplier per snapshot, in [0, 1]; constant 1.0 when no
    /// profile applies
    pub availability: Vec<f64>,
}

impl Generator {
    /// Effective capacity at snapshot position `t`:
    /// nominal capacity scaled by availability.
    pub fn effective_capacity(&self, t: usize) -> Megawatts {
        let avail = self.availability.get(t).copied().unwrap_or(1.0);
        self.capacity * avail
    }
}

/// A storage unit with its round-trip efficiency split into store and
/// dispatch components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageUnit {
    pub id: StorageUnitId,
    pub name: String,
    pub bus: BusId,
    /// Power capacity (MW)
    pub power: Megawatts,
    /// Energy capacity (MWh)
    pub energy: MegawattHours,
    /// Charging efficiency, (0, 1]
    pub efficiency_store: f64,
    /// Discharging efficiency, (0, 1]
    pub efficiency_dispatch: f64,
}

/// A transmission line between two distinct buses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub from_bus: BusId,
    pub to_bus: BusId,
    pub length_km: f64,
    /// Thermal capacity (MW), always finite after build
    pub capacity: Megawatts,
    pub resistance: f64,
    pub reactance: f64,
}

impl Line {
    /// Whether this line is incident to the given bus (either endpoint).
    pub fn touches(&self, bus: BusId) -> bool {
        self.from_bus == bus || self.to_bus == bus
    }
}

/// Per-bus demand, synthesized from the flat demand relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Load {
    pub id: LoadId,
    pub name: String,
    pub bus: BusId,
    /// Demand (MW) per snapshot; missing source records are zero
    pub demand: Vec<f64>,
}

/// The in-memory aggregate produced by the Topology Assembler.
///
/// Read-only once built: the adequacy checker and the solver collaborator
/// take `&NetworkModel` and never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkModel {
    pub snapshots: Snapshots,
    pub buses: Vec<Bus>,
    pub generators: Vec<Generator>,
    pub storage_units: Vec<StorageUnit>,
    pub lines: Vec<Line>,
    pub loads: Vec<Load>,
}

impl NetworkModel {
    /// Look up a bus by id.
    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.buses.iter().find(|b| b.id == id)
    }

    /// Look up a generator by id.
    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }

    /// Generators attached to a specific bus.
    pub fn generators_at_bus(&self, bus: BusId) -> Vec<&Generator> {
        self.generators.iter().filter(|g| g.bus == bus).collect()
    }

    /// The load attached to a bus, if any demand was recorded for it.
    pub fn load_at_bus(&self, bus: BusId) -> Option<&Load> {
        self.loads.iter().find(|l| l.bus == bus)
    }

    /// Total effective generation capacity at snapshot position `t` (MW).
    pub fn total_effective_capacity(&self, t: usize) -> Megawatts {
        self.generators.iter().map(|g| g.effective_capacity(t)).sum()
    }

    /// Total demand at snapshot position `t` (MW).
    pub fn total_demand(&self, t: usize) -> Megawatts {
        Megawatts(
            self.loads
                .iter()
                .map(|l| l.demand.get(t).copied().unwrap_or(0.0))
                .sum(),
        )
    }

    /// Compute basic statistics about the model.
    pub fn stats(&self) -> ModelStats {
        let total_capacity_mw: Megawatts = self.generators.iter().map(|g| g.capacity).sum();
        let peak_demand_mw = (0..self.snapshots.len())
            .map(|t| self.total_demand(t).value())
            .fold(0.0_f64, f64::max);

        ModelStats {
            num_buses: self.buses.len(),
            num_generators: self.generators.len(),
            num_storage_units: self.storage_units.len(),
            num_lines: self.lines.len(),
            num_loads: self.loads.len(),
            num_snapshots: self.snapshots.len(),
            total_capacity_mw: total_capacity_mw.value(),
            peak_demand_mw,
        }
    }
}

/// Statistics about a model's size and capacity
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelStats {
    pub num_buses: usize,
    pub num_generators: usize,
    pub num_storage_units: usize,
    pub num_lines: usize,
    pub num_loads: usize,
    pub num_snapshots: usize,
    pub total_capacity_mw: f64,
    pub peak_demand_mw: f64,
}

impl std::fmt::Display for ModelStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} buses, {} lines, {} gens ({:.0} MW), {} storage, {} loads (peak {:.0} MW), {} snapshots",
            self.num_buses,
            self.num_lines,
            self.num_generators,
            self.total_capacity_mw,
            self.num_storage_units,
            self.num_loads,
            self.peak_demand_mw,
            self.num_snapshots
        )
    }
}
