//! # gridscen-build: Network Model Builder
//!
//! Assembles a [`gridscen_core::NetworkModel`] from normalized tabular
//! records: resolves the canonical snapshot sequence, aligns availability and
//! demand series onto it, and wires buses, generators, storage units, lines,
//! and loads together with referential validation.
//!
//! The pipeline is a single deterministic pass:
//!
//! ```text
//! raw records -> Time Index Resolver -> Profile Aligner -> Topology Assembler
//!             -> NetworkModel + BuildDiagnostics
//! ```
//!
//! Structural problems (unparseable canonical timestamps, a malformed demand
//! pivot) abort the build with a [`gridscen_core::ModelError`]. Everything
//! recoverable — rows referencing missing buses, non-finite values — is
//! corrected or dropped and reported through
//! [`gridscen_core::BuildDiagnostics`].
//!
//! ```
//! use gridscen_build::{build_model, ScenarioTables};
//!
//! let tables = ScenarioTables::default();
//! // An empty snapshot relation is a structural error.
//! assert!(build_model(&tables).is_err());
//! ```

pub mod align;
pub mod assembler;
pub mod records;
pub mod time;

pub use assembler::{build_model, BuildOutput};
pub use records::{
    BusRecord, DemandRecord, LineRecord, PowerPlantRecord, ProfileRecord, ScenarioTables,
    SnapshotRecord, StorageUnitRecord,
};
pub use time::{parse_day_first, resolve_snapshots};
