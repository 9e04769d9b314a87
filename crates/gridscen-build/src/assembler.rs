//! Topology Assembler: one deterministic pass from raw records to a model.
//!
//! Resolution policy per entity:
//! - a record whose bus reference does not resolve is dropped with a warning,
//!   never fatal (a single bad row must not abort the whole build);
//! - non-finite generator capacity/cost and line capacity are replaced with
//!   the finite sentinel before being stored;
//! - demand is pivoted per bus and attached as one Load per bus with records.
//!
//! For a fixed set of input records and snapshot sequence the output is
//! bit-identical: iteration follows input order for record relations and
//! ascending bus id for the demand pivot.

use std::collections::HashMap;

use gridscen_core::{
    BuildDiagnostics, BuildIssue, Bus, BusId, Generator, GeneratorId, Kilovolts, Line, LineId,
    Load, LoadId, Megawatts, MegawattHours, ModelResult, NetworkModel, RecordKind, StorageUnit,
    StorageUnitId, CAPACITY_SENTINEL,
};
use tracing::{debug, warn};

use crate::align::{align_demand, pivot_demand, ProfileSet};
use crate::records::ScenarioTables;
use crate::time::resolve_snapshots;

/// A completed build: the immutable model plus everything that was dropped
/// or corrected on the way.
#[derive(Debug)]
pub struct BuildOutput {
    pub model: NetworkModel,
    pub diagnostics: BuildDiagnostics,
}

/// Replace a non-finite value with the sentinel, keeping its sign.
fn finite_or_sentinel(value: f64) -> (f64, bool) {
    if value.is_finite() {
        (value, false)
    } else if value == f64::NEG_INFINITY {
        (-CAPACITY_SENTINEL, true)
    } else {
        // +inf and NaN both clamp to the positive sentinel.
        (CAPACITY_SENTINEL, true)
    }
}

/// Which profile table a fuel/type tag draws from, if any.
fn variable_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "Solar" => Some("solar"),
        "Wind" => Some("wind"),
        _ => None,
    }
}

/// Assemble a complete [`NetworkModel`] from the scenario's raw relations.
///
/// Fails only on structural errors: an unparseable timestamp in the snapshot
/// or demand relations, a duplicate (bus, snapshot) demand pair, or an empty
/// snapshot relation. Everything else degrades into diagnostics.
pub fn build_model(tables: &ScenarioTables) -> ModelResult<BuildOutput> {
    let mut diag = BuildDiagnostics::new();

    let snapshots = resolve_snapshots(&tables.snapshots)?;
    let solar = ProfileSet::from_records(&tables.solar_profiles, "solar");
    let wind = ProfileSet::from_records(&tables.wind_profiles, "wind");
    // Pivot up front so a malformed demand relation fails before any
    // elements are assembled.
    let demand_pivot = pivot_demand(&tables.demand)?;

    // =========================================================================
    // 1. Buses
    // =========================================================================
    // Index built once per assembly pass; elements keep BusId references,
    // never pointers into this map.
    let mut bus_ids: HashMap<i64, BusId> = HashMap::with_capacity(tables.buses.len());
    let mut buses = Vec::with_capacity(tables.buses.len());
    for record in &tables.buses {
        let id = BusId::new(record.id);
        bus_ids.insert(record.id, id);
        buses.push(Bus {
            id,
            name: record.name.clone(),
            voltage_kv: Kilovolts(record.voltage_kv),
            longitude: record.longitude,
            latitude: record.latitude,
        });
        diag.stats.buses += 1;
    }

    // =========================================================================
    // 2. Generators
    // =========================================================================
    let mut generators = Vec::with_capacity(tables.power_plants.len());
    for record in &tables.power_plants {
        let Some(&bus) = bus_ids.get(&record.bus_id) else {
            warn!(
                generator = %record.name,
                bus_id = record.bus_id,
                "dropping generator with unresolved bus reference"
            );
            diag.push(BuildIssue::DroppedRecord {
                kind: RecordKind::Generator,
                id: record.id,
                reason: format!("references unknown bus {}", record.bus_id),
            });
            continue;
        };

        let (capacity, clamped) = finite_or_sentinel(record.capacity_mw);
        if clamped {
            debug!(generator = %record.name, "clamped non-finite capacity_mw to sentinel");
            diag.push(BuildIssue::ClampedValue {
                kind: RecordKind::Generator,
                id: record.id,
                field: "capacity_mw".into(),
            });
        }
        let (marginal_cost, clamped) = finite_or_sentinel(record.srmc);
        if clamped {
            debug!(generator = %record.name, "clamped non-finite srmc to sentinel");
            diag.push(BuildIssue::ClampedValue {
                kind: RecordKind::Generator,
                id: record.id,
                field: "srmc".into(),
            });
        }

        let availability = match variable_kind(&record.kind) {
            Some(table) => {
                let profiles = if table == "solar" { &solar } else { &wind };
                match profiles.availability_for(record.profile.as_deref(), &snapshots) {
                    Some(series) => series,
                    None => {
                        debug!(
                            generator = %record.name,
                            profile = ?record.profile,
                            "no matching {} profile; defaulting availability to 1.0",
                            table
                        );
                        diag.push(BuildIssue::DefaultedProfile {
                            id: record.id,
                            profile: record.profile.clone(),
                        });
                        vec![1.0; snapshots.len()]
                    }
                }
            }
            // Dispatchable types carry no profile; constant full availability.
            None => vec![1.0; snapshots.len()],
        };

        generators.push(Generator {
            id: GeneratorId::new(record.id),
            name: record.name.clone(),
            bus,
            capacity: Megawatts(capacity),
            marginal_cost,
            fuel: record.kind.clone(),
            profile_name: record.profile.clone(),
            availability,
        });
        diag.stats.generators += 1;
    }

    // =========================================================================
    // 3. Storage units
    // =========================================================================
    let mut storage_units = Vec::with_capacity(tables.storage_units.len());
    for record in &tables.storage_units {
        let Some(&bus) = bus_ids.get(&record.bus_id) else {
            warn!(
                storage = %record.name,
                bus_id = record.bus_id,
                "dropping storage unit with unresolved bus reference"
            );
            diag.push(BuildIssue::DroppedRecord {
                kind: RecordKind::StorageUnit,
                id: record.id,
                reason: format!("references unknown bus {}", record.bus_id),
            });
            continue;
        };

        storage_units.push(StorageUnit {
            id: StorageUnitId::new(record.id),
            name: record.name.clone(),
            bus,
            power: Megawatts(record.capacity_mw),
            energy: MegawattHours(record.max_energy_mwh),
            // The source carries a single round-trip column applied to both
            // conversion directions.
            efficiency_store: record.efficiency,
            efficiency_dispatch: record.efficiency,
        });
        diag.stats.storage_units += 1;
    }

    // =========================================================================
    // 4. Lines
    // =========================================================================
    let mut lines = Vec::with_capacity(tables.lines.len());
    for record in &tables.lines {
        let from = bus_ids.get(&record.from_bus).copied();
        let to = bus_ids.get(&record.to_bus).copied();
        let (Some(from_bus), Some(to_bus)) = (from, to) else {
            warn!(
                line = %record.name,
                from_bus = record.from_bus,
                to_bus = record.to_bus,
                "dropping line with unresolved endpoint"
            );
            diag.push(BuildIssue::DroppedRecord {
                kind: RecordKind::Line,
                id: record.id,
                reason: format!(
                    "endpoint not found (from_bus: {}, to_bus: {})",
                    record.from_bus, record.to_bus
                ),
            });
            continue;
        };
        if from_bus == to_bus {
            warn!(line = %record.name, "dropping line connecting a bus to itself");
            diag.push(BuildIssue::DroppedRecord {
                kind: RecordKind::Line,
                id: record.id,
                reason: format!("both endpoints are bus {}", record.from_bus),
            });
            continue;
        }

        let capacity = match record.max_capacity_mw {
            Some(value) => {
                let (capacity, clamped) = finite_or_sentinel(value);
                if clamped {
                    debug!(line = %record.name, "clamped non-finite max_capacity_mw to sentinel");
                    diag.push(BuildIssue::ClampedValue {
                        kind: RecordKind::Line,
                        id: record.id,
                        field: "max_capacity_mw".into(),
                    });
                }
                capacity
            }
            None => {
                debug!(line = %record.name, "missing max_capacity_mw; using sentinel");
                diag.push(BuildIssue::ClampedValue {
                    kind: RecordKind::Line,
                    id: record.id,
                    field: "max_capacity_mw".into(),
                });
                CAPACITY_SENTINEL
            }
        };

        lines.push(Line {
            id: LineId::new(record.id),
            name: record.name.clone(),
            from_bus,
            to_bus,
            length_km: record.length_km,
            capacity: Megawatts(capacity),
            resistance: record.r,
            reactance: record.x,
        });
        diag.stats.lines += 1;
    }

    // =========================================================================
    // 5. Loads from the demand pivot
    // =========================================================================
    // The pivot is keyed by ascending bus id, so load order is content-
    // determined regardless of demand row order.
    let mut loads = Vec::with_capacity(demand_pivot.len());
    for (raw_bus_id, series) in &demand_pivot {
        let Some(&bus) = bus_ids.get(raw_bus_id) else {
            warn!(
                bus_id = raw_bus_id,
                "dropping demand series for unknown bus"
            );
            diag.push(BuildIssue::DroppedRecord {
                kind: RecordKind::Demand,
                id: *raw_bus_id,
                reason: format!("references unknown bus {}", raw_bus_id),
            });
            continue;
        };

        loads.push(Load {
            id: LoadId::new(*raw_bus_id),
            name: format!("Load_{}", raw_bus_id),
            bus,
            demand: align_demand(series, &snapshots),
        });
        diag.stats.loads += 1;
    }

    let model = NetworkModel {
        snapshots,
        buses,
        generators,
        storage_units,
        lines,
        loads,
    };

    debug!(summary = %diag.summary(), "model build complete");
    Ok(BuildOutput { model, diagnostics: diag })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{
        BusRecord, DemandRecord, LineRecord, PowerPlantRecord, ProfileRecord, SnapshotRecord,
        StorageUnitRecord,
    };
    use gridscen_core::ModelError;

    fn bus(id: i64, name: &str) -> BusRecord {
        BusRecord {
            id,
            name: name.to_string(),
            voltage_kv: 220.0,
            longitude: id as f64,
            latitude: -(id as f64),
        }
    }

    fn plant(id: i64, bus_id: i64, kind: &str, profile: Option<&str>) -> PowerPlantRecord {
        PowerPlantRecord {
            id,
            name: format!("Plant {}", id),
            capacity_mw: 100.0,
            bus_id,
            kind: kind.to_string(),
            srmc: 10.0,
            profile: profile.map(str::to_string),
        }
    }

    fn line(id: i64, from_bus: i64, to_bus: i64, capacity: Option<f64>) -> LineRecord {
        LineRecord {
            id,
            name: format!("Line {}", id),
            from_bus,
            to_bus,
            length_km: 50.0,
            max_capacity_mw: capacity,
            r: 0.01,
            x: 0.1,
        }
    }

    fn snapshot(time: &str) -> SnapshotRecord {
        SnapshotRecord {
            snapshot_time: time.to_string(),
            weight: 1.0,
        }
    }

    fn demand(bus_id: i64, time: &str, mw: f64) -> DemandRecord {
        DemandRecord {
            bus_id,
            demand_mw: mw,
            snapshot: time.to_string(),
        }
    }

    fn solar_row(name: &str, time: &str, value: f64) -> ProfileRecord {
        ProfileRecord {
            profile_name: name.to_string(),
            snapshot_time: time.to_string(),
            profile: value,
        }
    }

    fn three_snapshot_tables() -> ScenarioTables {
        ScenarioTables {
            buses: vec![bus(1, "North"), bus(2, "South"), bus(3, "East")],
            power_plants: vec![plant(1, 1, "Solar", Some("Solar A"))],
            snapshots: vec![
                snapshot("01/01/2025 00:00"),
                snapshot("01/01/2025 01:00"),
                snapshot("01/01/2025 02:00"),
            ],
            solar_profiles: vec![
                solar_row("Solar A", "01/01/2025 00:00", 0.9),
                solar_row("Solar A", "01/01/2025 01:00", 0.95),
                solar_row("Solar A", "01/01/2025 02:00", 1.0),
            ],
            demand: vec![
                demand(1, "01/01/2025 00:00", 50.0),
                demand(1, "01/01/2025 01:00", 60.0),
                demand(1, "01/01/2025 02:00", 65.0),
            ],
            ..ScenarioTables::default()
        }
    }

    #[test]
    fn test_end_to_end_build() {
        let output = build_model(&three_snapshot_tables()).unwrap();
        let model = &output.model;

        assert_eq!(model.buses.len(), 3);
        assert_eq!(model.snapshots.len(), 3);
        assert_eq!(model.generators.len(), 1);
        assert_eq!(model.generators[0].availability, vec![0.9, 0.95, 1.0]);
        assert_eq!(model.loads.len(), 1);
        assert_eq!(model.loads[0].demand, vec![50.0, 60.0, 65.0]);
        assert_eq!(model.loads[0].name, "Load_1");
        assert!(output.diagnostics.is_clean());
    }

    #[test]
    fn test_orphan_records_dropped_with_one_warning_each() {
        let mut tables = three_snapshot_tables();
        tables.power_plants.push(plant(2, 99, "Coal", None));
        tables.storage_units.push(StorageUnitRecord {
            id: 1,
            name: "Battery".into(),
            capacity_mw: 20.0,
            max_energy_mwh: 80.0,
            bus_id: 98,
            efficiency: 0.9,
            kind: "Battery".into(),
        });
        tables.lines.push(line(1, 1, 97, Some(100.0)));

        let output = build_model(&tables).unwrap();
        assert_eq!(output.model.generators.len(), 1);
        assert!(output.model.storage_units.is_empty());
        assert!(output.model.lines.is_empty());
        assert_eq!(output.diagnostics.dropped_count(), 3);

        let kinds: Vec<_> = output
            .diagnostics
            .warnings()
            .map(|issue| match issue {
                BuildIssue::DroppedRecord { kind, .. } => *kind,
                other => panic!("unexpected issue {:?}", other),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![RecordKind::Generator, RecordKind::StorageUnit, RecordKind::Line]
        );
    }

    #[test]
    fn test_orphan_demand_dropped() {
        let mut tables = three_snapshot_tables();
        tables.demand.push(demand(42, "01/01/2025 00:00", 10.0));

        let output = build_model(&tables).unwrap();
        assert_eq!(output.model.loads.len(), 1);
        assert_eq!(output.diagnostics.dropped_count(), 1);
    }

    #[test]
    fn test_nonfinite_values_clamped_to_sentinel() {
        let mut tables = three_snapshot_tables();
        tables.power_plants.push(PowerPlantRecord {
            capacity_mw: f64::INFINITY,
            srmc: f64::NAN,
            ..plant(2, 2, "Coal", None)
        });
        tables.lines.push(line(1, 1, 2, Some(f64::INFINITY)));
        tables.lines.push(line(2, 2, 3, None));

        let output = build_model(&tables).unwrap();
        let gen = output.model.generator(GeneratorId::new(2)).unwrap();
        assert_eq!(gen.capacity, Megawatts(CAPACITY_SENTINEL));
        assert_eq!(gen.marginal_cost, CAPACITY_SENTINEL);
        assert_eq!(output.model.lines[0].capacity, Megawatts(CAPACITY_SENTINEL));
        assert_eq!(output.model.lines[1].capacity, Megawatts(CAPACITY_SENTINEL));
        assert_eq!(output.diagnostics.clamped_count(), 4);
    }

    #[test]
    fn test_negative_infinity_keeps_sign() {
        let (value, clamped) = finite_or_sentinel(f64::NEG_INFINITY);
        assert_eq!(value, -CAPACITY_SENTINEL);
        assert!(clamped);
        assert_eq!(finite_or_sentinel(42.0), (42.0, false));
    }

    #[test]
    fn test_self_loop_line_dropped() {
        let mut tables = three_snapshot_tables();
        tables.lines.push(line(1, 2, 2, Some(100.0)));

        let output = build_model(&tables).unwrap();
        assert!(output.model.lines.is_empty());
        assert_eq!(output.diagnostics.dropped_count(), 1);
    }

    #[test]
    fn test_unmatched_profile_defaults_to_full_availability() {
        let mut tables = three_snapshot_tables();
        tables.power_plants = vec![plant(1, 1, "Wind", Some("Wind Z"))];

        let output = build_model(&tables).unwrap();
        assert_eq!(output.model.generators[0].availability, vec![1.0; 3]);
        assert_eq!(output.diagnostics.stats.defaulted_profiles, 1);
    }

    #[test]
    fn test_dispatchable_type_gets_constant_availability_silently() {
        let mut tables = three_snapshot_tables();
        tables.power_plants = vec![plant(1, 1, "Coal", None)];

        let output = build_model(&tables).unwrap();
        assert_eq!(output.model.generators[0].availability, vec![1.0; 3]);
        assert_eq!(output.diagnostics.stats.defaulted_profiles, 0);
    }

    #[test]
    fn test_duplicate_demand_aborts_build() {
        let mut tables = three_snapshot_tables();
        tables.demand.push(demand(1, "01/01/2025 00:00", 99.0));

        assert!(matches!(
            build_model(&tables),
            Err(ModelError::Structure(_))
        ));
    }

    #[test]
    fn test_unparseable_snapshot_aborts_build() {
        let mut tables = three_snapshot_tables();
        tables.snapshots.push(snapshot("01/13/2025 00:00"));

        assert!(matches!(
            build_model(&tables),
            Err(ModelError::Timestamp(_))
        ));
    }

    #[test]
    fn test_build_is_deterministic() {
        let tables = {
            let mut t = three_snapshot_tables();
            // Demand rows deliberately out of order; the pivot sorts by content.
            t.demand.reverse();
            t.demand.push(demand(2, "01/01/2025 01:00", 5.0));
            t
        };

        let a = build_model(&tables).unwrap();
        let b = build_model(&tables).unwrap();
        assert_eq!(
            serde_json::to_string(&a.model).unwrap(),
            serde_json::to_string(&b.model).unwrap()
        );
        // Loads come out keyed by ascending bus id.
        let load_buses: Vec<i64> = a.model.loads.iter().map(|l| l.bus.value()).collect();
        assert_eq!(load_buses, vec![1, 2]);
    }
}
