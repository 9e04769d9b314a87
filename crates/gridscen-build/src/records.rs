//! Normalized input record schemas.
//!
//! One struct per source relation, with field names matching the tabular
//! store's column names so rows deserialize directly (e.g. from the JSON a
//! UI layer ships across). Timestamps arrive as strings and are parsed with
//! the day-first convention during build, never at deserialization time.

use serde::{Deserialize, Serialize};

/// Row of the `buses` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusRecord {
    pub id: i64,
    pub name: String,
    pub voltage_kv: f64,
    pub longitude: f64,
    pub latitude: f64,
}

/// Row of the `power_plants` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerPlantRecord {
    pub id: i64,
    pub name: String,
    pub capacity_mw: f64,
    pub bus_id: i64,
    /// Fuel/type tag; "Wind" and "Solar" carry availability profiles
    #[serde(rename = "type")]
    pub kind: String,
    /// Short-run marginal cost ($/MWh)
    pub srmc: f64,
    /// Name of the availability profile, for variable types
    #[serde(default)]
    pub profile: Option<String>,
}

/// Row of the `lines` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: i64,
    pub name: String,
    pub from_bus: i64,
    pub to_bus: i64,
    pub length_km: f64,
    /// Thermal capacity; absent or non-finite values are replaced by the
    /// finite sentinel during build
    #[serde(default)]
    pub max_capacity_mw: Option<f64>,
    pub r: f64,
    pub x: f64,
}

/// Row of the `storage_units` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageUnitRecord {
    pub id: i64,
    pub name: String,
    pub capacity_mw: f64,
    pub max_energy_mwh: f64,
    pub bus_id: i64,
    /// Round-trip efficiency, applied to both store and dispatch
    pub efficiency: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Row of the `demand_profile` relation: one (bus, snapshot) demand sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRecord {
    pub bus_id: i64,
    pub demand_mw: f64,
    /// Day-first timestamp string
    pub snapshot: String,
}

/// Row of the `snapshots` relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Day-first timestamp string
    pub snapshot_time: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Row of the `wind_profile` / `solar_profile` relations: one availability
/// sample for a named profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub profile_name: String,
    /// Day-first timestamp string
    pub snapshot_time: String,
    /// Availability multiplier, expected in [0, 1]
    pub profile: f64,
}

/// All source relations for one scenario, as loaded from the tabular store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioTables {
    #[serde(default)]
    pub buses: Vec<BusRecord>,
    #[serde(default)]
    pub power_plants: Vec<PowerPlantRecord>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub storage_units: Vec<StorageUnitRecord>,
    #[serde(default)]
    pub demand: Vec<DemandRecord>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotRecord>,
    #[serde(default)]
    pub wind_profiles: Vec<ProfileRecord>,
    #[serde(default)]
    pub solar_profiles: Vec<ProfileRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_plant_type_column_maps_to_kind() {
        let row: PowerPlantRecord = serde_json::from_str(
            r#"{"id": 1, "name": "PV", "capacity_mw": 100.0, "bus_id": 1,
                "type": "Solar", "srmc": 0.0, "profile": "Solar A"}"#,
        )
        .unwrap();
        assert_eq!(row.kind, "Solar");
        assert_eq!(row.profile.as_deref(), Some("Solar A"));
    }

    #[test]
    fn test_line_capacity_may_be_absent() {
        let row: LineRecord = serde_json::from_str(
            r#"{"id": 1, "name": "L1", "from_bus": 1, "to_bus": 2,
                "length_km": 10.0, "r": 0.01, "x": 0.1}"#,
        )
        .unwrap();
        assert!(row.max_capacity_mw.is_none());
    }

    #[test]
    fn test_snapshot_weight_defaults() {
        let row: SnapshotRecord =
            serde_json::from_str(r#"{"snapshot_time": "01/01/2025 00:00"}"#).unwrap();
        assert_eq!(row.weight, 1.0);
    }
}
