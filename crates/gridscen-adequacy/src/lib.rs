//! # gridscen-adequacy: Capacity Adequacy Checker
//!
//! Two independent, read-only feasibility sweeps over a completed
//! [`NetworkModel`]: a system-wide capacity-vs-demand comparison per
//! snapshot, and a per-(snapshot, bus) nodal comparison.
//!
//! Both are conservative heuristics, not power-flow solutions. The nodal
//! check credits a line's full rated capacity to *both* of its endpoint
//! buses as an import-capability upper bound — it answers "could this node
//! plausibly be served given local generation plus full use of every
//! attached line", not "is there a flow assignment that serves it".
//!
//! The checks never fail: they always return a [`CheckReport`] tally, even
//! when every snapshot fails.

use std::collections::HashMap;

use gridscen_core::{BusId, NetworkModel};
use serde::Serialize;

/// Pass/fail tally for one adequacy sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Human-facing check label
    pub name: String,
    pub passed: usize,
    pub failed: usize,
}

impl CheckReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} passed, {} failed", self.name, self.passed, self.failed)
    }
}

/// Aggregate check: for each snapshot, total effective generation capacity
/// (nominal capacity scaled by availability) against total demand.
///
/// A snapshot passes iff capacity >= demand.
pub fn check_total_capacity(model: &NetworkModel) -> CheckReport {
    let mut passed = 0;
    let mut failed = 0;
    for t in 0..model.snapshots.len() {
        if model.total_effective_capacity(t) >= model.total_demand(t) {
            passed += 1;
        } else {
            failed += 1;
        }
    }
    CheckReport {
        name: "Total Capacity vs Total Demand".to_string(),
        passed,
        failed,
    }
}

/// Nodal check: for each (snapshot, bus) pair, local effective generation
/// plus the full rated capacity of every incident line against the bus's
/// demand (zero if the bus has no load).
pub fn check_nodal_capacity(model: &NetworkModel) -> CheckReport {
    // Transmission credit is time-invariant; accumulate it once.
    let mut line_credit: HashMap<BusId, f64> = HashMap::with_capacity(model.buses.len());
    for line in &model.lines {
        *line_credit.entry(line.from_bus).or_insert(0.0) += line.capacity.value();
        *line_credit.entry(line.to_bus).or_insert(0.0) += line.capacity.value();
    }

    let mut passed = 0;
    let mut failed = 0;
    for t in 0..model.snapshots.len() {
        for bus in &model.buses {
            let generation: f64 = model
                .generators
                .iter()
                .filter(|g| g.bus == bus.id)
                .map(|g| g.effective_capacity(t).value())
                .sum();
            let capacity = generation + line_credit.get(&bus.id).copied().unwrap_or(0.0);
            let demand = model
                .load_at_bus(bus.id)
                .and_then(|l| l.demand.get(t).copied())
                .unwrap_or(0.0);

            if capacity >= demand {
                passed += 1;
            } else {
                failed += 1;
            }
        }
    }
    CheckReport {
        name: "Nodal Capacity vs Demand".to_string(),
        passed,
        failed,
    }
}

/// Run both sweeps; the two are independent and could equally run in parallel.
pub fn run_all(model: &NetworkModel) -> Vec<CheckReport> {
    vec![check_total_capacity(model), check_nodal_capacity(model)]
}
