//! The seam between a built model and the external dispatch optimizer.
//!
//! This workspace does not ship a solver. It defines the shape a solver
//! collaborator consumes (the read-only [`NetworkModel`]) and the shape it
//! returns: per-snapshot dispatch for each generator and storage unit, and a
//! per-snapshot marginal price per bus. Reporting layers consume the result;
//! this crate only validates its shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::{BusId, GeneratorId, NetworkModel, StorageUnitId};

/// Per-element time series returned by a dispatch solver.
///
/// Every series holds exactly one value per snapshot of the model it was
/// solved against, in snapshot order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Dispatched active power per generator (MW)
    pub generator_dispatch: BTreeMap<GeneratorId, Vec<f64>>,
    /// Dispatched power per storage unit (MW, negative while charging)
    pub storage_dispatch: BTreeMap<StorageUnitId, Vec<f64>>,
    /// State of charge per storage unit (MWh)
    pub storage_state_of_charge: BTreeMap<StorageUnitId, Vec<f64>>,
    /// Marginal price per bus ($/MWh)
    pub marginal_price: BTreeMap<BusId, Vec<f64>>,
}

impl DispatchResult {
    /// Check that every series is aligned with the model's snapshot sequence
    /// and refers to an element that exists in the model.
    pub fn validate_against(&self, model: &NetworkModel) -> ModelResult<()> {
        let n = model.snapshots.len();

        for (id, series) in &self.generator_dispatch {
            if model.generator(*id).is_none() {
                return Err(ModelError::Structure(format!(
                    "dispatch result refers to unknown generator {}",
                    id.value()
                )));
            }
            check_len("generator dispatch", id.value(), series, n)?;
        }
        for (id, series) in self
            .storage_dispatch
            .iter()
            .chain(self.storage_state_of_charge.iter())
        {
            if !model.storage_units.iter().any(|s| s.id == *id) {
                return Err(ModelError::Structure(format!(
                    "dispatch result refers to unknown storage unit {}",
                    id.value()
                )));
            }
            check_len("storage series", id.value(), series, n)?;
        }
        for (id, series) in &self.marginal_price {
            if model.bus(*id).is_none() {
                return Err(ModelError::Structure(format!(
                    "dispatch result refers to unknown bus {}",
                    id.value()
                )));
            }
            check_len("marginal price", id.value(), series, n)?;
        }
        Ok(())
    }
}

fn check_len(what: &str, id: i64, series: &[f64], n: usize) -> ModelResult<()> {
    if series.len() != n {
        return Err(ModelError::Structure(format!(
            "{} for element {} has {} values, expected {} snapshots",
            what,
            id,
            series.len(),
            n
        )));
    }
    Ok(())
}

/// Implemented by external dispatch/optimization backends.
pub trait DispatchSolver {
    fn solve(&self, model: &NetworkModel) -> ModelResult<DispatchResult>;
}
