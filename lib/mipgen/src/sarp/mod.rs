use std::fmt;
use tracing::*;

use crate::data::sarp::*;

pub mod encode;
pub mod model;
pub mod solve;
pub mod tours;

pub use encode::Encoding;
pub use model::{build_model, ModelConfig, RouteMip};
pub use solve::{solve, Assignment, SolveStatus};
pub use tours::{extract_tours, Routes};


/// Why a solve call produced no route set.
#[derive(Debug, Clone)]
pub enum SolveError {
    /// The solver terminated without an optimal assignment; the status says
    /// whether the model was proven infeasible, unbounded, or the solver
    /// itself failed.
    NoRouting(SolveStatus),
    /// The solver reported an optimal assignment whose arc values do not
    /// form valid start-to-end chains. Indicates a solver/model mismatch,
    /// not infeasibility.
    BrokenTour(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::NoRouting(status) => write!(f, "no feasible routing (solver status: {})", status),
            SolveError::BrokenTour(msg) => write!(f, "assignment is not a valid route set: {}", msg),
        }
    }
}

impl std::error::Error for SolveError {}


/// Encode `data`, hand the model to the MIP solver and walk the optimal
/// assignment back into depot-to-depot routes.
#[instrument(level="info", skip(data, cfg), fields(id = %data.id))]
pub fn plan_routes(data: &SarpInstance, cfg: &ModelConfig) -> Result<Routes, SolveError> {
    let enc = Encoding::new(data);
    let mip = build_model(&enc, cfg);
    let assignment = solve(&mip)?;
    return extract_tours(&enc, &mip, &assignment);
}


#[cfg(test)]
pub(crate) mod testing {
    use crate::data::sarp::*;
    use instances::raw::{FromRaw, sarp::Hust};
    use std::borrow::Cow;

    pub fn instance(n: usize, m: usize, weight: Vec<f64>, capacity: Vec<f64>, distance: Vec<Vec<f64>>) -> SarpInstance {
        let raw = Hust {
            num_passengers: n,
            num_commodities: m,
            num_vehicles: capacity.len(),
            weight,
            capacity,
            distance,
        };
        return SarpInstance::from_raw(raw, Cow::Borrowed("test")).unwrap();
    }

    /// Unit distance between every pair of distinct locations.
    pub fn uniform_matrix(nlocs: usize) -> Vec<Vec<f64>> {
        (0..nlocs)
            .map(|a| (0..nlocs).map(|b| if a == b { 0.0 } else { 1.0 }).collect())
            .collect()
    }
}
