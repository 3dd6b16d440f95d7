use tracing::*;

use crate::data::sarp::Loc;
use super::{Encoding, SolveError};
use super::model::RouteMip;
use super::solve::Assignment;

/// One depot-to-depot stop sequence per vehicle, plus the minimized
/// makespan.
#[derive(Debug, Clone, PartialEq)]
pub struct Routes {
    pub objective: f64,
    pub routes: Vec<Vec<Loc>>,
}

/// Walk the solved arc matrix from every vehicle's start node to an end
/// node, recording physical locations. The degree constraints make the walk
/// well-defined; a malformed assignment (no outgoing arc, or a walk longer
/// than the node count) is reported as `BrokenTour` instead of looping.
#[instrument(level="debug", skip(enc, mip, assignment))]
pub fn extract_tours(enc: &Encoding, mip: &RouteMip, assignment: &Assignment) -> Result<Routes, SolveError> {
    let table = &mip.table;
    let mut routes = Vec::with_capacity(enc.k);

    for vehicle in 0..enc.k {
        let start = enc.start_of(vehicle);
        let mut tour = vec![enc.loc(start)];
        let mut at = start;
        let mut hops = 0;

        loop {
            let next = (0..enc.size)
                .filter(|&j| j != at)
                .find(|&j| assignment.values[table.arc(at, j)] > 0.5);
            let next = match next {
                Some(j) => j,
                None => {
                    return Err(SolveError::BrokenTour(
                        format!("node {} has no selected outgoing arc", at)));
                }
            };
            if enc.is_vehicle_end(next) {
                tour.push(enc.loc(next));
                break;
            }
            tour.push(enc.loc(next));
            hops += 1;
            if hops > enc.size {
                return Err(SolveError::BrokenTour(
                    format!("walk from vehicle {} exceeded {} nodes", vehicle, enc.size)));
            }
            at = next;
        }

        trace!(vehicle, ?tour);
        routes.push(tour);
    }

    return Ok(Routes { objective: assignment.objective, routes });
}
