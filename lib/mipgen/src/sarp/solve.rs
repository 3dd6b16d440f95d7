use std::fmt;

use good_lp::{default_solver, variable, variables, Expression, ResolutionError, Solution, SolverModel};
use tracing::*;

use super::SolveError;
use super::model::{RouteMip, VarKind};

/// Terminal verdict from the external mixed-integer solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    SolverError,
    /// The backend gave up without proving anything (e.g. an exhausted
    /// budget, where the backend supports one).
    NotSolved,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::SolverError => "solver error",
            SolveStatus::NotSolved => "not solved",
        };
        f.write_str(s)
    }
}

/// Every variable's value in an optimal solution, indexed by `VarId`.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub values: Vec<f64>,
    pub objective: f64,
}

/// Hand the model to the MIP solver. Only an optimal outcome yields an
/// assignment; everything else surfaces as `NoRouting` with the mapped
/// status, and no retry is attempted.
#[instrument(level="debug", skip(mip), fields(vars = mip.vars.len(), rows = mip.rows.len()))]
pub fn solve(mip: &RouteMip) -> Result<Assignment, SolveError> {
    // an empty variable domain means the model is infeasible; some backends
    // reject such bounds instead of reporting them
    if mip.vars.iter().any(|def| def.lb > def.ub) {
        debug!("variable with empty domain");
        return Err(SolveError::NoRouting(SolveStatus::Infeasible));
    }

    let mut vars = variables!();
    let lp_vars: Vec<_> = mip.vars.iter()
        .map(|def| {
            let mut v = variable();
            v = match def.kind {
                VarKind::Binary => v.binary(),
                VarKind::Integer => v.integer(),
                VarKind::Continuous => v,
            };
            if def.lb.is_finite() {
                v = v.min(def.lb);
            }
            if def.ub.is_finite() {
                v = v.max(def.ub);
            }
            vars.add(v)
        })
        .collect();

    let mut objective = Expression::with_capacity(mip.objective.len());
    for &(v, coef) in &mip.objective {
        objective.add_mul(coef, lp_vars[v]);
    }

    let mut problem = vars.minimise(objective).using(default_solver);
    for row in &mip.rows {
        let mut expr = Expression::with_capacity(row.terms.len());
        for &(v, coef) in &row.terms {
            expr.add_mul(coef, lp_vars[v]);
        }
        if row.lb == row.ub {
            problem = problem.with(expr.eq(row.lb));
        } else {
            if row.ub.is_finite() {
                problem = problem.with(expr.clone().leq(row.ub));
            }
            if row.lb.is_finite() {
                problem = problem.with(expr.geq(row.lb));
            }
        }
    }

    match problem.solve() {
        Ok(solution) => {
            let values: Vec<f64> = lp_vars.iter().map(|&v| solution.value(v)).collect();
            let objective = mip.objective.iter().map(|&(v, coef)| coef * values[v]).sum();
            debug!(objective, "optimal assignment");
            return Ok(Assignment { values, objective });
        }
        Err(e) => {
            let status = match e {
                ResolutionError::Infeasible => SolveStatus::Infeasible,
                ResolutionError::Unbounded => SolveStatus::Unbounded,
                _ => SolveStatus::SolverError,
            };
            info!(%status, "no optimal assignment");
            return Err(SolveError::NoRouting(status));
        }
    }
}
