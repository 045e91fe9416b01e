//! Drives the SAT backend to enumerate distinct satisfying models via
//! repeated solve-then-block, capped by result count and wall-clock deadline.
//! The deadline is also handed to the backend itself as `Config::cpu_time_limit`
//! so a single `solve()` call is bounded even between our own between-iteration
//! checks.

use std::time::{Duration, Instant};

use splr::{Certificate, Config, SatSolverIF, Solver, SolverError};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::scheduler::sat::{blocking_clause, Encoding};

/// The outcome of one enumeration run.
pub struct SolveOutcome {
    /// Each entry is the set of (0-indexed) section positions chosen for one model.
    pub models: Vec<Vec<usize>>,
    /// True if enumeration stopped due to the result cap or the deadline rather
    /// than the formula becoming unsatisfiable.
    pub limit_reached: bool,
}

pub struct SolveLimits {
    pub result_cap: usize,
    pub deadline: Duration,
}

/// Enumerates models of `encoding`, appending a blocking clause after each one,
/// until the backend reports UNSAT, the cap is hit, the deadline elapses, or
/// `cancel` is triggered.
pub fn enumerate(encoding: Encoding, limits: &SolveLimits, cancel: &CancellationToken) -> SolveOutcome {
    let start = Instant::now();
    let mut models = Vec::new();

    if encoding.num_vars == 0 {
        return SolveOutcome {
            models,
            limit_reached: false,
        };
    }

    // Bounds the backend's own internal work (propagations/conflicts), not just
    // the between-iteration check below: a single pathological `solve()` call
    // cannot run past this regardless of how many models have been found so
    // far, since splr tracks it against the same `Solver` across calls.
    let config = Config {
        cpu_time_limit: limits.deadline.as_secs_f64(),
        ..Config::default()
    };

    let mut solver = match Solver::try_from((config, encoding.clauses.clone())) {
        Ok(solver) => solver,
        Err(e) => {
            warn!(error = ?e, "failed to construct SAT instance");
            return SolveOutcome {
                models,
                limit_reached: false,
            };
        }
    };

    loop {
        if models.len() >= limits.result_cap {
            return SolveOutcome {
                models,
                limit_reached: true,
            };
        }
        if start.elapsed() >= limits.deadline {
            warn!(elapsed = ?start.elapsed(), "solver deadline reached");
            return SolveOutcome {
                models,
                limit_reached: true,
            };
        }
        if cancel.is_cancelled() {
            return SolveOutcome {
                models,
                limit_reached: true,
            };
        }

        match solver.solve() {
            Ok(Certificate::SAT(assignment)) => {
                let positives: Vec<usize> = assignment
                    .iter()
                    .filter(|&&lit| lit > 0)
                    .map(|&lit| (lit as usize) - 1)
                    .collect();
                trace!(count = positives.len(), "model found");
                let block = blocking_clause(&positives);
                models.push(positives);
                if solver.add_clause(block).is_err() {
                    // Adding the blocking clause made the formula trivially
                    // unsatisfiable: no further distinct models exist.
                    return SolveOutcome {
                        models,
                        limit_reached: false,
                    };
                }
            }
            Ok(Certificate::UNSAT) => {
                return SolveOutcome {
                    models,
                    limit_reached: false,
                };
            }
            Err(SolverError::EmptyClause) | Err(SolverError::Inconsistent) => {
                return SolveOutcome {
                    models,
                    limit_reached: false,
                };
            }
            Err(e) => {
                warn!(error = ?e, "SAT backend error, stopping enumeration");
                return SolveOutcome {
                    models,
                    limit_reached: true,
                };
            }
        }
    }
}
