//! Application state shared across the web layer.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Per-process state handed to every Axum handler.
///
/// There is no mutable scheduling state here: each request builds its own
/// catalog snapshot, conflict set, and SAT instance (see
/// `crate::scheduler::orchestrator`) and discards them when it returns. The
/// only things shared across requests are the database pool and the
/// solver's resource limits.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub solver_result_cap: usize,
    pub solver_deadline: Duration,
    /// Cancelled once during graceful shutdown so in-flight solves stop
    /// enumerating early instead of running to their deadline.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(db_pool: PgPool, solver_result_cap: usize, solver_deadline: Duration) -> Self {
        Self {
            db_pool,
            solver_result_cap,
            solver_deadline,
            shutdown: CancellationToken::new(),
        }
    }
}
