//! Error taxonomy for the scheduling core.

use thiserror::Error;

/// Errors produced while building or solving a schedule request.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A clock string failed to parse. Fatal to the section that carried it.
    #[error("invalid time: {0}")]
    BadTime(String),

    /// The backing section catalog could not be reached.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[source] anyhow::Error),

    /// A catalog row was malformed. The caller should skip the row, not the request.
    #[error("invalid catalog row: {0}")]
    CatalogRowInvalid(String),
}
