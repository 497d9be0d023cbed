//! Crate-wide error type.

use thiserror::Error;

use crate::source::FetchError;

/// Errors surfaced by the dashboard core and its loaders.
///
/// Missing values inside a series never show up here: they are folded into
/// zero, [`NetFlow::Unknown`](crate::mix::NetFlow) or
/// [`Capacity::Absent`](crate::mix::Capacity) where they are encountered.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream data source rejected or failed a request.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("unknown region \"{0}\"")]
    UnknownRegion(String),

    #[error("year {0} is not among the available years")]
    UnknownYear(i32),

    #[error("unknown generation subset \"{0}\"")]
    UnknownSubset(String),

    /// The data source reported no annual history at all.
    #[error("no generation years available from the data source")]
    NoYears,

    #[error("capacity table \"{path}\": {source}")]
    CapacityTable {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias defaulting to the crate error.
pub type Result<T, E = Error> = std::result::Result<T, E>;
