use std::time::Duration;

#[cfg(doc)]
use crate::{Matrix, SolverConfig};

use crate::parse_errors::ParseError;

/// Error for [`Matrix::new`]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A row names an element outside of `0..universe_size`
    #[error("row {row} contains element {element}, universe has only {universe_size} elements")]
    ElementOutOfRange {
        /// Index of the offending row
        row: usize,
        /// The out of range element
        element: usize,
        /// Size of the universe the matrix is built for
        universe_size: usize,
    },
    /// A row names the same element twice
    #[error("row {row} contains element {element} more than once")]
    DuplicateElement {
        /// Index of the offending row
        row: usize,
        /// The repeated element
        element: usize,
    },
}

/// A search aborted because one of the limits in [`SolverConfig`] was hit.
///
/// This is distinct from the search finishing without a solution, which is
/// reported as `Ok(None)`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Interrupted {
    /// More search nodes were visited than allowed
    #[error("search exceeded the limit of {0} nodes")]
    NodeLimit(u64),
    /// The search ran longer than allowed
    #[error("search exceeded the time limit of {0:?}")]
    TimeLimit(Duration),
}

/// Error for loading a problem from its text representation in one go
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProblemError {
    /// The text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The parsed rows do not fit the universe
    #[error(transparent)]
    Build(#[from] BuildError),
}
