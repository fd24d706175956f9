//! Error types for network solving.

use afn_core::error::AfnError;
use thiserror::Error;

/// Failures of the sparse factorizations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkylineError {
    #[error("Zero or non-finite pivot {value} at row {index}")]
    SingularPivot { index: usize, value: f64 },

    #[error("Profile height {height} of column {column} reaches above row 0")]
    InvalidProfile { column: usize, height: usize },

    #[error("Entry ({row}, {col}) is outside the stored profile")]
    OutsideProfile { row: usize, col: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

pub type SkylineResult<T> = Result<T, SkylineError>;

/// Errors that can occur during network solving.
///
/// Hitting the iteration cap is not an error; see `SolveStatus`.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Topology error on link \"{link}\": {what}")]
    Topology { link: String, what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] afn_graph::GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SkylineError> for SolverError {
    fn from(e: SkylineError) -> Self {
        SolverError::Numeric {
            what: e.to_string(),
        }
    }
}

impl From<SolverError> for AfnError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { .. } => AfnError::InvalidArg {
                what: "problem setup",
            },
            SolverError::Topology { .. } => AfnError::InvalidArg { what: "topology" },
            SolverError::Numeric { .. } => AfnError::InvalidArg { what: "numeric" },
            SolverError::Graph(g) => g.into(),
        }
    }
}
