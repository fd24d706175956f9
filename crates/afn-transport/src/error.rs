//! Error types for contaminant transport.

use afn_core::error::AfnError;
use afn_solver::SkylineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Length mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Linear solve failed: {0}")]
    Numeric(#[from] SkylineError),
}

pub type TransportResult<T> = Result<T, TransportError>;

impl From<TransportError> for AfnError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::InvalidArg { .. } => AfnError::InvalidArg {
                what: "transport argument",
            },
            TransportError::DimensionMismatch { .. } => AfnError::InvalidArg {
                what: "transport dimension",
            },
            TransportError::Numeric(e) => AfnError::Invariant {
                what: e.to_string(),
            },
        }
    }
}
