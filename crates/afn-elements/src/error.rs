//! Error types for element construction.

use afn_core::error::AfnError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ElementError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ElementResult<T> = Result<T, ElementError>;

impl From<ElementError> for AfnError {
    fn from(e: ElementError) -> Self {
        match e {
            ElementError::NonPhysical { what } => AfnError::InvalidArg { what },
            ElementError::InvalidArg { what } => AfnError::InvalidArg { what },
        }
    }
}

/// Reject non-finite or non-positive geometry.
pub(crate) fn positive(v: f64, what: &'static str) -> ElementResult<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(ElementError::NonPhysical { what })
    }
}
