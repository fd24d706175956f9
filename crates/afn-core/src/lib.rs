//! afn-core: shared foundation for the airflow network crates.
//!
//! Contains:
//! - units (uom conversion of loader input + Kelvin helper + constants)
//! - numeric (tolerances + float helpers)
//! - ids (compact IDs for nodes, links and elements)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{AfnError, AfnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
