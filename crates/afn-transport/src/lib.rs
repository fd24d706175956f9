//! afn-transport: contaminant transport over a solved airflow network.
//!
//! Provides:
//! - Per-link, per-contaminant filters (`Filter`, `LinkFilters`)
//! - The advection matrix built from converged link flows (`TransportSystem`)
//! - Explicit, implicit and Crank-Nicolson steppers behind `Integrator`
//!
//! The flow field is frozen while stepping; re-assemble after every flow solve.

pub mod advection;
pub mod error;
pub mod filter;
pub mod integrator;

pub use advection::TransportSystem;
pub use error::{TransportError, TransportResult};
pub use filter::{Filter, LinkFilters};
pub use integrator::{CrankNicolson, ExplicitEuler, ImplicitEuler, Integrator, Scheme, StepCoefficients};
