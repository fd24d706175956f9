//! Steady-state pressure solver for airflow networks.
//!
//! The unknowns are the gauge pressures of the simulated nodes. Each Newton
//! step assembles the node mass balances and their Jacobian from every link,
//! factors the symmetric Jacobian in skyline storage and applies a relaxed
//! correction. Stack pressures are computed separately from the last flows.
//!
//! `SkylineLu` shares the profile layout for the non-symmetric systems of
//! contaminant transport.

pub mod assembly;
pub mod error;
pub mod newton;
pub mod skyline;
pub mod skyline_lu;
pub mod stack;

pub use assembly::{Evaluation, assign_skyline_indices, filjac};
pub use error::{SkylineError, SkylineResult, SolverError, SolverResult};
pub use newton::{NetworkSolver, SolveReport, SolveStatus, SolverConfig, SolverState};
pub use skyline::SkylineMatrix;
pub use skyline_lu::SkylineLu;
pub use stack::{StackInputs, compute_stack_pressures, upwind_stack_pressure};
