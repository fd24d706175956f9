//! Newton-Raphson driver for the network pressures.

use afn_graph::{Network, profile_heights};
use nalgebra::DVector;
use tracing::{debug, info, warn};

use crate::assembly::{Evaluation, assign_skyline_indices, filjac};
use crate::error::{SolverError, SolverResult};
use crate::skyline::SkylineMatrix;
use crate::stack::compute_stack_pressures;

/// Newton solver configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Maximum number of pressure updates
    pub max_iterations: usize,
    /// Absolute tolerance on the largest node mass imbalance [kg/s]
    pub tolerance: f64,
    /// Fraction of the Newton correction applied per update, in (0, 1]
    pub relaxation: f64,
    /// Run one linearized solve before iterating
    pub linear_init: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            tolerance: 1e-4,
            relaxation: 1.0,
            linear_init: false,
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    pub fn with_linear_init(mut self, linear_init: bool) -> Self {
        self.linear_init = linear_init;
        self
    }

    fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::ProblemSetup {
                what: "max_iterations must be at least 1".to_string(),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SolverError::ProblemSetup {
                what: format!("tolerance must be positive, got {}", self.tolerance),
            });
        }
        if !self.relaxation.is_finite() || self.relaxation <= 0.0 || self.relaxation > 1.0 {
            return Err(SolverError::ProblemSetup {
                what: format!("relaxation must lie in (0, 1], got {}", self.relaxation),
            });
        }
        Ok(())
    }
}

/// Lifecycle of a `NetworkSolver`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolverState {
    /// Matrix profile and link indices are set; no solve has run.
    ProfileBuilt,
    Iterating { iteration: usize },
    Converged { iterations: usize },
    Failed { iterations: usize, max_residual: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Converged,
    MaxIterationsExceeded,
}

/// Outcome of a completed solve.
///
/// Running out of iterations is reported here rather than as an error; the
/// network keeps the last pressures and flows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub iterations: usize,
    pub max_residual: f64,
}

impl SolveReport {
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// Steady-state pressure solver bound to one network.
#[derive(Debug)]
pub struct NetworkSolver {
    network: Network,
    config: SolverConfig,
    matrix: SkylineMatrix,
    residual: DVector<f64>,
    state: SolverState,
}

impl NetworkSolver {
    /// Build the Jacobian profile for `network` and index its links.
    pub fn new(mut network: Network, config: SolverConfig) -> SolverResult<Self> {
        config.validate()?;
        let heights = profile_heights(&network);
        let matrix = SkylineMatrix::new(&heights)?;
        assign_skyline_indices(&mut network, &matrix)?;
        debug!(
            unknowns = matrix.dim(),
            packed = matrix.packed_len(),
            links = network.links().len(),
            "skyline profile built"
        );
        let residual = DVector::zeros(matrix.dim());
        Ok(Self {
            network,
            config,
            matrix,
            residual,
            state: SolverState::ProfileBuilt,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutable access for boundary updates between solves.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn matrix(&self) -> &SkylineMatrix {
        &self.matrix
    }

    /// Node mass imbalances from the last assembly.
    pub fn residual(&self) -> &DVector<f64> {
        &self.residual
    }

    /// Refresh link stack pressures from the current flows.
    pub fn compute_stack_pressures(&mut self) {
        compute_stack_pressures(&mut self.network);
    }

    /// Assemble the Jacobian and residual at the current pressures.
    ///
    /// Returns the largest residual magnitude.
    pub fn filjac(&mut self, laminar: bool) -> SolverResult<f64> {
        self.assemble(Evaluation::Nonlinear { laminar })
    }

    fn assemble(&mut self, evaluation: Evaluation) -> SolverResult<f64> {
        filjac(
            self.network.parts_mut(),
            &mut self.matrix,
            self.residual.as_mut_slice(),
            evaluation,
        )
    }

    /// Factor the current Jacobian and subtract `scale` times the correction.
    fn update_pressures(&mut self, scale: f64) -> SolverResult<()> {
        let mut correction = self.residual.clone();
        self.matrix.factorize_and_solve(correction.as_mut_slice())?;
        let n = self.matrix.dim();
        for (node, dp) in self.network.parts_mut().nodes[..n].iter_mut().zip(correction.iter()) {
            node.pressure -= scale * dp;
        }
        Ok(())
    }

    /// Solve the system with every element replaced by its zero-drop
    /// linearization, then record the resulting flows.
    pub fn linear_initialize(&mut self) -> SolverResult<()> {
        if self.matrix.dim() == 0 {
            return Ok(());
        }
        let max = self.assemble(Evaluation::Linear)?;
        debug!(max_residual = max, "linear initialization");
        self.update_pressures(1.0)?;
        self.assemble(Evaluation::Linear)?;
        Ok(())
    }

    /// Iterate until the largest mass imbalance is below tolerance.
    ///
    /// Stack pressures are refreshed first from the flows left by the previous
    /// solve and held fixed while iterating. The network keeps the final
    /// pressures, link pressure drops and flows.
    pub fn solve(&mut self) -> SolverResult<SolveReport> {
        compute_stack_pressures(&mut self.network);
        if self.config.linear_init {
            self.linear_initialize()?;
        }

        let max_iterations = self.config.max_iterations;
        let tolerance = self.config.tolerance;
        let mut iterations = 0;
        let mut max_residual = self.filjac(false)?;

        while max_residual >= tolerance && iterations < max_iterations {
            self.state = SolverState::Iterating {
                iteration: iterations,
            };
            self.update_pressures(self.config.relaxation)?;
            iterations += 1;
            max_residual = self.filjac(false)?;
            debug!(iteration = iterations, max_residual, "newton update");
        }

        if max_residual < tolerance {
            self.state = SolverState::Converged { iterations };
            info!(iterations, max_residual, "network converged");
            Ok(SolveReport {
                status: SolveStatus::Converged,
                iterations,
                max_residual,
            })
        } else {
            self.state = SolverState::Failed {
                iterations,
                max_residual,
            };
            warn!(iterations, max_residual, "network did not converge");
            Ok(SolveReport {
                status: SolveStatus::MaxIterationsExceeded,
                iterations,
                max_residual,
            })
        }
    }
}
