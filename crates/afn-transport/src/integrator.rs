//! Fixed-step integrators for the capacity-weighted transport equation
//!
//! `A·dC/dt = M·C − R⊙C + G`
//!
//! where `A` is the node capacity, `R` a removal rate and `G` a generation rate.

use std::fmt;
use std::str::FromStr;

use afn_solver::SkylineLu;
use nalgebra::DVector;
use tracing::trace;

use crate::error::{TransportError, TransportResult};

/// Per-node coefficients at the start (`*0`) and end of a step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepCoefficients {
    pub a0: DVector<f64>,
    pub a: DVector<f64>,
    pub r0: DVector<f64>,
    pub r: DVector<f64>,
    pub g0: DVector<f64>,
    pub g: DVector<f64>,
}

impl StepCoefficients {
    /// Coefficients that do not change over the step.
    pub fn constant(a: DVector<f64>, r: DVector<f64>, g: DVector<f64>) -> Self {
        Self {
            a0: a.clone(),
            a,
            r0: r.clone(),
            r,
            g0: g.clone(),
            g,
        }
    }

    /// Unit capacity with no removal or generation.
    pub fn passive(n: usize) -> Self {
        Self::constant(
            DVector::from_element(n, 1.0),
            DVector::zeros(n),
            DVector::zeros(n),
        )
    }

    fn check(&self, n: usize) -> TransportResult<()> {
        let fields = [
            ("a0", &self.a0),
            ("a", &self.a),
            ("r0", &self.r0),
            ("r", &self.r),
            ("g0", &self.g0),
            ("g", &self.g),
        ];
        for (what, v) in fields {
            if v.len() != n {
                return Err(TransportError::DimensionMismatch {
                    what,
                    expected: n,
                    found: v.len(),
                });
            }
        }
        if self.a.iter().any(|a| *a <= 0.0 || !a.is_finite()) {
            return Err(TransportError::InvalidArg {
                what: "capacities must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// One time step of the transport equation.
pub trait Integrator {
    fn name(&self) -> &'static str;

    /// Advance `c` in place by `h` seconds.
    fn step(
        &self,
        advection: &SkylineLu,
        coefficients: &StepCoefficients,
        h: f64,
        c: &mut DVector<f64>,
    ) -> TransportResult<()>;
}

fn check_step(advection: &SkylineLu, coefficients: &StepCoefficients, h: f64, c: &DVector<f64>) -> TransportResult<()> {
    if !h.is_finite() || h <= 0.0 {
        return Err(TransportError::InvalidArg {
            what: format!("time step must be positive, got {h}"),
        });
    }
    let n = advection.dim();
    if c.len() != n {
        return Err(TransportError::DimensionMismatch {
            what: "concentration",
            expected: n,
            found: c.len(),
        });
    }
    coefficients.check(n)
}

/// `h·(M·C − R0⊙C + G0)`
fn explicit_increment(
    advection: &SkylineLu,
    k: &StepCoefficients,
    h: f64,
    c: &DVector<f64>,
) -> TransportResult<DVector<f64>> {
    let mc = DVector::from_vec(advection.mul_vec(c.as_slice())?);
    Ok((mc - k.r0.component_mul(c) + &k.g0) * h)
}

/// Solve `((A + w·R) − w·M)·x = rhs` in place.
fn implicit_solve(advection: &SkylineLu, k: &StepCoefficients, w: f64, rhs: &mut DVector<f64>) -> TransportResult<()> {
    let mut lhs = advection.clone();
    lhs.scale(-w);
    for i in 0..lhs.dim() {
        lhs.add(i, i, k.a[i] + w * k.r[i])?;
    }
    lhs.factorize_and_solve(rhs.as_mut_slice())?;
    Ok(())
}

/// Forward Euler.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn step(&self, advection: &SkylineLu, k: &StepCoefficients, h: f64, c: &mut DVector<f64>) -> TransportResult<()> {
        check_step(advection, k, h, c)?;
        let next = (k.a0.component_mul(c) + explicit_increment(advection, k, h, c)?).component_div(&k.a);
        *c = next;
        trace!(scheme = self.name(), h, "transport step");
        Ok(())
    }
}

/// Backward Euler.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImplicitEuler;

impl Integrator for ImplicitEuler {
    fn name(&self) -> &'static str {
        "implicit"
    }

    fn step(&self, advection: &SkylineLu, k: &StepCoefficients, h: f64, c: &mut DVector<f64>) -> TransportResult<()> {
        check_step(advection, k, h, c)?;
        let mut rhs = &k.g * h + k.a.component_mul(c);
        implicit_solve(advection, k, h, &mut rhs)?;
        *c = rhs;
        trace!(scheme = self.name(), h, "transport step");
        Ok(())
    }
}

/// Trapezoidal rule: explicit half step on the right, implicit half step on the left.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrankNicolson;

impl Integrator for CrankNicolson {
    fn name(&self) -> &'static str {
        "crank-nicolson"
    }

    fn step(&self, advection: &SkylineLu, k: &StepCoefficients, h: f64, c: &mut DVector<f64>) -> TransportResult<()> {
        check_step(advection, k, h, c)?;
        let hh = 0.5 * h;
        let mut rhs = &k.g * hh + k.a0.component_mul(c) + explicit_increment(advection, k, hh, c)?;
        implicit_solve(advection, k, hh, &mut rhs)?;
        *c = rhs;
        trace!(scheme = self.name(), h, "transport step");
        Ok(())
    }
}

/// Selectable time-stepping scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scheme {
    Explicit,
    #[default]
    Implicit,
    CrankNicolson,
}

impl Scheme {
    pub fn integrator(self) -> Box<dyn Integrator> {
        match self {
            Scheme::Explicit => Box::new(ExplicitEuler),
            Scheme::Implicit => Box::new(ImplicitEuler),
            Scheme::CrankNicolson => Box::new(CrankNicolson),
        }
    }
}

impl FromStr for Scheme {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explicit" => Ok(Scheme::Explicit),
            "implicit" => Ok(Scheme::Implicit),
            "crank-nicolson" | "crank_nicolson" | "cn" => Ok(Scheme::CrankNicolson),
            other => Err(TransportError::InvalidArg {
                what: format!("unknown scheme \"{other}\""),
            }),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.integrator().name())
    }
}
