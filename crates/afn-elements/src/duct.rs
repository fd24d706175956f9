//! Straight duct with a Colebrook-type friction factor.

use crate::error::{ElementResult, positive};
use crate::traits::{FlowElement, Flows};
use afn_core::flow_sign;
use afn_props::ThermoState;
use std::f64::consts::PI;

/// Slope of the friction-factor log law.
const FRICTION_SLOPE: f64 = 0.868_589;
/// Relative change that ends the friction-factor iteration.
const FRICTION_EPS: f64 = 0.001;
const MAX_FRICTION_ITERATIONS: usize = 100;
/// Laminar friction constant used for the linear initialization.
const INIT_LAMINAR_COEFFICIENT: f64 = 128.0;
/// Below this Reynolds number the turbulent solve is skipped.
const TURBULENT_REYNOLDS: f64 = 10.0;

/// Duct of given length, hydraulic diameter and surface roughness.
#[derive(Clone, Debug)]
pub struct Duct {
    name: String,
    length: f64,
    diameter: f64,
    roughness: f64,
    laminar_dynamic: f64,
    laminar_friction: f64,
    turbulent_dynamic: f64,
    area: f64,
    length_ratio: f64,
    initial_friction: f64,
}

impl Duct {
    /// Lengths in m. Roughness must be positive since the friction law uses `ln(ε/D)`.
    pub fn new(name: impl Into<String>, length: f64, diameter: f64, roughness: f64) -> ElementResult<Self> {
        let length = positive(length, "duct length")?;
        let diameter = positive(diameter, "duct diameter")?;
        let roughness = positive(roughness, "duct roughness")?;
        Ok(Self {
            name: name.into(),
            length,
            diameter,
            roughness,
            laminar_dynamic: 64.0,
            laminar_friction: 0.0001,
            turbulent_dynamic: 0.0001,
            area: 0.25 * PI * diameter * diameter,
            length_ratio: length / diameter,
            initial_friction: 1.14 - FRICTION_SLOPE * (roughness / diameter).ln(),
        })
    }

    /// Override the dynamic and friction loss coefficients.
    ///
    /// A laminar friction coefficient of at least 0.001 switches the laminar
    /// branch to the quadratic (entry-loss) form.
    pub fn with_loss_coefficients(mut self, laminar_dynamic: f64, laminar_friction: f64, turbulent_dynamic: f64) -> Self {
        self.laminar_dynamic = laminar_dynamic.abs();
        self.laminar_friction = laminar_friction.abs();
        self.turbulent_dynamic = turbulent_dynamic.abs();
        self
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    fn laminar_init_coefficient(&self, density: f64, viscosity: f64) -> f64 {
        2.0 * density * self.area * self.diameter / (viscosity * INIT_LAMINAR_COEFFICIENT * self.length_ratio)
    }

    /// Laminar candidate magnitude and derivative for `|Δp|`.
    fn laminar(&self, abs_dp: f64, density: f64, viscosity: f64) -> (f64, f64) {
        if self.laminar_friction >= 0.001 {
            let a2 = self.laminar_friction / (2.0 * density * self.area * self.area);
            let a1 = viscosity * self.laminar_dynamic * self.length_ratio / (2.0 * density * self.area * self.diameter);
            let root = (a1 * a1 + 4.0 * a2 * abs_dp).sqrt();
            ((root - a1) / (2.0 * a2), 1.0 / root)
        } else {
            let cdm = 2.0 * density * self.area * self.diameter / (viscosity * self.laminar_dynamic * self.length_ratio);
            (cdm * abs_dp, cdm)
        }
    }

    /// Turbulent flow magnitude for `|Δp|`, iterating on the friction factor.
    fn turbulent(&self, abs_dp: f64, density: f64, viscosity: f64) -> f64 {
        let s2 = (2.0 * density * abs_dp).sqrt() * self.area;
        let mut g = self.initial_friction;
        let mut ftt = s2 / (self.length_ratio / (g * g) + self.turbulent_dynamic).sqrt();
        for _ in 0..MAX_FRICTION_ITERATIONS {
            let ft = ftt;
            let b = 9.3 * viscosity * self.area / (ft * self.roughness);
            let d = 1.0 + g * b;
            g -= (g - self.initial_friction + FRICTION_SLOPE * d.ln()) / (1.0 + FRICTION_SLOPE * b / d);
            ftt = s2 / (self.length_ratio / (g * g) + self.turbulent_dynamic).sqrt();
            if ((ftt - ft) / ftt).abs() < FRICTION_EPS {
                break;
            }
        }
        ftt
    }
}

impl FlowElement for Duct {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(
        &self,
        laminar: bool,
        pdrop: f64,
        multiplier: f64,
        _control: f64,
        n: &ThermoState,
        m: &ThermoState,
    ) -> Flows {
        let upwind = if pdrop >= 0.0 { n } else { m };
        let (rho, mu) = (upwind.density(), upwind.viscosity());

        if laminar {
            let df = self.laminar_init_coefficient(rho, mu);
            return Flows::one(df * pdrop, df).scaled(multiplier);
        }

        let sign = flow_sign(pdrop);
        let abs_dp = pdrop.abs();
        let (fl_abs, cdm) = self.laminar(abs_dp, rho, mu);
        let reynolds = fl_abs * self.diameter / (mu * self.area);
        let ft_abs = if reynolds >= TURBULENT_REYNOLDS {
            self.turbulent(abs_dp, rho, mu)
        } else {
            fl_abs
        };

        let flows = if fl_abs <= ft_abs {
            Flows::one(sign * fl_abs, cdm)
        } else {
            let ft = sign * ft_abs;
            Flows::one(ft, 0.5 * ft / pdrop)
        };
        flows.scaled(multiplier)
    }

    fn linearize(&self, multiplier: f64, n: &ThermoState, m: &ThermoState) -> f64 {
        let d_ave = 0.5 * (n.density() + m.density());
        let vis_ave = 0.5 * (n.viscosity() + m.viscosity());
        multiplier * self.laminar_init_coefficient(d_ave, vis_ave)
    }
}
