//! Power law in volumetric form.

use crate::common::{validate_coefficient, validate_exponent};
use crate::traits::{FlowElement, Flows};
use afn_core::flow_sign;
use afn_props::{AirProperties, ThermoState};

/// Leakage path parameterized by a volumetric coefficient.
///
/// Turbulent: `F = C·ρ·|Δp|^n`, with `C` in m³/(s·Pa^n).
/// Laminar: `F = Cl·(ρ/μ)·Δp`, with `Cl` in m³.
/// The smaller magnitude wins, as for the crack.
#[derive(Clone, Debug)]
pub struct ContamXPowerLaw {
    name: String,
    turbulent_coefficient: f64,
    laminar_coefficient: f64,
    exponent: f64,
}

impl ContamXPowerLaw {
    /// The laminar coefficient defaults to `C·μ_ref`, which puts the
    /// laminar/turbulent crossover at 1 Pa at the reference state.
    pub fn new(name: impl Into<String>, turbulent_coefficient: f64, exponent: f64, props: &dyn AirProperties) -> Self {
        let turbulent_coefficient = validate_coefficient(turbulent_coefficient);
        Self {
            name: name.into(),
            turbulent_coefficient,
            laminar_coefficient: turbulent_coefficient * props.reference_viscosity(),
            exponent: validate_exponent(exponent),
        }
    }

    pub fn with_laminar_coefficient(mut self, laminar_coefficient: f64) -> Self {
        self.laminar_coefficient = validate_coefficient(laminar_coefficient);
        self
    }

    pub fn turbulent_coefficient(&self) -> f64 {
        self.turbulent_coefficient
    }

    pub fn laminar_coefficient(&self) -> f64 {
        self.laminar_coefficient
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }
}

impl FlowElement for ContamXPowerLaw {
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
        let cdm = multiplier * self.laminar_coefficient * upwind.density() / upwind.viscosity();
        let fl = cdm * pdrop;
        if laminar {
            return Flows::one(fl, cdm);
        }

        let ft = flow_sign(pdrop)
            * multiplier
            * self.turbulent_coefficient
            * upwind.density()
            * pdrop.abs().powf(self.exponent);
        if fl.abs() <= ft.abs() {
            Flows::one(fl, cdm)
        } else {
            Flows::one(ft, ft * self.exponent / pdrop)
        }
    }

    fn linearize(&self, multiplier: f64, n: &ThermoState, m: &ThermoState) -> f64 {
        let d_ave = 0.5 * (n.density() + m.density());
        let vis_ave = 0.5 * (n.viscosity() + m.viscosity());
        multiplier * self.laminar_coefficient * d_ave / vis_ave
    }
}
