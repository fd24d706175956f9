//! Coefficient validation and the power-law crack term shared by several elements.

use crate::traits::Flows;
use afn_core::constants::{REFERENCE_HUMIDITY_RATIO, REFERENCE_PRESSURE_PA, REFERENCE_TEMPERATURE_C};
use afn_core::{flow_sign, to_kelvin};
use afn_props::{AirProperties, ThermoState};

pub const DEFAULT_EXPONENT: f64 = 0.65;

/// Zero means "unset" and maps to 1.0; otherwise the magnitude is used.
pub fn validate_coefficient(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v.abs() }
}

/// Exponents outside [0.5, 1.0] fall back to 0.65.
pub fn validate_exponent(v: f64) -> f64 {
    if (0.5..=1.0).contains(&v) {
        v
    } else {
        DEFAULT_EXPONENT
    }
}

pub fn validate_pressure(v: f64) -> f64 {
    if v > 0.0 { v } else { REFERENCE_PRESSURE_PA }
}

pub fn validate_temperature(v: f64) -> f64 {
    if v > -273.15 { v } else { REFERENCE_TEMPERATURE_C }
}

pub fn validate_humidity_ratio(v: f64) -> f64 {
    if v >= 0.0 { v } else { REFERENCE_HUMIDITY_RATIO }
}

/// Conditions at which an element's coefficients were measured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceConditions {
    pub pressure: f64,
    pub temperature: f64,
    pub humidity_ratio: f64,
}

impl Default for ReferenceConditions {
    fn default() -> Self {
        Self {
            pressure: REFERENCE_PRESSURE_PA,
            temperature: REFERENCE_TEMPERATURE_C,
            humidity_ratio: REFERENCE_HUMIDITY_RATIO,
        }
    }
}

impl ReferenceConditions {
    /// Clamp each field into its physical range.
    pub fn validated(self) -> Self {
        Self {
            pressure: validate_pressure(self.pressure),
            temperature: validate_temperature(self.temperature),
            humidity_ratio: validate_humidity_ratio(self.humidity_ratio),
        }
    }

    pub fn density(&self, props: &dyn AirProperties) -> f64 {
        props.density(self.pressure, self.temperature, self.humidity_ratio)
    }

    pub fn viscosity(&self, props: &dyn AirProperties) -> f64 {
        props.viscosity(self.temperature)
    }
}

/// Power-law crack with laminar/turbulent selection.
///
/// `F = C·√ρ·|Δp|^n` in the turbulent regime, corrected for departure from the
/// reference density and viscosity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrackTerm {
    pub coefficient: f64,
    pub laminar_coefficient: f64,
    pub exponent: f64,
    pub reference_density: f64,
    pub reference_viscosity: f64,
}

impl CrackTerm {
    pub fn new(
        coefficient: f64,
        exponent: f64,
        reference: ReferenceConditions,
        props: &dyn AirProperties,
    ) -> Self {
        let coefficient = validate_coefficient(coefficient);
        let reference = reference.validated();
        Self {
            coefficient,
            laminar_coefficient: coefficient,
            exponent: validate_exponent(exponent),
            reference_density: reference.density(props),
            reference_viscosity: reference.viscosity(props),
        }
    }

    /// Same term with both coefficients multiplied by `k`.
    pub(crate) fn scaled(self, k: f64) -> Self {
        Self {
            coefficient: self.coefficient * k,
            laminar_coefficient: self.laminar_coefficient * k,
            ..self
        }
    }

    /// Evaluate the crack with upwind selection.
    pub fn flow(&self, laminar: bool, pdrop: f64, scale: f64, n: &ThermoState, m: &ThermoState) -> Flows {
        let upwind = if pdrop >= 0.0 { n } else { m };
        let vis_ave = 0.5 * (n.viscosity() + m.viscosity());
        let t_ave = 0.5 * (n.temperature() + m.temperature());
        let rho_cor = to_kelvin(upwind.temperature()) / to_kelvin(t_ave);
        let ctl = (self.reference_density / upwind.density() / rho_cor).powf(self.exponent - 1.0)
            * (self.reference_viscosity / vis_ave).powf(2.0 * self.exponent - 1.0);

        let cdm = self.laminar_coefficient * scale / upwind.sqrt_density() * upwind.density()
            / upwind.viscosity()
            * ctl;
        let fl = cdm * pdrop;
        if laminar {
            return Flows::one(fl, cdm);
        }

        let abs_dp = pdrop.abs();
        let ft = if self.exponent == 0.5 {
            flow_sign(pdrop) * self.coefficient * scale * abs_dp.sqrt() * ctl
        } else {
            flow_sign(pdrop) * self.coefficient * scale * abs_dp.powf(self.exponent) * ctl
        };

        if fl.abs() <= ft.abs() {
            Flows::one(fl, cdm)
        } else {
            Flows::one(ft, ft * self.exponent / pdrop)
        }
    }

    /// Laminar coefficient at the averaged state.
    pub fn linear_coefficient(&self, scale: f64, n: &ThermoState, m: &ThermoState) -> f64 {
        let d_ave = 0.5 * (n.density() + m.density());
        let vis_ave = 0.5 * (n.viscosity() + m.viscosity());
        let coef = self.laminar_coefficient * scale / d_ave.sqrt();
        let ctl = (self.reference_density / d_ave).powf(self.exponent - 1.0)
            * (self.reference_viscosity / vis_ave).powf(2.0 * self.exponent - 1.0);
        coef * d_ave / vis_ave * ctl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afn_props::FixedAir;

    #[test]
    fn coefficient_validation() {
        assert_eq!(validate_coefficient(0.0), 1.0);
        assert_eq!(validate_coefficient(-0.25), 0.25);
        assert_eq!(validate_coefficient(0.001), 0.001);
    }

    #[test]
    fn exponent_validation() {
        assert_eq!(validate_exponent(0.5), 0.5);
        assert_eq!(validate_exponent(1.0), 1.0);
        assert_eq!(validate_exponent(0.001), DEFAULT_EXPONENT);
        assert_eq!(validate_exponent(1.5), DEFAULT_EXPONENT);
    }

    #[test]
    fn reference_validation() {
        let bad = ReferenceConditions {
            pressure: -5.0,
            temperature: -300.0,
            humidity_ratio: -0.1,
        };
        assert_eq!(bad.validated(), ReferenceConditions::default());
    }

    #[test]
    fn square_root_branch_matches_power() {
        let air = FixedAir::default();
        let state = ThermoState::reference(&air);
        let crack = CrackTerm::new(0.01, 0.5, ReferenceConditions::default(), &air);
        let flows = crack.flow(false, 4.0, 1.0, &state, &state);
        assert!((flows.f()[0] - 0.01 * 2.0).abs() < 1e-15);
        assert!((flows.df()[0] - 0.5 * 0.02 / 4.0).abs() < 1e-15);
    }

    #[test]
    fn zero_drop_stays_laminar() {
        let air = FixedAir::default();
        let state = ThermoState::reference(&air);
        let crack = CrackTerm::new(0.001, 0.65, ReferenceConditions::default(), &air);
        let flows = crack.flow(false, 0.0, 1.0, &state, &state);
        assert_eq!(flows.f()[0], 0.0);
        assert!(flows.df()[0] > 0.0);
    }
}
