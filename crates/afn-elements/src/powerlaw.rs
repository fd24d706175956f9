//! Power-law crack element.

use crate::common::{CrackTerm, ReferenceConditions, validate_coefficient};
use crate::traits::{FlowElement, Flows};
use afn_props::{AirProperties, ThermoState};

/// Leakage path following `F = C·√ρ·Δp^n`, with a laminar branch near zero drop.
#[derive(Clone, Debug)]
pub struct PowerLaw {
    name: String,
    crack: CrackTerm,
    reference: ReferenceConditions,
}

impl PowerLaw {
    /// Create a crack measured at the standard reference state.
    pub fn new(
        name: impl Into<String>,
        coefficient: f64,
        exponent: f64,
        props: &dyn AirProperties,
    ) -> Self {
        Self::with_reference(name, coefficient, exponent, ReferenceConditions::default(), props)
    }

    /// Create a crack measured at `reference`.
    ///
    /// The coefficient and exponent are validated, not rejected: zero
    /// coefficients become 1.0 and out-of-range exponents become 0.65.
    pub fn with_reference(
        name: impl Into<String>,
        coefficient: f64,
        exponent: f64,
        reference: ReferenceConditions,
        props: &dyn AirProperties,
    ) -> Self {
        let reference = reference.validated();
        Self {
            name: name.into(),
            crack: CrackTerm::new(coefficient, exponent, reference, props),
            reference,
        }
    }

    /// Override the coefficient used by the laminar branch.
    pub fn with_laminar_coefficient(mut self, laminar_coefficient: f64) -> Self {
        self.crack.laminar_coefficient = validate_coefficient(laminar_coefficient);
        self
    }

    pub fn coefficient(&self) -> f64 {
        self.crack.coefficient
    }

    pub fn laminar_coefficient(&self) -> f64 {
        self.crack.laminar_coefficient
    }

    pub fn exponent(&self) -> f64 {
        self.crack.exponent
    }

    pub fn reference(&self) -> ReferenceConditions {
        self.reference
    }

    pub fn reference_density(&self) -> f64 {
        self.crack.reference_density
    }

    pub fn reference_viscosity(&self) -> f64 {
        self.crack.reference_viscosity
    }
}

impl FlowElement for PowerLaw {
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
        self.crack.flow(laminar, pdrop, multiplier, n, m)
    }

    fn linearize(&self, multiplier: f64, n: &ThermoState, m: &ThermoState) -> f64 {
        self.crack.linear_coefficient(multiplier, n, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afn_props::FixedAir;

    fn crack() -> (PowerLaw, ThermoState) {
        let air = FixedAir::default();
        (
            PowerLaw::new("crack", 0.001, 0.001, &air),
            ThermoState::reference(&air),
        )
    }

    #[test]
    fn construction_validates() {
        let (element, _) = crack();
        assert_eq!(element.coefficient(), 0.001);
        assert_eq!(element.exponent(), 0.65);
        assert_eq!(element.reference_density(), 1.2041);
        assert_eq!(element.reference_viscosity(), 1.81625e-5);
        assert_eq!(element.name(), "crack");
    }

    #[test]
    fn linearize_matches_closed_form() {
        let (element, state) = crack();
        let expected = 0.001 * 1.2041_f64.sqrt() / 1.81625e-5;
        let c = element.linearize(1.0, &state, &state);
        assert!((c - expected).abs() < 1e-12 * expected);
    }

    #[test]
    fn laminar_flow_is_linear_and_antisymmetric() {
        let (element, state) = crack();
        let cdm = 0.001 * 1.2041_f64.sqrt() / 1.81625e-5;

        let fwd = element.calculate(true, 10.0, 1.0, 1.0, &state, &state);
        assert_eq!(fwd.count(), 1);
        assert!((fwd.f()[0] - 10.0 * cdm).abs() < 1e-10 * cdm);
        assert!((fwd.df()[0] - cdm).abs() < 1e-12 * cdm);

        let rev = element.calculate(true, -10.0, 1.0, 1.0, &state, &state);
        assert!((rev.f()[0] + 10.0 * cdm).abs() < 1e-10 * cdm);
        assert!((rev.df()[0] - cdm).abs() < 1e-12 * cdm);
    }

    #[test]
    fn turbulent_flow_matches_power_law() {
        let (element, state) = crack();
        let f = 0.001 * 10.0_f64.powf(0.65);
        let df = 0.000065 * 10.0_f64.powf(0.65);

        let fwd = element.calculate(false, 10.0, 1.0, 1.0, &state, &state);
        assert!((fwd.f()[0] - f).abs() < 1e-15);
        assert!((fwd.df()[0] - df).abs() < 1e-15);

        let rev = element.calculate(false, -10.0, 1.0, 1.0, &state, &state);
        assert!((rev.f()[0] + f).abs() < 1e-15);
        assert!((rev.df()[0] - df).abs() < 1e-15);
    }

    #[test]
    fn multiplier_scales_flow() {
        let (element, state) = crack();
        let one = element.calculate(false, 10.0, 1.0, 1.0, &state, &state);
        let three = element.calculate(false, 10.0, 3.0, 1.0, &state, &state);
        assert!((three.f()[0] - 3.0 * one.f()[0]).abs() < 1e-15);
    }

    #[test]
    fn laminar_coefficient_override() {
        let air = FixedAir::default();
        let state = ThermoState::reference(&air);
        let element = PowerLaw::new("crack", 0.001, 0.65, &air).with_laminar_coefficient(0.002);
        let base = PowerLaw::new("crack", 0.001, 0.65, &air);
        let c = element.linearize(1.0, &state, &state);
        let c0 = base.linearize(1.0, &state, &state);
        assert!((c - 2.0 * c0).abs() < 1e-12 * c);
        assert_eq!(element.coefficient(), 0.001);
    }
}
