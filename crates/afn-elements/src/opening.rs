//! Two-way (large) opening such as a doorway or window.

use crate::common::{CrackTerm, ReferenceConditions, validate_coefficient};
use crate::error::{ElementResult, positive};
use crate::traits::{FlowElement, Flows};
use afn_core::constants::G0_MPS2;
use afn_props::{AirProperties, ThermoState};
use std::f64::consts::SQRT_2;

/// Rectangular opening with buoyancy-driven two-way flow.
///
/// Closed (`control == 0`) it leaks like a crack along its perimeter. Open, it
/// either carries one-way flow or, when the neutral plane lies within the
/// opening, a pair of counter-flowing streams.
#[derive(Clone, Debug)]
pub struct SimpleOpening {
    name: String,
    perimeter: CrackTerm,
    height: f64,
    width: f64,
    discharge_coefficient: f64,
    min_density_difference: f64,
}

impl SimpleOpening {
    /// `coefficient`/`exponent` describe the closed-opening crack per metre of perimeter.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        height: f64,
        width: f64,
        discharge_coefficient: f64,
        min_density_difference: f64,
        coefficient: f64,
        exponent: f64,
        reference: ReferenceConditions,
        props: &dyn AirProperties,
    ) -> ElementResult<Self> {
        let height = positive(height, "opening height")?;
        let width = positive(width, "opening width")?;
        let crack = CrackTerm::new(coefficient, exponent, reference, props);
        Ok(Self {
            name: name.into(),
            perimeter: crack.scaled(2.0 * (width + height)),
            height,
            width,
            discharge_coefficient: validate_coefficient(discharge_coefficient),
            min_density_difference: min_density_difference.abs(),
        })
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn discharge_coefficient(&self) -> f64 {
        self.discharge_coefficient
    }

    pub fn min_density_difference(&self) -> f64 {
        self.min_density_difference
    }

    /// Perimeter crack used while closed.
    pub fn perimeter_crack(&self) -> &CrackTerm {
        &self.perimeter
    }
}

impl FlowElement for SimpleOpening {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(
        &self,
        laminar: bool,
        pdrop: f64,
        multiplier: f64,
        control: f64,
        n: &ThermoState,
        m: &ThermoState,
    ) -> Flows {
        if control <= 0.0 {
            return self.perimeter.flow(laminar, pdrop, multiplier, n, m);
        }

        let width = self.width * control * multiplier;
        let height = self.height;
        let drho = n.density() - m.density();
        let gdrho = G0_MPS2 * drho;

        // A zero difference has no neutral plane even with a zero threshold.
        if laminar || drho == 0.0 || drho.abs() < self.min_density_difference {
            let dp_mid = pdrop - 0.5 * height * gdrho;
            return self.perimeter.flow(laminar, dp_mid, multiplier, n, m);
        }

        // Neutral plane height above the bottom of the opening.
        let y = pdrop / gdrho;
        let c = SQRT_2 * width * self.discharge_coefficient;
        let df0 = c * pdrop.abs().sqrt() / gdrho.abs();
        let f0 = (2.0 / 3.0) * c * (gdrho * y).abs().sqrt() * y.abs();
        let dfh = c * ((height - y) / gdrho).abs().sqrt();
        let fh = (2.0 / 3.0) * dfh * (gdrho * (height - y)).abs();

        let (sn, sm) = (n.sqrt_density(), m.sqrt_density());
        let one_way = |forward: bool| {
            if forward {
                Flows::one(sn * (fh - f0).abs(), sn * (dfh - df0).abs())
            } else {
                Flows::one(-sm * (fh - f0).abs(), sm * (dfh - df0).abs())
            }
        };

        if y <= 0.0 {
            one_way(drho < 0.0)
        } else if y >= height {
            one_way(drho >= 0.0)
        } else if drho >= 0.0 {
            Flows::two(-sm * fh, sm * dfh, sn * f0, sn * df0)
        } else {
            Flows::two(sn * fh, sn * dfh, -sm * f0, sm * df0)
        }
    }

    fn linearize(&self, multiplier: f64, n: &ThermoState, m: &ThermoState) -> f64 {
        self.perimeter.linear_coefficient(multiplier, n, m)
    }
}
