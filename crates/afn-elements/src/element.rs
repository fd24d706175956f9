//! Closed set of element kinds stored in the network arena.

use crate::contamx::ContamXPowerLaw;
use crate::duct::Duct;
use crate::opening::SimpleOpening;
use crate::powerlaw::PowerLaw;
use crate::traits::{FlowElement, Flows};
use afn_props::ThermoState;

#[derive(Clone, Debug)]
pub enum Element {
    PowerLaw(PowerLaw),
    Duct(Duct),
    SimpleOpening(SimpleOpening),
    ContamXPowerLaw(ContamXPowerLaw),
}

impl Element {
    /// Short kind tag, as used in network files.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::PowerLaw(_) => "power_law",
            Element::Duct(_) => "duct",
            Element::SimpleOpening(_) => "simple_opening",
            Element::ContamXPowerLaw(_) => "contam_x_power_law",
        }
    }

    fn inner(&self) -> &dyn FlowElement {
        match self {
            Element::PowerLaw(e) => e,
            Element::Duct(e) => e,
            Element::SimpleOpening(e) => e,
            Element::ContamXPowerLaw(e) => e,
        }
    }
}

impl FlowElement for Element {
    fn name(&self) -> &str {
        self.inner().name()
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
        self.inner()
            .calculate(laminar, pdrop, multiplier, control, n, m)
    }

    fn linearize(&self, multiplier: f64, n: &ThermoState, m: &ThermoState) -> f64 {
        self.inner().linearize(multiplier, n, m)
    }
}

impl From<PowerLaw> for Element {
    fn from(e: PowerLaw) -> Self {
        Element::PowerLaw(e)
    }
}

impl From<Duct> for Element {
    fn from(e: Duct) -> Self {
        Element::Duct(e)
    }
}

impl From<SimpleOpening> for Element {
    fn from(e: SimpleOpening) -> Self {
        Element::SimpleOpening(e)
    }
}

impl From<ContamXPowerLaw> for Element {
    fn from(e: ContamXPowerLaw) -> Self {
        Element::ContamXPowerLaw(e)
    }
}
