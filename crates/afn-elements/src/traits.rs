//! The element contract.

use afn_props::ThermoState;

/// One or two flow components with their pressure derivatives.
///
/// Bidirectional elements (openings with a neutral plane inside the opening)
/// return two components; everything else returns one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flows {
    count: usize,
    f: [f64; 2],
    df: [f64; 2],
}

impl Flows {
    pub fn one(f: f64, df: f64) -> Self {
        Self {
            count: 1,
            f: [f, 0.0],
            df: [df, 0.0],
        }
    }

    pub fn two(f0: f64, df0: f64, f1: f64, df1: f64) -> Self {
        Self {
            count: 2,
            f: [f0, f1],
            df: [df0, df1],
        }
    }

    /// Number of flow components (1 or 2).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flow rates [kg/s], positive from node0 to node1.
    pub fn f(&self) -> &[f64] {
        &self.f[..self.count]
    }

    /// Partial derivatives dF/dP [kg/(s·Pa)].
    pub fn df(&self) -> &[f64] {
        &self.df[..self.count]
    }

    /// Iterate `(F, dF/dP)` pairs.
    pub fn components(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.f().iter().copied().zip(self.df().iter().copied())
    }

    /// Net flow across all components.
    pub fn total(&self) -> f64 {
        self.f().iter().sum()
    }

    pub(crate) fn scaled(self, k: f64) -> Self {
        Self {
            count: self.count,
            f: [self.f[0] * k, self.f[1] * k],
            df: [self.df[0] * k, self.df[1] * k],
        }
    }
}

/// Constitutive law of a link.
///
/// Elements are immutable once built and shared between links, hence `Send + Sync`.
pub trait FlowElement: Send + Sync {
    /// Element name for diagnostics.
    fn name(&self) -> &str;

    /// Flow through the element for pressure drop `pdrop = p(node0) - p(node1)` [Pa].
    ///
    /// # Arguments
    /// * `laminar` - force the linear (laminar) branch
    /// * `multiplier` - number of identical elements in parallel
    /// * `control` - opening signal, 0 is closed
    /// * `n`, `m` - states of node0 and node1
    fn calculate(
        &self,
        laminar: bool,
        pdrop: f64,
        multiplier: f64,
        control: f64,
        n: &ThermoState,
        m: &ThermoState,
    ) -> Flows;

    /// Zero-pressure-drop flow coefficient [kg/(s·Pa)] for the linear pre-solve.
    ///
    /// Uses properties averaged between the two states.
    fn linearize(&self, multiplier: f64, n: &ThermoState, m: &ThermoState) -> f64;
}
