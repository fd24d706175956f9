//! Air property strategies.

use afn_core::constants::{REFERENCE_HUMIDITY_RATIO, REFERENCE_PRESSURE_PA, REFERENCE_TEMPERATURE_C};
use afn_core::to_kelvin;
use serde::{Deserialize, Serialize};

/// Density and viscosity correlations for air.
///
/// Implementations must be pure and total over physical inputs. They are shared
/// between nodes and elements, hence `Send + Sync`.
pub trait AirProperties: Send + Sync {
    /// Correlation name for diagnostics.
    fn name(&self) -> &str;

    /// Density [kg/m³] at absolute pressure `p` [Pa], temperature `t` [°C] and humidity ratio `w` [kg/kg].
    fn density(&self, p: f64, t: f64, w: f64) -> f64;

    /// Dynamic viscosity [Pa·s] at temperature `t` [°C].
    fn viscosity(&self, t: f64) -> f64;

    /// Density at the reference state.
    fn reference_density(&self) -> f64 {
        self.density(
            REFERENCE_PRESSURE_PA,
            REFERENCE_TEMPERATURE_C,
            REFERENCE_HUMIDITY_RATIO,
        )
    }

    /// Viscosity at the reference state.
    fn reference_viscosity(&self) -> f64 {
        self.viscosity(REFERENCE_TEMPERATURE_C)
    }
}

/// Linear fit shared by the EnergyPlus and AIRNET correlations.
fn linear_viscosity(t: f64) -> f64 {
    1.71432e-5 + 4.828e-8 * t
}

/// EnergyPlus moist-air ideal gas.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnergyPlusAir;

impl AirProperties for EnergyPlusAir {
    fn name(&self) -> &str {
        "EnergyPlus"
    }

    fn density(&self, p: f64, t: f64, w: f64) -> f64 {
        p / (287.0 * to_kelvin(t) * (1.0 + 1.607_768_7 * w.max(1.0e-5)))
    }

    fn viscosity(&self, t: f64) -> f64 {
        linear_viscosity(t)
    }
}

/// AIRNET dry-air correlation.
#[derive(Clone, Copy, Debug, Default)]
pub struct AirnetAir;

impl AirProperties for AirnetAir {
    fn name(&self) -> &str {
        "AIRNET"
    }

    fn density(&self, p: f64, t: f64, _w: f64) -> f64 {
        0.003_483_8 * p / to_kelvin(t)
    }

    fn viscosity(&self, t: f64) -> f64 {
        linear_viscosity(t)
    }
}

/// CONTAM dry-air ideal gas.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContamAir;

impl AirProperties for ContamAir {
    fn name(&self) -> &str {
        "CONTAM"
    }

    fn density(&self, p: f64, t: f64, _w: f64) -> f64 {
        p / (287.055 * to_kelvin(t))
    }

    fn viscosity(&self, t: f64) -> f64 {
        3.7143e-6 + 4.9286e-8 * t
    }
}

/// Constant properties, independent of state.
#[derive(Clone, Copy, Debug)]
pub struct FixedAir {
    pub density: f64,
    pub viscosity: f64,
}

impl FixedAir {
    /// Dry air at 20 °C and 101325 Pa.
    pub const STANDARD: FixedAir = FixedAir {
        density: 1.2041,
        viscosity: 1.81625e-5,
    };
}

impl Default for FixedAir {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl AirProperties for FixedAir {
    fn name(&self) -> &str {
        "Fixed"
    }

    fn density(&self, _p: f64, _t: f64, _w: f64) -> f64 {
        self.density
    }

    fn viscosity(&self, _t: f64) -> f64 {
        self.viscosity
    }
}

/// Runtime choice of correlation, as named in network files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyModel {
    EnergyPlus,
    #[default]
    Airnet,
    Contam,
    Fixed,
}

impl PropertyModel {
    fn strategy(&self) -> &dyn AirProperties {
        match self {
            PropertyModel::EnergyPlus => &EnergyPlusAir,
            PropertyModel::Airnet => &AirnetAir,
            PropertyModel::Contam => &ContamAir,
            PropertyModel::Fixed => &FixedAir::STANDARD,
        }
    }
}

impl AirProperties for PropertyModel {
    fn name(&self) -> &str {
        self.strategy().name()
    }

    fn density(&self, p: f64, t: f64, w: f64) -> f64 {
        self.strategy().density(p, t, w)
    }

    fn viscosity(&self, t: f64) -> f64 {
        self.strategy().viscosity(t)
    }
}
