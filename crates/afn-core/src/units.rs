// afn-core/src/units.rs

use crate::error::{AfnError, AfnResult};
use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};

pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

/// Absolute temperature in K for a temperature in °C.
#[inline]
pub fn to_kelvin(t_celsius: f64) -> f64 {
    t_celsius + constants::KELVIN_OFFSET
}

/// Convert a loader temperature into °C.
///
/// Accepted units: `C`, `K`, `F`, `R` (case-insensitive, with or without a degree sign).
pub fn temperature_to_celsius(value: f64, unit: &str) -> AfnResult<f64> {
    use uom::si::thermodynamic_temperature::{
        degree_celsius, degree_fahrenheit, degree_rankine, kelvin,
    };

    let t = match normalize(unit).as_str() {
        "c" | "degc" | "celsius" => Temperature::new::<degree_celsius>(value),
        "k" | "kelvin" => Temperature::new::<kelvin>(value),
        "f" | "degf" | "fahrenheit" => Temperature::new::<degree_fahrenheit>(value),
        "r" | "degr" | "rankine" => Temperature::new::<degree_rankine>(value),
        _ => {
            return Err(AfnError::UnknownUnit {
                quantity: "temperature",
                unit: unit.to_string(),
            });
        }
    };
    Ok(t.get::<degree_celsius>())
}

/// Convert a loader pressure into Pa.
///
/// Accepted units: `Pa`, `kPa`, `hPa`, `bar`, `atm`, `psi`.
pub fn pressure_to_pascal(value: f64, unit: &str) -> AfnResult<f64> {
    use uom::si::pressure::{
        atmosphere, bar, hectopascal, kilopascal, pascal, pound_force_per_square_inch,
    };

    let p = match normalize(unit).as_str() {
        "pa" => Pressure::new::<pascal>(value),
        "kpa" => Pressure::new::<kilopascal>(value),
        "hpa" => Pressure::new::<hectopascal>(value),
        "bar" => Pressure::new::<bar>(value),
        "atm" => Pressure::new::<atmosphere>(value),
        "psi" => Pressure::new::<pound_force_per_square_inch>(value),
        _ => {
            return Err(AfnError::UnknownUnit {
                quantity: "pressure",
                unit: unit.to_string(),
            });
        }
    };
    Ok(p.get::<pascal>())
}

fn normalize(unit: &str) -> String {
    unit.trim()
        .trim_start_matches('°')
        .to_ascii_lowercase()
        .replace(' ', "")
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    pub const KELVIN_OFFSET: f64 = 273.15;

    /// Building-physics reference state: 20 °C, 101325 Pa, dry air.
    pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;
    pub const REFERENCE_PRESSURE_PA: f64 = 101_325.0;
    pub const REFERENCE_HUMIDITY_RATIO: f64 = 0.0;
}
