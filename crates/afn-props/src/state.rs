//! Cached thermodynamic state of a zone.

use crate::model::AirProperties;
use afn_core::constants::{REFERENCE_HUMIDITY_RATIO, REFERENCE_PRESSURE_PA, REFERENCE_TEMPERATURE_C};

/// Pressure, temperature and humidity ratio of a zone, plus the derived
/// density, √density and viscosity.
///
/// The derived values are recomputed whenever an input changes, so the
/// fields are private and only reachable through the setters.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    pressure: f64,
    temperature: f64,
    humidity_ratio: f64,
    density: f64,
    sqrt_density: f64,
    viscosity: f64,
}

impl ThermoState {
    /// Absolute pressure [Pa], temperature [°C], humidity ratio [kg/kg].
    pub fn new(props: &dyn AirProperties, pressure: f64, temperature: f64, humidity_ratio: f64) -> Self {
        let mut state = Self {
            pressure,
            temperature,
            humidity_ratio,
            density: 0.0,
            sqrt_density: 0.0,
            viscosity: 0.0,
        };
        state.refresh(props);
        state
    }

    /// State at 20 °C, 101325 Pa, dry.
    pub fn reference(props: &dyn AirProperties) -> Self {
        Self::new(
            props,
            REFERENCE_PRESSURE_PA,
            REFERENCE_TEMPERATURE_C,
            REFERENCE_HUMIDITY_RATIO,
        )
    }

    fn refresh(&mut self, props: &dyn AirProperties) {
        self.density = props.density(self.pressure, self.temperature, self.humidity_ratio);
        self.sqrt_density = self.density.sqrt();
        self.viscosity = props.viscosity(self.temperature);
    }

    pub fn update(&mut self, props: &dyn AirProperties, pressure: f64, temperature: f64, humidity_ratio: f64) {
        self.pressure = pressure;
        self.temperature = temperature;
        self.humidity_ratio = humidity_ratio;
        self.refresh(props);
    }

    pub fn set_pressure(&mut self, props: &dyn AirProperties, pressure: f64) {
        self.pressure = pressure;
        self.refresh(props);
    }

    pub fn set_temperature(&mut self, props: &dyn AirProperties, temperature: f64) {
        self.temperature = temperature;
        self.refresh(props);
    }

    pub fn set_humidity_ratio(&mut self, props: &dyn AirProperties, humidity_ratio: f64) {
        self.humidity_ratio = humidity_ratio;
        self.refresh(props);
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity_ratio(&self) -> f64 {
        self.humidity_ratio
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn sqrt_density(&self) -> f64 {
        self.sqrt_density
    }

    pub fn viscosity(&self) -> f64 {
        self.viscosity
    }
}
