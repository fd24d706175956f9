//! afn-props: moist-air property correlations for the airflow network.
//!
//! Provides:
//! - `AirProperties`, the density/viscosity strategy used by every element and node
//! - EnergyPlus, AIRNET, CONTAM and fixed-reference correlations
//! - `PropertyModel`, a serde-selectable wrapper over those correlations
//! - `ThermoState`, the cached per-node derived quantities
//!
//! All pressures are absolute Pa and temperatures are °C.
//!
//! # Example
//!
//! ```
//! use afn_props::{AirProperties, PropertyModel, ThermoState};
//!
//! let model = PropertyModel::Airnet;
//! let state = ThermoState::new(&model, 101_325.0, 20.0, 0.0);
//! assert!((state.density() - model.density(101_325.0, 20.0, 0.0)).abs() < 1e-12);
//! ```

pub mod model;
pub mod state;

pub use model::{AirProperties, AirnetAir, ContamAir, EnergyPlusAir, FixedAir, PropertyModel};
pub use state::ThermoState;
