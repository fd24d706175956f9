//! afn-elements: constitutive flow laws for airflow network links.
//!
//! Provides:
//! - Power-law cracks (`PowerLaw`) and the volumetric variant (`ContamXPowerLaw`)
//! - Ducts with an iterative friction factor (`Duct`)
//! - Two-way openings with a neutral plane (`SimpleOpening`)
//!
//! Every element implements `FlowElement`: given the pressure drop and the two
//! end states it returns one or two flow components and their derivatives.
//! `Element` is the closed sum type stored in the network.
//!
//! # Example
//!
//! ```
//! use afn_elements::{FlowElement, PowerLaw};
//! use afn_props::{FixedAir, ThermoState};
//!
//! let air = FixedAir::default();
//! let state = ThermoState::reference(&air);
//! let crack = PowerLaw::new("crack", 0.001, 0.65, &air);
//! let flows = crack.calculate(false, 10.0, 1.0, 1.0, &state, &state);
//! assert!((flows.f()[0] - 0.001 * 10.0_f64.powf(0.65)).abs() < 1e-12);
//! ```

pub mod common;
pub mod contamx;
pub mod duct;
pub mod element;
pub mod error;
pub mod opening;
pub mod powerlaw;
pub mod traits;

pub use common::{
    CrackTerm, DEFAULT_EXPONENT, ReferenceConditions, validate_coefficient, validate_exponent,
    validate_humidity_ratio, validate_pressure, validate_temperature,
};
pub use contamx::ContamXPowerLaw;
pub use duct::Duct;
pub use element::Element;
pub use error::{ElementError, ElementResult};
pub use opening::SimpleOpening;
pub use powerlaw::PowerLaw;
pub use traits::{FlowElement, Flows};
