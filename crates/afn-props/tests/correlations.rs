//! Property correlations over the building-physics range.

use afn_props::{AirProperties, PropertyModel, ThermoState};
use proptest::prelude::*;

const MODELS: [PropertyModel; 4] = [
    PropertyModel::EnergyPlus,
    PropertyModel::Airnet,
    PropertyModel::Contam,
    PropertyModel::Fixed,
];

#[test]
fn reference_densities_agree_closely() {
    for model in MODELS {
        let rho = model.reference_density();
        assert!((rho - 1.2041).abs() < 5e-3, "{}: {}", model.name(), rho);
    }
}

#[test]
fn serde_names_are_snake_case() {
    let model: PropertyModel = from_name("energy_plus");
    assert_eq!(model, PropertyModel::EnergyPlus);
}

fn from_name(name: &str) -> PropertyModel {
    use serde::Deserialize;
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error, StrDeserializer};
    let de: StrDeserializer<'_, Error> = name.into_deserializer();
    PropertyModel::deserialize(de).unwrap()
}

proptest! {
    #[test]
    fn density_positive_and_decreasing_in_temperature(
        p in 80_000.0f64..120_000.0,
        t in -30.0f64..50.0,
        w in 0.0f64..0.03,
    ) {
        for model in MODELS {
            let cold = model.density(p, t, w);
            let warm = model.density(p, t + 5.0, w);
            prop_assert!(cold > 0.0);
            prop_assert!(warm <= cold);
        }
    }

    #[test]
    fn state_cache_matches_direct_evaluation(
        p in 80_000.0f64..120_000.0,
        t in -30.0f64..50.0,
    ) {
        for model in MODELS {
            let state = ThermoState::new(&model, p, t, 0.005);
            prop_assert_eq!(state.density(), model.density(p, t, 0.005));
            prop_assert_eq!(state.viscosity(), model.viscosity(t));
        }
    }
}
