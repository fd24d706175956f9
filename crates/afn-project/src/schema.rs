//! Network file schema.

use std::collections::BTreeMap;

use afn_elements::DEFAULT_EXPONENT;
use afn_props::PropertyModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkFile {
    #[serde(default)]
    pub properties: PropertyModel,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub links: Vec<LinkDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contaminants: Vec<ContaminantDef>,
}

/// A value with its unit, e.g. `{ value: 68, unit: F }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantityDef {
    pub value: f64,
    pub unit: String,
}

/// Thermodynamic state; missing fields take the reference values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<QuantityDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<QuantityDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub id: String,
    #[serde(flatten)]
    pub kind: ElementKindDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKindDef {
    PowerLaw {
        coefficient: f64,
        #[serde(default = "default_exponent")]
        exponent: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        laminar_coefficient: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<StateDef>,
    },
    Duct {
        length: f64,
        diameter: f64,
        roughness: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        losses: Option<DuctLossesDef>,
    },
    SimpleOpening {
        height: f64,
        width: f64,
        discharge_coefficient: f64,
        #[serde(default = "default_min_density_difference")]
        min_density_difference: f64,
        coefficient: f64,
        #[serde(default = "default_exponent")]
        exponent: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<StateDef>,
    },
    ContamXPowerLaw {
        coefficient: f64,
        #[serde(default = "default_exponent")]
        exponent: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        laminar_coefficient: Option<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuctLossesDef {
    pub laminar_dynamic: f64,
    pub laminar_friction: f64,
    pub turbulent_dynamic: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    /// `simulated`, `fixed` or `calculated`.
    #[serde(default = "default_pressure_handling")]
    pub pressure_handling: String,
    #[serde(default)]
    pub height: f64,
    /// Gauge pressure [Pa].
    #[serde(default)]
    pub pressure: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkEndDef {
    pub node: String,
    /// Height of the link relative to the node [m].
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkDef {
    pub id: String,
    pub element: String,
    pub nodes: [LinkEndDef; 2],
    #[serde(default = "default_one")]
    pub multiplier: f64,
    #[serde(default = "default_one")]
    pub control: f64,
    #[serde(default)]
    pub added_pressure: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterDef {
    pub link: String,
    pub contaminant: String,
    pub efficiency: f64,
    #[serde(default = "default_one")]
    pub control: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContaminantDef {
    pub id: String,
    /// Concentration of nodes not listed in `initial`.
    #[serde(default)]
    pub default: f64,
    #[serde(default)]
    pub initial: BTreeMap<String, f64>,
}

/// One entry of a flow-results file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowResultDef {
    pub time: i64,
    #[serde(default)]
    pub flows: Vec<LinkFlowDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkFlowDef {
    pub link: String,
    pub flow: f64,
}

fn default_exponent() -> f64 {
    DEFAULT_EXPONENT
}

fn default_min_density_difference() -> f64 {
    1.0e-4
}

fn default_pressure_handling() -> String {
    "simulated".to_string()
}

fn default_volume() -> f64 {
    1.0
}

fn default_one() -> f64 {
    1.0
}
