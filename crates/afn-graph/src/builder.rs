//! Incremental network builder.

use std::collections::HashMap;

use afn_core::constants::{REFERENCE_HUMIDITY_RATIO, REFERENCE_PRESSURE_PA, REFERENCE_TEMPERATURE_C};
use afn_core::{ElementId, LinkId, NodeId, ensure_finite};
use afn_elements::{Element, FlowElement};
use afn_props::{AirProperties, ThermoState};

use crate::error::{GraphError, GraphResult, LoadReport};
use crate::graph::{Link, Network, Node, NodeKind};
use crate::indexing::simulated_first_order;
use crate::validate::orient_link;

/// Node record as delivered by a loader.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    pub kind: NodeKind,
    pub height: f64,
    /// Gauge pressure [Pa].
    pub pressure: f64,
    pub volume: f64,
    /// Temperature [°C].
    pub temperature: f64,
    /// Absolute barometric pressure [Pa] used for the air state.
    pub barometric_pressure: f64,
    pub humidity_ratio: f64,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            height: 0.0,
            pressure: 0.0,
            volume: 1.0,
            temperature: REFERENCE_TEMPERATURE_C,
            barometric_pressure: REFERENCE_PRESSURE_PA,
            humidity_ratio: REFERENCE_HUMIDITY_RATIO,
        }
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn barometric_pressure(mut self, pressure: f64) -> Self {
        self.barometric_pressure = pressure;
        self
    }

    pub fn humidity_ratio(mut self, humidity_ratio: f64) -> Self {
        self.humidity_ratio = humidity_ratio;
        self
    }
}

/// Link record as delivered by a loader. Nodes and element are referenced by name.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    pub name: String,
    pub element: String,
    /// `(node name, height relative to that node)` for both ends.
    pub nodes: [(String, f64); 2],
    pub multiplier: f64,
    pub control: f64,
    pub added_pressure: f64,
}

impl LinkSpec {
    pub fn new(
        name: impl Into<String>,
        element: impl Into<String>,
        node0: impl Into<String>,
        node1: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            element: element.into(),
            nodes: [(node0.into(), 0.0), (node1.into(), 0.0)],
            multiplier: 1.0,
            control: 1.0,
            added_pressure: 0.0,
        }
    }

    pub fn heights(mut self, height0: f64, height1: f64) -> Self {
        self.nodes[0].1 = height0;
        self.nodes[1].1 = height1;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn control(mut self, control: f64) -> Self {
        self.control = control;
        self
    }

    pub fn added_pressure(mut self, added_pressure: f64) -> Self {
        self.added_pressure = added_pressure;
        self
    }
}

/// Builder collecting elements, nodes and links.
///
/// Nothing is validated until `build()`, which reports every problem in one
/// `LoadReport` rather than stopping at the first.
pub struct NetworkBuilder {
    props: Box<dyn AirProperties>,
    elements: Vec<Element>,
    nodes: Vec<NodeSpec>,
    links: Vec<LinkSpec>,
    report: LoadReport,
}

impl NetworkBuilder {
    pub fn new(props: impl AirProperties + 'static) -> Self {
        Self::with_boxed_properties(Box::new(props))
    }

    pub fn with_boxed_properties(props: Box<dyn AirProperties>) -> Self {
        Self {
            props,
            elements: Vec::new(),
            nodes: Vec::new(),
            links: Vec::new(),
            report: LoadReport::default(),
        }
    }

    /// Properties to construct elements with.
    pub fn props(&self) -> &dyn AirProperties {
        self.props.as_ref()
    }

    pub fn add_element(&mut self, element: impl Into<Element>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    pub fn add_node(&mut self, spec: NodeSpec) -> &mut Self {
        self.nodes.push(spec);
        self
    }

    pub fn add_link(&mut self, spec: LinkSpec) -> &mut Self {
        self.links.push(spec);
        self
    }

    /// Loaders record their own problems here so they are reported together.
    pub fn report_mut(&mut self) -> &mut LoadReport {
        &mut self.report
    }

    /// Validate and freeze the network.
    pub fn build(self) -> GraphResult<Network> {
        let NetworkBuilder {
            props,
            elements,
            nodes: node_specs,
            links: link_specs,
            mut report,
        } = self;

        let mut element_lookup = HashMap::new();
        for (i, element) in elements.iter().enumerate() {
            if element_lookup
                .insert(element.name().to_string(), ElementId::from_index(i))
                .is_some()
            {
                report.error(format!("Element \"{}\" is defined more than once", element.name()));
            }
        }

        let kinds: Vec<NodeKind> = node_specs.iter().map(|n| n.kind).collect();
        let order = simulated_first_order(&kinds);
        let mut nodes = Vec::with_capacity(node_specs.len());
        let mut node_lookup = HashMap::new();
        for (index, &old) in order.iter().enumerate() {
            let spec = &node_specs[old];
            let id = NodeId::from_index(index);
            if spec.name.is_empty() {
                report.error(format!("Node #{} does not have an ID", old + 1));
            } else if node_lookup.insert(spec.name.clone(), id).is_some() {
                report.error(format!("Node \"{}\" is defined more than once", spec.name));
            }
            for (what, value) in [
                ("height", spec.height),
                ("pressure", spec.pressure),
                ("temperature", spec.temperature),
            ] {
                if let Err(e) = ensure_finite(value, what) {
                    report.error(format!("Node \"{}\": {e}", spec.name));
                }
            }
            nodes.push(Node {
                id,
                name: spec.name.clone(),
                kind: spec.kind,
                height: spec.height,
                pressure: spec.pressure,
                volume: spec.volume,
                state: ThermoState::new(
                    props.as_ref(),
                    spec.barometric_pressure,
                    spec.temperature,
                    spec.humidity_ratio,
                ),
            });
        }
        let variable_count = nodes.iter().filter(|n| n.is_variable()).count();

        let mut links = Vec::with_capacity(link_specs.len());
        let mut link_lookup = HashMap::new();
        for (count, spec) in link_specs.into_iter().enumerate() {
            if spec.name.is_empty() {
                report.error(format!("Link #{} does not have an ID", count + 1));
                continue;
            }
            let id = LinkId::from_index(links.len());
            if link_lookup.insert(spec.name.clone(), id).is_some() {
                report.error(format!("Link \"{}\" is defined more than once", spec.name));
                continue;
            }

            let element = element_lookup.get(&spec.element).copied();
            if element.is_none() {
                report.error(format!(
                    "Link \"{}\" references nonexistent element \"{}\"",
                    spec.name, spec.element
                ));
            }
            let ends = spec.nodes.each_ref().map(|(node, _)| {
                let found = node_lookup.get(node).copied();
                if found.is_none() {
                    report.error(format!(
                        "Link \"{}\" references nonexistent node \"{}\"",
                        spec.name, node
                    ));
                }
                found
            });
            if spec.multiplier.is_nan() || spec.multiplier <= 0.0 {
                report.error(format!(
                    "Link \"{}\" has non-positive multiplier {}",
                    spec.name, spec.multiplier
                ));
            }

            let (Some(element), [Some(a), Some(b)]) = (element, ends) else {
                continue;
            };
            let (na, nb) = (&nodes[a.index()], &nodes[b.index()]);
            let Some((i, j, swapped)) = orient_link(
                &spec.name,
                [
                    (na.index(), na.kind, na.name.as_str()),
                    (nb.index(), nb.kind, nb.name.as_str()),
                ],
                &mut report,
            ) else {
                continue;
            };
            let (height0, height1) = if swapped {
                (spec.nodes[1].1, spec.nodes[0].1)
            } else {
                (spec.nodes[0].1, spec.nodes[1].1)
            };
            // Reversing the link reverses the sign of the imposed rise.
            let added_pressure = if swapped {
                -spec.added_pressure
            } else {
                spec.added_pressure
            };

            links.push(Link {
                id,
                name: spec.name,
                node0: NodeId::from_index(i),
                node1: NodeId::from_index(j),
                element,
                height0,
                height1,
                skyline_index: None,
                multiplier: spec.multiplier,
                control: spec.control,
                added_pressure,
                stack_pressure: 0.0,
                delta_p: 0.0,
                flow: 0.0,
                flow0: 0.0,
                flow1: 0.0,
                nf: 1,
            });
        }

        if report.has_errors() {
            return Err(GraphError::Load(report));
        }

        tracing::debug!(
            nodes = nodes.len(),
            simulated = variable_count,
            links = links.len(),
            "network built"
        );

        Ok(Network {
            props,
            nodes,
            links,
            elements,
            node_lookup,
            link_lookup,
            variable_count,
            warnings: report.warnings,
        })
    }
}
