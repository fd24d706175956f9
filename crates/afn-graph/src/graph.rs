//! Core network data structures.

use std::collections::HashMap;

use afn_core::{ElementId, LinkId, NodeId};
use afn_elements::{Element, Flows};
use afn_props::{AirProperties, ThermoState};

use crate::error::{GraphError, GraphResult};

/// How a node's pressure is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// Pressure is an unknown of the network solve.
    Simulated,
    /// Pressure is a boundary condition.
    Fixed,
    /// Pressure is set externally (e.g. from another model).
    Calculated,
}

impl NodeKind {
    /// Parse a pressure-handling tag, case-insensitively.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "simulated" => Some(NodeKind::Simulated),
            "fixed" => Some(NodeKind::Fixed),
            "calculated" => Some(NodeKind::Calculated),
            _ => None,
        }
    }
}

/// A zone. Its arena position is also its solver index.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) height: f64,
    /// Gauge pressure [Pa]; the solve unknown for simulated nodes.
    pub pressure: f64,
    /// Air volume [m³].
    pub volume: f64,
    pub(crate) state: ThermoState,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.id.index()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// True iff the node's pressure is an unknown of the linear system.
    pub fn is_variable(&self) -> bool {
        self.kind == NodeKind::Simulated
    }

    /// Height of the zone reference point [m].
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn state(&self) -> &ThermoState {
        &self.state
    }
}

/// A flow path between two nodes through one element.
///
/// Topology is fixed at build time with `node0.index() < node1.index()`;
/// only the pressure and flow fields change afterwards.
#[derive(Debug, Clone)]
pub struct Link {
    pub(crate) id: LinkId,
    pub(crate) name: String,
    pub(crate) node0: NodeId,
    pub(crate) node1: NodeId,
    pub(crate) element: ElementId,
    pub(crate) height0: f64,
    pub(crate) height1: f64,
    pub(crate) skyline_index: Option<usize>,
    pub multiplier: f64,
    /// Opening signal, 0 is closed.
    pub control: f64,
    /// Externally imposed pressure rise from node0 to node1 [Pa] (fans, wind).
    pub added_pressure: f64,
    /// Buoyancy pressure [Pa], refreshed once per solve.
    pub stack_pressure: f64,
    /// Pressure drop used for the last flow evaluation [Pa].
    pub delta_p: f64,
    /// Net flow node0 -> node1 [kg/s].
    pub flow: f64,
    /// Flow in the node0 -> node1 direction [kg/s].
    pub flow0: f64,
    /// Flow in the node1 -> node0 direction [kg/s].
    pub flow1: f64,
    /// Number of flow components of the last evaluation.
    pub nf: usize,
}

impl Link {
    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node0(&self) -> NodeId {
        self.node0
    }

    pub fn node1(&self) -> NodeId {
        self.node1
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Height of the link relative to node0 [m].
    pub fn height0(&self) -> f64 {
        self.height0
    }

    /// Height of the link relative to node1 [m].
    pub fn height1(&self) -> f64 {
        self.height1
    }

    /// Packed upper-triangle index of the (node0, node1) Jacobian entry.
    pub fn skyline_index(&self) -> Option<usize> {
        self.skyline_index
    }

    pub fn set_skyline_index(&mut self, index: Option<usize>) {
        self.skyline_index = index;
    }

    /// Store an element evaluation.
    pub fn record(&mut self, flows: &Flows) {
        self.nf = flows.count();
        self.flow0 = flows.f().iter().filter(|f| **f > 0.0).sum();
        self.flow1 = -flows.f().iter().filter(|f| **f < 0.0).sum::<f64>();
        self.flow = self.flow0 - self.flow1;
    }

    /// Overwrite the flow with a single known value.
    pub fn set_flow(&mut self, flow: f64) {
        self.nf = 1;
        self.flow = flow;
        self.flow0 = flow.max(0.0);
        self.flow1 = (-flow).max(0.0);
    }
}

/// Mutable view of the arenas, split so that links and nodes can be updated
/// while elements and properties are read.
pub struct NetworkParts<'a> {
    pub props: &'a dyn AirProperties,
    pub nodes: &'a mut [Node],
    pub links: &'a mut [Link],
    pub elements: &'a [Element],
}

/// A validated airflow network.
///
/// Nodes, links and elements live in append-only arenas addressed by `Id`.
/// Simulated nodes occupy indices `0..variable_count()`.
pub struct Network {
    pub(crate) props: Box<dyn AirProperties>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,
    pub(crate) elements: Vec<Element>,
    pub(crate) node_lookup: HashMap<String, NodeId>,
    pub(crate) link_lookup: HashMap<String, LinkId>,
    pub(crate) variable_count: usize,
    pub(crate) warnings: Vec<String>,
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("props", &self.props.name())
            .field("nodes", &self.nodes.len())
            .field("links", &self.links.len())
            .field("elements", &self.elements.len())
            .finish()
    }
}

impl Network {
    pub fn props(&self) -> &dyn AirProperties {
        self.props.as_ref()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [Link] {
        &mut self.links
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.index()]
    }

    pub fn link_mut(&mut self, id: LinkId) -> &mut Link {
        &mut self.links[id.index()]
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn node_id(&self, name: &str) -> GraphResult<NodeId> {
        self.node_lookup
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode {
                name: name.to_string(),
            })
    }

    pub fn link_id(&self, name: &str) -> GraphResult<LinkId> {
        self.link_lookup
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownLink {
                name: name.to_string(),
            })
    }

    /// Gauge pressure of the named node.
    pub fn pressure(&self, name: &str) -> GraphResult<f64> {
        Ok(self.node(self.node_id(name)?).pressure)
    }

    /// Net flow of the named link.
    pub fn flow(&self, name: &str) -> GraphResult<f64> {
        Ok(self.link(self.link_id(name)?).flow)
    }

    /// Number of simulated nodes, i.e. the size of the linear system.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Warnings produced while the network was built.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Update a node's temperature and humidity ratio, keeping its barometric pressure.
    pub fn set_node_conditions(&mut self, id: NodeId, temperature: f64, humidity_ratio: f64) {
        let props = self.props.as_ref();
        let node = &mut self.nodes[id.index()];
        let pressure = node.state.pressure();
        node.state.update(props, pressure, temperature, humidity_ratio);
    }

    pub fn parts_mut(&mut self) -> NetworkParts<'_> {
        NetworkParts {
            props: self.props.as_ref(),
            nodes: &mut self.nodes,
            links: &mut self.links,
            elements: &self.elements,
        }
    }
}
