//! Conversion of a parsed network file into a validated `Network`.

use std::collections::HashSet;

use afn_core::{pressure_to_pascal, temperature_to_celsius};
use afn_elements::{
    ContamXPowerLaw, Duct, Element, ElementResult, PowerLaw, ReferenceConditions, SimpleOpening,
};
use afn_graph::{FlowResult, GraphError, LinkSpec, LoadReport, Network, NetworkBuilder, NodeKind, NodeSpec};
use afn_props::AirProperties;
use afn_transport::{Filter, LinkFilters};

use crate::ProjectResult;
use crate::schema::{ElementDef, ElementKindDef, FlowResultDef, LinkFlowDef, NetworkFile, NodeDef, StateDef};

/// Initial concentrations of one contaminant, indexed by node index.
#[derive(Debug, Clone, PartialEq)]
pub struct Contaminant {
    pub name: String,
    pub initial: Vec<f64>,
}

/// Everything a network file describes, resolved against the built network.
#[derive(Debug)]
pub struct Project {
    pub network: Network,
    pub filters: LinkFilters,
    pub contaminants: Vec<Contaminant>,
}

impl Project {
    pub fn contaminant(&self, name: &str) -> Option<&Contaminant> {
        self.contaminants.iter().find(|c| c.name == name)
    }
}

/// Read a temperature/pressure/humidity triple, reporting bad units.
fn convert_state(def: Option<&StateDef>, owner: &str, report: &mut LoadReport) -> ReferenceConditions {
    let mut conditions = ReferenceConditions::default();
    let Some(def) = def else {
        return conditions;
    };
    if let Some(t) = &def.temperature {
        match temperature_to_celsius(t.value, &t.unit) {
            Ok(v) => conditions.temperature = v,
            Err(e) => report.error(format!("{owner}: {e}")),
        }
    }
    if let Some(p) = &def.pressure {
        match pressure_to_pascal(p.value, &p.unit) {
            Ok(v) => conditions.pressure = v,
            Err(e) => report.error(format!("{owner}: {e}")),
        }
    }
    if let Some(w) = def.humidity_ratio {
        conditions.humidity_ratio = w;
    }
    conditions
}

fn convert_element(def: &ElementDef, props: &dyn AirProperties, report: &mut LoadReport) -> Option<Element> {
    let owner = format!("Element \"{}\"", def.id);
    let id = def.id.clone();
    let built: ElementResult<Element> = match &def.kind {
        ElementKindDef::PowerLaw {
            coefficient,
            exponent,
            laminar_coefficient,
            reference,
        } => {
            let reference = convert_state(reference.as_ref(), &owner, report);
            let crack = PowerLaw::with_reference(id, *coefficient, *exponent, reference, props);
            Ok(match laminar_coefficient {
                Some(cl) => crack.with_laminar_coefficient(*cl),
                None => crack,
            }
            .into())
        }
        ElementKindDef::Duct {
            length,
            diameter,
            roughness,
            losses,
        } => Duct::new(id, *length, *diameter, *roughness).map(|duct| {
            match losses {
                Some(l) => duct.with_loss_coefficients(l.laminar_dynamic, l.laminar_friction, l.turbulent_dynamic),
                None => duct,
            }
            .into()
        }),
        ElementKindDef::SimpleOpening {
            height,
            width,
            discharge_coefficient,
            min_density_difference,
            coefficient,
            exponent,
            reference,
        } => {
            let reference = convert_state(reference.as_ref(), &owner, report);
            SimpleOpening::new(
                id,
                *height,
                *width,
                *discharge_coefficient,
                *min_density_difference,
                *coefficient,
                *exponent,
                reference,
                props,
            )
            .map(Element::from)
        }
        ElementKindDef::ContamXPowerLaw {
            coefficient,
            exponent,
            laminar_coefficient,
        } => {
            let element = ContamXPowerLaw::new(id, *coefficient, *exponent, props);
            Ok(match laminar_coefficient {
                Some(cl) => element.with_laminar_coefficient(*cl),
                None => element,
            }
            .into())
        }
    };
    match built {
        Ok(element) => Some(element),
        Err(e) => {
            report.error(format!("{owner}: {e}"));
            None
        }
    }
}

fn convert_node(def: &NodeDef, report: &mut LoadReport) -> NodeSpec {
    let kind = NodeKind::parse(&def.pressure_handling).unwrap_or_else(|| {
        report.warning(format!(
            "Node \"{}\" has unknown pressure handling \"{}\", using simulated",
            def.id, def.pressure_handling
        ));
        NodeKind::Simulated
    });
    let state = convert_state(def.state.as_ref(), &format!("Node \"{}\"", def.id), report);
    NodeSpec::new(def.id.clone(), kind)
        .height(def.height)
        .pressure(def.pressure)
        .volume(def.volume)
        .temperature(state.temperature)
        .barometric_pressure(state.pressure)
        .humidity_ratio(state.humidity_ratio)
}

/// Build the network, filters and contaminants of a parsed file.
///
/// Every problem found is returned together in a `GraphError::Load` report.
pub fn build_project(file: &NetworkFile) -> ProjectResult<Project> {
    let mut builder = NetworkBuilder::new(file.properties);

    let props = file.properties;
    for def in &file.elements {
        if let Some(element) = convert_element(def, &props, builder.report_mut()) {
            builder.add_element(element);
        }
    }
    for def in &file.nodes {
        let spec = convert_node(def, builder.report_mut());
        builder.add_node(spec);
    }
    for def in &file.links {
        let [end0, end1] = &def.nodes;
        builder.add_link(
            LinkSpec::new(def.id.clone(), def.element.clone(), end0.node.clone(), end1.node.clone())
                .heights(end0.height, end1.height)
                .multiplier(def.multiplier)
                .control(def.control)
                .added_pressure(def.added_pressure),
        );
    }

    let link_names: HashSet<&str> = file.links.iter().map(|l| l.id.as_str()).collect();
    let node_names: HashSet<&str> = file.nodes.iter().map(|n| n.id.as_str()).collect();
    let report = builder.report_mut();

    let mut pending_filters = Vec::new();
    for (count, def) in file.filters.iter().enumerate() {
        if !link_names.contains(def.link.as_str()) {
            report.error(format!(
                "Filter #{} references nonexistent link \"{}\"",
                count + 1,
                def.link
            ));
            continue;
        }
        match Filter::with_control(def.efficiency, def.control) {
            Ok(filter) => pending_filters.push((def.link.as_str(), def.contaminant.as_str(), filter)),
            Err(e) => report.error(format!("Filter #{} on link \"{}\": {e}", count + 1, def.link)),
        }
    }
    for def in &file.contaminants {
        for node in def.initial.keys() {
            if !node_names.contains(node.as_str()) {
                report.error(format!(
                    "Contaminant \"{}\" sets nonexistent node \"{node}\"",
                    def.id
                ));
            }
        }
    }

    let network = builder.build()?;

    let mut filters = LinkFilters::new();
    for (link, contaminant, filter) in pending_filters {
        filters.attach(network.link_id(link)?, contaminant, filter);
    }
    let mut contaminants = Vec::with_capacity(file.contaminants.len());
    for def in &file.contaminants {
        let mut initial = vec![def.default; network.nodes().len()];
        for (node, value) in &def.initial {
            initial[network.node_id(node)?.index()] = *value;
        }
        contaminants.push(Contaminant {
            name: def.id.clone(),
            initial,
        });
    }

    Ok(Project {
        network,
        filters,
        contaminants,
    })
}

/// Resolve parsed flow results against a network, batching unknown links.
pub fn resolve_flow_results(defs: &[FlowResultDef], network: &Network) -> ProjectResult<Vec<FlowResult>> {
    let mut report = LoadReport::default();
    let results = defs
        .iter()
        .map(|def| {
            FlowResult::from_named(
                network,
                def.time,
                def.flows.iter().map(|f| (f.link.as_str(), f.flow)),
                &mut report,
            )
        })
        .collect();
    if report.has_errors() {
        return Err(GraphError::Load(report).into());
    }
    Ok(results)
}

/// Snapshot of the network's current link flows.
pub fn flow_result_def(network: &Network, time: i64) -> FlowResultDef {
    FlowResultDef {
        time,
        flows: network
            .links()
            .iter()
            .map(|link| LinkFlowDef {
                link: link.name().to_string(),
                flow: link.flow,
            })
            .collect(),
    }
}
