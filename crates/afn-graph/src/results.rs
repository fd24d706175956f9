//! Recorded link flows for playback.

use afn_core::LinkId;

use crate::error::LoadReport;
use crate::graph::Network;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkFlow {
    pub link: LinkId,
    pub flow: f64,
}

/// Link flows at one instant, e.g. read back from a reference simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowResult {
    /// Seconds since the start of the run.
    pub time: i64,
    pub flows: Vec<LinkFlow>,
}

impl FlowResult {
    /// Resolve `(link name, flow)` pairs against a network.
    ///
    /// Unknown links are collected into the report instead of failing early.
    pub fn from_named<'a>(
        network: &Network,
        time: i64,
        named: impl IntoIterator<Item = (&'a str, f64)>,
        report: &mut LoadReport,
    ) -> Self {
        let mut flows = Vec::new();
        for (count, (name, flow)) in named.into_iter().enumerate() {
            match network.link_id(name) {
                Ok(link) => flows.push(LinkFlow { link, flow }),
                Err(_) => report.error(format!(
                    "FlowResult at t={time}, flow #{} is linked to nonexistent link \"{name}\"",
                    count + 1
                )),
            }
        }
        Self { time, flows }
    }

    /// Overwrite the stored link flows with the recorded ones.
    ///
    /// Recorded flows are taken in each link's stored orientation, node0 to
    /// node1. A link whose ends the builder swapped keeps the recorded sign,
    /// so results saved from a network replay unchanged onto it.
    pub fn apply(&self, network: &mut Network) {
        for entry in &self.flows {
            network.link_mut(entry.link).set_flow(entry.flow);
        }
    }
}
