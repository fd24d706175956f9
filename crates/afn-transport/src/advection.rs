//! Advection matrix assembled from a converged flow field.

use afn_graph::{Network, full_profile_heights};
use afn_solver::SkylineLu;
use tracing::debug;

use crate::error::TransportResult;
use crate::filter::LinkFilters;

/// Advection operator over every node of a network.
///
/// Entry `(i, j)` is the mass flow carrying node `j`'s concentration into
/// node `i`; diagonal entries hold the (negative) outflows.
#[derive(Debug, Clone)]
pub struct TransportSystem {
    matrix: SkylineLu,
}

impl TransportSystem {
    /// Allocate the profile spanning all nodes and links of `network`.
    pub fn new(network: &Network) -> TransportResult<Self> {
        let heights = full_profile_heights(network);
        Ok(Self {
            matrix: SkylineLu::new(&heights)?,
        })
    }

    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }

    pub fn matrix(&self) -> &SkylineLu {
        &self.matrix
    }

    /// Rebuild the matrix from the network's current link flows for one contaminant.
    pub fn assemble(
        &mut self,
        network: &Network,
        filters: &LinkFilters,
        contaminant: &str,
    ) -> TransportResult<()> {
        self.matrix.fill(0.0);
        let mut blocked = 0usize;

        for link in network.links() {
            let Some(ineff) = filters.inefficiency(link.id(), contaminant) else {
                blocked += 1;
                continue;
            };
            let (n0, n1) = (link.node0().index(), link.node1().index());
            let m = &mut self.matrix;
            if link.nf == 1 {
                if link.flow > 0.0 {
                    m.add(n0, n0, -link.flow)?;
                    m.add(n1, n0, link.flow * ineff)?;
                } else if link.flow < 0.0 {
                    m.add(n0, n1, -link.flow * ineff)?;
                    m.add(n1, n1, link.flow)?;
                }
            } else if link.nf == 2 {
                if link.flow0 > 0.0 {
                    m.add(n0, n0, -link.flow0)?;
                    m.add(n1, n0, link.flow0 * ineff)?;
                }
                if link.flow1 > 0.0 {
                    m.add(n0, n1, link.flow1 * ineff)?;
                    m.add(n1, n1, -link.flow1)?;
                }
            }
        }

        debug!(contaminant, blocked, "advection matrix assembled");
        Ok(())
    }
}
