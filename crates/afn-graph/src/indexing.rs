//! Solver indexing: node ordering and the skyline profile of the network.

use crate::graph::{Network, NodeKind};

/// Stable permutation placing simulated nodes first, then fixed, then calculated.
///
/// `order[new_index] = old_index`.
pub fn simulated_first_order(kinds: &[NodeKind]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..kinds.len()).collect();
    order.sort_by_key(|&i| kinds[i]);
    order
}

/// Column heights of the symmetric Jacobian profile.
///
/// `h[j]` is the largest `j - i` over links joining two simulated nodes `i < j`.
pub fn profile_heights(network: &Network) -> Vec<usize> {
    let mut heights = vec![0; network.variable_count()];
    for link in network.links() {
        let (n0, n1) = (network.node(link.node0()), network.node(link.node1()));
        if n0.is_variable() && n1.is_variable() {
            let (i, j) = (n0.index(), n1.index());
            heights[j] = heights[j].max(j - i);
        }
    }
    heights
}

/// Column heights of the profile spanning every node and every link.
pub fn full_profile_heights(network: &Network) -> Vec<usize> {
    let mut heights = vec![0; network.nodes().len()];
    for link in network.links() {
        let (i, j) = (link.node0().index(), link.node1().index());
        heights[j] = heights[j].max(j - i);
    }
    heights
}
