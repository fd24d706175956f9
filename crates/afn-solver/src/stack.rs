//! Buoyancy (stack) pressure across links.

use afn_core::constants::G0_MPS2;
use afn_graph::Network;

/// Geometry and densities seen by one link.
#[derive(Clone, Copy, Debug)]
pub struct StackInputs {
    /// Densities of node0 and node1 [kg/m³].
    pub density: [f64; 2],
    /// Node reference heights [m].
    pub node_height: [f64; 2],
    /// Link heights relative to each node [m].
    pub link_height: [f64; 2],
}

/// Stack pressure [Pa] added to `p0 - p1`.
///
/// The column of air on the upwind side of the current flow dominates; with
/// no flow the two densities are averaged.
pub fn upwind_stack_pressure(flow: f64, s: StackInputs) -> f64 {
    let [rho0, rho1] = s.density;
    let dz = s.node_height[0] - s.node_height[1];
    let [h0, h1] = s.link_height;
    if flow > 0.0 {
        G0_MPS2 * (rho0 * dz + h1 * (rho0 - rho1))
    } else if flow < 0.0 {
        G0_MPS2 * (rho1 * dz + h0 * (rho1 - rho0))
    } else {
        0.5 * G0_MPS2 * ((rho0 + rho1) * dz + (h0 + h1) * (rho1 - rho0))
    }
}

/// Refresh every link's stack pressure from the current flows and node densities.
pub fn compute_stack_pressures(network: &mut Network) {
    let parts = network.parts_mut();
    for link in parts.links.iter_mut() {
        let (n0, n1) = (&parts.nodes[link.node0().index()], &parts.nodes[link.node1().index()]);
        link.stack_pressure = upwind_stack_pressure(
            link.flow,
            StackInputs {
                density: [n0.state().density(), n1.state().density()],
                node_height: [n0.height(), n1.height()],
                link_height: [link.height0(), link.height1()],
            },
        );
    }
}
