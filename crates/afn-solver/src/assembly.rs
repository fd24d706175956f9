//! Jacobian and residual assembly ("filjac").

use afn_elements::{FlowElement, Flows};
use afn_graph::{Network, NetworkParts};

use crate::error::{SolverError, SolverResult};
use crate::skyline::SkylineMatrix;

/// How link flows are evaluated during assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    /// Full element law; `laminar` forces the linear branch.
    Nonlinear { laminar: bool },
    /// Zero-drop coefficient from `FlowElement::linearize`.
    Linear,
}

/// Assign each link the packed index of its off-diagonal Jacobian entry.
///
/// Links with a boundary node1 have no off-diagonal entry. Links joining two
/// simulated nodes must fall inside the profile.
pub fn assign_skyline_indices(network: &mut Network, matrix: &SkylineMatrix) -> SolverResult<()> {
    let parts = network.parts_mut();
    for link in parts.links.iter_mut() {
        let (n0, n1) = (&parts.nodes[link.node0().index()], &parts.nodes[link.node1().index()]);
        let index = if n0.is_variable() && n1.is_variable() {
            let k = matrix.index(n0.index(), n1.index()).ok_or_else(|| SolverError::Topology {
                link: link.name().to_string(),
                what: format!("node \"{}\" has an index outside the skyline", n1.name()),
            })?;
            Some(k)
        } else {
            None
        };
        link.set_skyline_index(index);
    }
    Ok(())
}

/// Zero and refill the Jacobian and residual from every link.
///
/// The residual of a node is its net outflow. A single flow component `F`
/// with derivative `dF` contributes `+F` to node0, `-F` to node1, `+dF` to
/// both diagonals and `-dF` to the shared off-diagonal entry.
///
/// Returns the largest residual magnitude over the simulated nodes.
pub fn filjac(
    parts: NetworkParts<'_>,
    matrix: &mut SkylineMatrix,
    residual: &mut [f64],
    evaluation: Evaluation,
) -> SolverResult<f64> {
    matrix.fill(0.0);
    residual.fill(0.0);

    for link in parts.links.iter_mut() {
        let (i0, i1) = (link.node0().index(), link.node1().index());
        let (n0, n1) = (&parts.nodes[i0], &parts.nodes[i1]);
        let (v0, v1) = (n0.is_variable(), n1.is_variable());

        link.delta_p = n0.pressure - n1.pressure + link.stack_pressure + link.added_pressure;
        let element = &parts.elements[link.element().index()];
        let flows = match evaluation {
            Evaluation::Nonlinear { laminar } => element.calculate(
                laminar,
                link.delta_p,
                link.multiplier,
                link.control,
                n0.state(),
                n1.state(),
            ),
            Evaluation::Linear => {
                let c = element.linearize(link.multiplier, n0.state(), n1.state());
                Flows::one(c * link.delta_p, c)
            }
        };
        link.record(&flows);

        for (f, df) in flows.components() {
            if v0 {
                residual[i0] += f;
                *matrix.diagonal_mut(i0) += df;
            }
            if v1 {
                residual[i1] -= f;
                *matrix.diagonal_mut(i1) += df;
            }
            if v0 && v1 {
                let k = link.skyline_index().ok_or_else(|| SolverError::Topology {
                    link: link.name().to_string(),
                    what: "missing skyline index".to_string(),
                })?;
                *matrix.at_mut(k) -= df;
            }
        }
    }

    let max = residual.iter().fold(0.0_f64, |acc, r| acc.max(r.abs()));
    if residual.iter().any(|r| !r.is_finite()) {
        return Err(SolverError::Numeric {
            what: "non-finite residual".to_string(),
        });
    }
    Ok(max)
}
