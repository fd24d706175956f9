//! Link validation during network assembly.

use crate::error::LoadReport;
use crate::graph::NodeKind;

/// Check a resolved link and return its endpoints ordered by solver index.
///
/// Returns `None` (after recording the problem) for loops and for links whose
/// endpoints are both boundary nodes.
pub(crate) fn orient_link(
    name: &str,
    ends: [(usize, NodeKind, &str); 2],
    report: &mut LoadReport,
) -> Option<(usize, usize, bool)> {
    let [(i, kind_i, name_i), (j, kind_j, name_j)] = ends;
    if i == j {
        report.error(format!(
            "Link \"{name}\" connects node \"{name_i}\" to itself and is a loop"
        ));
        return None;
    }
    if kind_i != NodeKind::Simulated && kind_j != NodeKind::Simulated {
        report.error(format!(
            "Link \"{name}\" connects non-simulated nodes \"{name_i}\" and \"{name_j}\""
        ));
        return None;
    }
    if i < j {
        Some((i, j, false))
    } else {
        Some((j, i, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_is_reported() {
        let mut report = LoadReport::default();
        let r = orient_link(
            "l",
            [(0, NodeKind::Simulated, "a"), (0, NodeKind::Simulated, "a")],
            &mut report,
        );
        assert!(r.is_none());
        assert!(report.errors[0].contains("loop"));
    }

    #[test]
    fn boundary_pair_is_reported() {
        let mut report = LoadReport::default();
        let r = orient_link(
            "l",
            [(1, NodeKind::Fixed, "a"), (2, NodeKind::Calculated, "b")],
            &mut report,
        );
        assert!(r.is_none());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn reversed_link_is_swapped() {
        let mut report = LoadReport::default();
        let r = orient_link(
            "l",
            [(3, NodeKind::Fixed, "a"), (1, NodeKind::Simulated, "b")],
            &mut report,
        );
        assert_eq!(r, Some((1, 3, true)));
        assert!(!report.has_errors());
    }
}
