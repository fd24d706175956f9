//! End-to-end steady solves of small networks.

use afn_core::constants::G0_MPS2;
use afn_core::{Tolerances, nearly_equal};
use afn_elements::{FlowElement, PowerLaw, ReferenceConditions, SimpleOpening};
use afn_graph::{LinkSpec, Network, NetworkBuilder, NodeKind, NodeSpec};
use afn_props::{FixedAir, PropertyModel};
use afn_solver::{
    NetworkSolver, SolveStatus, SolverConfig, SolverError, SolverState, StackInputs,
    upwind_stack_pressure,
};

const C: f64 = 0.001;
const N: f64 = 0.65;

/// Supply (10 Pa) -> Room -> Outside (0 Pa) through identical cracks.
fn series_network(room_pressure: f64) -> Network {
    let mut builder = NetworkBuilder::new(FixedAir::default());
    let crack = PowerLaw::new("crack", C, N, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("Supply", NodeKind::Fixed).pressure(10.0))
        .add_node(NodeSpec::new("Room", NodeKind::Simulated).pressure(room_pressure))
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed))
        .add_link(LinkSpec::new("in", "crack", "Supply", "Room"))
        .add_link(LinkSpec::new("out", "crack", "Room", "Outside"));
    builder.build().unwrap()
}

fn tight() -> SolverConfig {
    SolverConfig {
        tolerance: 1e-12,
        ..Default::default()
    }
}

#[test]
fn series_cracks_split_the_pressure() {
    let mut solver = NetworkSolver::new(series_network(4.0), tight()).unwrap();
    let report = solver.solve().unwrap();

    assert_eq!(report.status, SolveStatus::Converged);
    assert!(report.iterations <= 25);
    assert!(matches!(solver.state(), SolverState::Converged { .. }));

    let network = solver.network();
    let p = network.pressure("Room").unwrap();
    assert!((p - 5.0).abs() < 1e-6, "room pressure {p}");

    // Links are stored with the simulated node first.
    let expected = C * 5.0_f64.powf(N);
    let inflow = network.flow("in").unwrap();
    let outflow = network.flow("out").unwrap();
    let tol = Tolerances::default();
    assert!(nearly_equal(-inflow, expected, tol), "inflow {inflow}");
    assert!(nearly_equal(outflow, expected, tol), "outflow {outflow}");
}

#[test]
fn linear_initialization_reaches_the_same_answer() {
    let config = SolverConfig {
        linear_init: true,
        ..tight()
    };
    let mut solver = NetworkSolver::new(series_network(0.0), config).unwrap();
    let report = solver.solve().unwrap();
    assert!(report.converged());
    assert!((solver.network().pressure("Room").unwrap() - 5.0).abs() < 1e-6);
}

#[test]
fn linear_initialization_alone_balances_the_linear_system() {
    let mut solver = NetworkSolver::new(series_network(0.0), tight()).unwrap();
    solver.linear_initialize().unwrap();
    // Identical linearized cracks put the room halfway.
    let p = solver.network().pressure("Room").unwrap();
    assert!((p - 5.0).abs() < 1e-9, "room pressure {p}");
}

#[test]
fn iteration_cap_is_reported_not_raised() {
    let config = SolverConfig {
        max_iterations: 1,
        tolerance: 1e-15,
        relaxation: 0.5,
        ..Default::default()
    };
    let mut solver = NetworkSolver::new(series_network(0.5), config).unwrap();
    let report = solver.solve().unwrap();

    assert_eq!(report.status, SolveStatus::MaxIterationsExceeded);
    assert_eq!(report.iterations, 1);
    assert!(report.max_residual > 0.0);
    assert!(matches!(
        solver.state(),
        SolverState::Failed { iterations: 1, .. }
    ));
}

#[test]
fn floating_zones_give_a_singular_jacobian() {
    let mut builder = NetworkBuilder::new(FixedAir::default());
    let crack = PowerLaw::new("crack", C, N, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("A", NodeKind::Simulated).pressure(5.0))
        .add_node(NodeSpec::new("B", NodeKind::Simulated))
        .add_link(LinkSpec::new("ab", "crack", "A", "B"));
    let network = builder.build().unwrap();

    let mut solver = NetworkSolver::new(network, SolverConfig::default()).unwrap();
    let err = solver.solve().unwrap_err();
    assert!(matches!(err, SolverError::Numeric { .. }), "{err}");
}

#[test]
fn uniform_density_stack_is_hydrostatic() {
    let mut builder = NetworkBuilder::new(FixedAir::default());
    let crack = PowerLaw::new("crack", C, N, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("Lower", NodeKind::Simulated))
        .add_node(NodeSpec::new("Upper", NodeKind::Simulated).height(3.0))
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed))
        .add_link(LinkSpec::new("ground", "crack", "Outside", "Lower"))
        .add_link(LinkSpec::new("floor", "crack", "Lower", "Upper").heights(3.0, 0.0))
        .add_link(LinkSpec::new("roof", "crack", "Upper", "Outside").heights(0.0, 3.0));
    let network = builder.build().unwrap();
    let rho = FixedAir::default().density;

    // Power-law Newton contracts only linearly towards zero flow.
    let config = SolverConfig {
        max_iterations: 80,
        tolerance: 1e-7,
        ..Default::default()
    };
    let mut solver = NetworkSolver::new(network, config).unwrap();
    let report = solver.solve().unwrap();
    assert!(report.converged(), "{report:?}");

    let network = solver.network();
    assert!(network.pressure("Lower").unwrap().abs() < 1e-3);
    let upper = network.pressure("Upper").unwrap();
    assert!((upper + rho * G0_MPS2 * 3.0).abs() < 1e-3, "upper {upper}");
    for link in network.links() {
        assert!(link.flow.abs() < 1e-6, "{} carries {}", link.name(), link.flow);
    }
}

#[test]
fn warm_zone_draws_in_low_and_exhausts_high() {
    let model = PropertyModel::Airnet;
    let mut builder = NetworkBuilder::new(model);
    let crack = PowerLaw::new("crack", C, N, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("Room", NodeKind::Simulated).temperature(20.0))
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed).temperature(0.0))
        .add_link(LinkSpec::new("low", "crack", "Room", "Outside"))
        .add_link(LinkSpec::new("high", "crack", "Room", "Outside").heights(3.0, 3.0));
    let network = builder.build().unwrap();

    let mut solver = NetworkSolver::new(network, tight()).unwrap();
    assert!(solver.solve().unwrap().converged());

    let network = solver.network();
    let low = network.flow("low").unwrap();
    let high = network.flow("high").unwrap();
    assert!(low < 0.0, "cold air enters low, got {low}");
    assert!(high > 0.0, "warm air leaves high, got {high}");
    assert!((low + high).abs() < 1e-9);
}

#[test]
fn stack_pressure_matches_densities() {
    let mut builder = NetworkBuilder::new(FixedAir::default());
    let crack = PowerLaw::new("crack", C, N, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("Room", NodeKind::Simulated).height(2.0))
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed))
        .add_link(LinkSpec::new("wall", "crack", "Room", "Outside"));
    let mut solver = NetworkSolver::new(builder.build().unwrap(), tight()).unwrap();
    solver.compute_stack_pressures();

    let rho = FixedAir::default().density;
    let link = &solver.network().links()[0];
    assert!((link.stack_pressure - G0_MPS2 * rho * 2.0).abs() < 1e-12);
}

#[test]
fn single_crack_matches_direct_evaluation() {
    let mut builder = NetworkBuilder::new(FixedAir::default());
    let crack = PowerLaw::new("crack", C, N, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed))
        .add_node(NodeSpec::new("Room", NodeKind::Simulated).pressure(10.0))
        .add_link(LinkSpec::new("wall", "crack", "Room", "Outside"));
    let mut solver = NetworkSolver::new(builder.build().unwrap(), SolverConfig::default()).unwrap();
    let report = solver.solve().unwrap();
    assert!(report.converged());
    assert!(report.iterations <= 25);
    assert!(report.max_residual < 1e-4);

    let network = solver.network();
    let link = &network.links()[0];
    let (n0, n1) = (network.node(link.node0()), network.node(link.node1()));
    let direct = network.element(link.element()).calculate(
        false,
        n0.pressure - n1.pressure,
        1.0,
        1.0,
        n0.state(),
        n1.state(),
    );
    assert_eq!(link.flow, direct.total());
}

fn stack_inputs(network: &Network, link: &afn_graph::Link) -> StackInputs {
    let (n0, n1) = (network.node(link.node0()), network.node(link.node1()));
    StackInputs {
        density: [n0.state().density(), n1.state().density()],
        node_height: [n0.height(), n1.height()],
        link_height: [link.height0(), link.height1()],
    }
}

#[test]
fn solve_refreshes_stack_pressure_from_previous_flows() {
    let mut builder = NetworkBuilder::new(PropertyModel::Airnet);
    let crack = PowerLaw::new("crack", C, N, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("Supply", NodeKind::Fixed).pressure(10.0).temperature(0.0))
        .add_node(NodeSpec::new("Room", NodeKind::Simulated).temperature(20.0))
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed).temperature(0.0))
        .add_link(LinkSpec::new("in", "crack", "Supply", "Room").heights(0.0, 2.0))
        .add_link(LinkSpec::new("out", "crack", "Room", "Outside"));
    let mut solver = NetworkSolver::new(builder.build().unwrap(), tight()).unwrap();

    assert!(solver.solve().unwrap().converged());
    let network = solver.network();
    let link = network.link(network.link_id("in").unwrap());
    let inputs = stack_inputs(network, link);
    assert!((link.stack_pressure - upwind_stack_pressure(0.0, inputs)).abs() < 1e-12);
    let flow = link.flow;
    assert!(flow != 0.0);

    // The second solve sees the first solve's flow direction.
    assert!(solver.solve().unwrap().converged());
    let network = solver.network();
    let link = network.link(network.link_id("in").unwrap());
    let upwind = upwind_stack_pressure(flow, inputs);
    assert!((link.stack_pressure - upwind).abs() < 1e-12);
    assert!((upwind - upwind_stack_pressure(0.0, inputs)).abs() > 1e-3);
}

#[test]
fn open_door_between_warm_and_cold_zones_carries_two_flows() {
    let mut builder = NetworkBuilder::new(PropertyModel::Airnet);
    let door = SimpleOpening::new(
        "door",
        2.0,
        0.9,
        0.6,
        1e-4,
        1e-4,
        0.65,
        ReferenceConditions::default(),
        builder.props(),
    )
    .unwrap();
    builder
        .add_element(door)
        .add_node(NodeSpec::new("Room", NodeKind::Simulated).temperature(25.0))
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed).temperature(0.0))
        .add_link(LinkSpec::new("doorway", "door", "Room", "Outside"));
    let config = SolverConfig {
        tolerance: 1e-9,
        ..Default::default()
    };
    let mut solver = NetworkSolver::new(builder.build().unwrap(), config).unwrap();
    let report = solver.solve().unwrap();
    assert!(report.converged(), "{report:?}");

    let network = solver.network();
    let link = &network.links()[0];
    assert_eq!(link.nf, 2);
    assert!(link.flow0 > 0.0 && link.flow1 > 0.0);
    // Both streams meet at the room, so they must balance.
    assert!((link.flow0 - link.flow1).abs() < 1e-9, "{} vs {}", link.flow0, link.flow1);
    assert!(solver.residual()[0].abs() < 1e-9);

    let (n0, n1) = (network.node(link.node0()), network.node(link.node1()));
    let neutral = link.delta_p / (G0_MPS2 * (n0.state().density() - n1.state().density()));
    assert!(neutral > 0.0 && neutral < 2.0, "neutral plane at {neutral}");
}
