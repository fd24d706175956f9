//! Transport over solved networks.

use afn_elements::PowerLaw;
use afn_graph::{LinkSpec, Network, NetworkBuilder, NodeKind, NodeSpec};
use afn_props::FixedAir;
use afn_solver::{NetworkSolver, SolverConfig};
use afn_transport::{
    CrankNicolson, ExplicitEuler, Filter, ImplicitEuler, Integrator, LinkFilters, Scheme,
    StepCoefficients, TransportSystem,
};
use nalgebra::DVector;
use proptest::prelude::*;

/// Room at 5 Pa pushing air to Outside.
fn pressurized_room() -> Network {
    let mut builder = NetworkBuilder::new(FixedAir::default());
    let crack = PowerLaw::new("crack", 0.001, 0.65, builder.props());
    builder
        .add_element(crack)
        .add_node(NodeSpec::new("Room", NodeKind::Simulated).pressure(5.0))
        .add_node(NodeSpec::new("Outside", NodeKind::Fixed))
        .add_link(LinkSpec::new("wall", "crack", "Room", "Outside"));
    let network = builder.build().unwrap();
    // One assembly at the fixed pressures records the link flow.
    let mut solver = NetworkSolver::new(network, SolverConfig::default()).unwrap();
    solver.filjac(false).unwrap();
    solver.into_network()
}

#[test]
fn flows_carry_concentration_downstream() {
    let network = pressurized_room();
    let flow = network.flow("wall").unwrap();
    assert!(flow > 0.0);

    let mut system = TransportSystem::new(&network).unwrap();
    system.assemble(&network, &LinkFilters::new(), "CO2").unwrap();
    assert!((system.matrix().get(0, 0) + flow).abs() < 1e-15);
    assert!((system.matrix().get(1, 0) - flow).abs() < 1e-15);
    assert_eq!(system.matrix().get(0, 1), 0.0);
}

#[test]
fn filters_scale_the_off_diagonal_only() {
    let network = pressurized_room();
    let flow = network.flow("wall").unwrap();
    let link = network.link_id("wall").unwrap();

    let mut filters = LinkFilters::new();
    filters.attach(link, "PM2.5", Filter::new(0.25).unwrap());
    let mut system = TransportSystem::new(&network).unwrap();
    system.assemble(&network, &filters, "PM2.5").unwrap();
    assert!((system.matrix().get(0, 0) + flow).abs() < 1e-15);
    assert!((system.matrix().get(1, 0) - 0.75 * flow).abs() < 1e-15);

    filters.attach(link, "PM2.5", Filter::new(1.0).unwrap());
    system.assemble(&network, &filters, "PM2.5").unwrap();
    assert_eq!(system.matrix().get(0, 0), 0.0);
    assert_eq!(system.matrix().get(1, 0), 0.0);
}

#[test]
fn counter_flows_fill_both_columns_through_the_filter() {
    let mut network = pressurized_room();
    let id = network.link_id("wall").unwrap();
    let link = network.link_mut(id);
    link.nf = 2;
    link.flow0 = 0.003;
    link.flow1 = 0.001;
    link.flow = 0.002;

    let mut system = TransportSystem::new(&network).unwrap();
    system.assemble(&network, &LinkFilters::new(), "CO2").unwrap();
    let m = system.matrix();
    assert!((m.get(0, 0) + 0.003).abs() < 1e-15);
    assert!((m.get(1, 0) - 0.003).abs() < 1e-15);
    assert!((m.get(0, 1) - 0.001).abs() < 1e-15);
    assert!((m.get(1, 1) + 0.001).abs() < 1e-15);

    let mut filters = LinkFilters::new();
    filters.attach(id, "PM2.5", Filter::new(0.25).unwrap());
    system.assemble(&network, &filters, "PM2.5").unwrap();
    let m = system.matrix();
    assert!((m.get(0, 0) + 0.003).abs() < 1e-15);
    assert!((m.get(1, 0) - 0.75 * 0.003).abs() < 1e-15);
    assert!((m.get(0, 1) - 0.75 * 0.001).abs() < 1e-15);
    assert!((m.get(1, 1) + 0.001).abs() < 1e-15);
}

#[test]
fn implicit_decay_approaches_zero() {
    let network = pressurized_room();
    let mut system = TransportSystem::new(&network).unwrap();
    system.assemble(&network, &LinkFilters::new(), "CO2").unwrap();

    // Huge outdoor capacity pins its concentration.
    let a = DVector::from_vec(vec![0.01, 1e12]);
    let k = StepCoefficients::constant(a, DVector::zeros(2), DVector::zeros(2));
    let mut c = DVector::from_vec(vec![1.0, 0.0]);
    let integrator = Scheme::Implicit.integrator();
    let mut last = c[0];
    for _ in 0..50 {
        integrator.step(system.matrix(), &k, 10.0, &mut c).unwrap();
        assert!(c[0] < last);
        last = c[0];
    }
    assert!(c[0] < 1e-3);
    assert!(c[1].abs() < 1e-9);
}

fn closed_pair(flow: f64) -> afn_solver::SkylineLu {
    let mut m = afn_solver::SkylineLu::new(&[0, 1]).unwrap();
    m.add(0, 0, -flow).unwrap();
    m.add(1, 0, flow).unwrap();
    m
}

proptest! {
    #[test]
    fn unfiltered_steps_conserve_mass(
        h in 0.001f64..5.0,
        flow in 0.01f64..2.0,
        a0 in 0.1f64..10.0,
        a1 in 0.1f64..10.0,
        c0 in 0.0f64..1.0,
        c1 in 0.0f64..1.0,
    ) {
        let m = closed_pair(flow);
        let a = DVector::from_vec(vec![a0, a1]);
        let k = StepCoefficients::constant(a.clone(), DVector::zeros(2), DVector::zeros(2));
        let before = a.dot(&DVector::from_vec(vec![c0, c1]));
        let schemes: [&dyn Integrator; 3] = [&ExplicitEuler, &ImplicitEuler, &CrankNicolson];
        for scheme in schemes {
            let mut c = DVector::from_vec(vec![c0, c1]);
            scheme.step(&m, &k, h, &mut c).unwrap();
            let after = a.dot(&c);
            prop_assert!((after - before).abs() < 1e-9 * (1.0 + before), "{}", scheme.name());
            // What one node loses the other gains.
            prop_assert!((a0 * (c0 - c[0]) - a1 * (c[1] - c1)).abs() < 1e-9);
        }
    }
}
