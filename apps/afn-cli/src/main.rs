use std::path::{Path, PathBuf};

use afn_graph::Network;
use afn_project::{Project, flow_result_def, load_flow_results, load_project, save_flow_results};
use afn_solver::{NetworkSolver, SolveReport, SolverConfig};
use afn_transport::{Scheme, StepCoefficients, TransportSystem};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nalgebra::DVector;
use tracing::info;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Project(#[from] afn_project::ProjectError),

    #[error("{0}")]
    Solver(#[from] afn_solver::SolverError),

    #[error("{0}")]
    Transport(#[from] afn_transport::TransportError),

    #[error("Contaminant \"{0}\" is not defined in the network file")]
    UnknownContaminant(String),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "afn-cli")]
#[command(about = "Airflow network solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SolveArgs {
    /// Fraction of each Newton correction to apply
    #[arg(long, default_value_t = 1.0)]
    relaxation: f64,
    /// Maximum number of Newton updates
    #[arg(long, default_value_t = 25)]
    max_iterations: usize,
    /// Convergence tolerance on node mass imbalance [kg/s]
    #[arg(long, default_value_t = 1e-4)]
    tolerance: f64,
    /// Start from a linearized solve
    #[arg(long)]
    linear_init: bool,
}

impl SolveArgs {
    fn config(&self) -> SolverConfig {
        SolverConfig::default()
            .with_relaxation(self.relaxation)
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance)
            .with_linear_init(self.linear_init)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Explicit,
    Implicit,
    CrankNicolson,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Explicit => Scheme::Explicit,
            SchemeArg::Implicit => Scheme::Implicit,
            SchemeArg::CrankNicolson => Scheme::CrankNicolson,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a network file
    Validate {
        /// Path to the network file (YAML or JSON)
        network: PathBuf,
    },
    /// Solve the steady pressures and flows
    Solve {
        network: PathBuf,
        #[command(flatten)]
        solve: SolveArgs,
        /// Write the link flows to this file (YAML or JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply recorded flows to a network and print them
    Replay {
        network: PathBuf,
        /// Flow-results file
        results: PathBuf,
    },
    /// Solve the flows, then advance one contaminant in time
    Transport {
        network: PathBuf,
        /// Contaminant ID from the network file
        #[arg(long)]
        contaminant: String,
        #[arg(long, value_enum, default_value = "implicit")]
        scheme: SchemeArg,
        /// Number of time steps
        #[arg(long, default_value_t = 10)]
        steps: usize,
        /// Time step in seconds
        #[arg(long, default_value_t = 60.0)]
        dt: f64,
        #[command(flatten)]
        solve: SolveArgs,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { network } => cmd_validate(&network),
        Commands::Solve {
            network,
            solve,
            output,
        } => cmd_solve(&network, &solve, output.as_deref()),
        Commands::Replay { network, results } => cmd_replay(&network, &results),
        Commands::Transport {
            network,
            contaminant,
            scheme,
            steps,
            dt,
            solve,
        } => cmd_transport(&network, &contaminant, scheme.into(), steps, dt, &solve),
    }
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    println!("Validating network: {}", path.display());
    let project = load_project(path)?;
    let network = &project.network;
    for warning in network.warnings() {
        println!("  warning: {warning}");
    }
    println!(
        "✓ Network is valid ({} nodes, {} simulated, {} links, {} elements)",
        network.nodes().len(),
        network.variable_count(),
        network.links().len(),
        network.elements().len()
    );
    Ok(())
}

fn solve_network(project: Project, args: &SolveArgs) -> CliResult<(NetworkSolver, SolveReport)> {
    let mut solver = NetworkSolver::new(project.network, args.config())?;
    let report = solver.solve()?;
    if report.converged() {
        println!("✓ Converged in {} iterations", report.iterations);
    } else {
        println!(
            "✗ Not converged after {} iterations (max residual {:.3e} kg/s)",
            report.iterations, report.max_residual
        );
    }
    Ok((solver, report))
}

fn print_state(network: &Network) {
    println!("Nodes:");
    for node in network.nodes() {
        println!("  {:<20} {:>12.4} Pa", node.name(), node.pressure);
    }
    print_flows(network);
}

fn print_flows(network: &Network) {
    println!("Links:");
    for link in network.links() {
        let (from, to) = (network.node(link.node0()).name(), network.node(link.node1()).name());
        println!(
            "  {:<20} {:>12.6} kg/s  ({from} -> {to})",
            link.name(),
            link.flow
        );
    }
}

fn cmd_solve(path: &Path, args: &SolveArgs, output: Option<&Path>) -> CliResult<()> {
    let project = load_project(path)?;
    let (solver, _) = solve_network(project, args)?;
    print_state(solver.network());
    if let Some(output) = output {
        save_flow_results(output, &[flow_result_def(solver.network(), 0)])?;
        println!("Flows written to {}", output.display());
    }
    Ok(())
}

fn cmd_replay(path: &Path, results: &Path) -> CliResult<()> {
    let mut network = load_project(path)?.network;
    let steps = load_flow_results(results, &network)?;
    for step in &steps {
        step.apply(&mut network);
        println!("t = {} s", step.time);
        print_flows(&network);
    }
    Ok(())
}

fn cmd_transport(
    path: &Path,
    contaminant: &str,
    scheme: Scheme,
    steps: usize,
    dt: f64,
    args: &SolveArgs,
) -> CliResult<()> {
    let project = load_project(path)?;
    let initial = project
        .contaminant(contaminant)
        .ok_or_else(|| CliError::UnknownContaminant(contaminant.to_string()))?
        .initial
        .clone();
    let filters = project.filters.clone();
    let (solver, _) = solve_network(project, args)?;
    let network = solver.network();

    let mut system = TransportSystem::new(network)?;
    system.assemble(network, &filters, contaminant)?;

    let capacity = DVector::from_iterator(
        network.nodes().len(),
        network.nodes().iter().map(|n| n.state().density() * n.volume),
    );
    let n = capacity.len();
    let coefficients = StepCoefficients::constant(capacity, DVector::zeros(n), DVector::zeros(n));
    let integrator = scheme.integrator();
    let mut c = DVector::from_vec(initial);

    info!(scheme = %scheme, steps, dt, contaminant, "transport");
    for _ in 0..steps {
        integrator.step(system.matrix(), &coefficients, dt, &mut c)?;
    }

    println!("{contaminant} after {steps} steps of {dt} s ({scheme}):");
    for (node, value) in network.nodes().iter().zip(c.iter()) {
        println!("  {:<20} {:>14.6e}", node.name(), value);
    }
    Ok(())
}
