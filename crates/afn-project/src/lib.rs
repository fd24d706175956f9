//! afn-project: network and flow-result files.
//!
//! Files are YAML (`.yaml`, `.yml`) or JSON (`.json`), chosen by extension.

use std::path::Path;

use afn_core::AfnError;
use afn_graph::{FlowResult, GraphError, Network};

pub mod load;
pub mod schema;

pub use load::{Contaminant, Project, build_project, flow_result_def, resolve_flow_results};
pub use schema::*;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Network error: {0}")]
    Graph(#[from] GraphError),

    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ProjectError> for AfnError {
    fn from(e: ProjectError) -> Self {
        match e {
            ProjectError::Graph(g) => g.into(),
            other => AfnError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

fn read<T: serde::de::DeserializeOwned>(path: &Path) -> ProjectResult<T> {
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path)?;
    Ok(match format {
        Format::Yaml => serde_yaml::from_str(&content)?,
        Format::Json => serde_json::from_str(&content)?,
    })
}

fn write<T: serde::Serialize>(path: &Path, value: &T) -> ProjectResult<()> {
    let content = match format_of(path)? {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_network_file(path: &Path) -> ProjectResult<NetworkFile> {
    read(path)
}

pub fn save_network_file(path: &Path, file: &NetworkFile) -> ProjectResult<()> {
    write(path, file)
}

/// Parse and build a network file in one step.
pub fn load_project(path: &Path) -> ProjectResult<Project> {
    build_project(&load_network_file(path)?)
}

/// Read a flow-results file and resolve its link names against `network`.
pub fn load_flow_results(path: &Path, network: &Network) -> ProjectResult<Vec<FlowResult>> {
    let defs: Vec<FlowResultDef> = read(path)?;
    resolve_flow_results(&defs, network)
}

pub fn save_flow_results(path: &Path, results: &[FlowResultDef]) -> ProjectResult<()> {
    write(path, &results)
}
