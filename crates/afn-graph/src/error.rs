//! Network assembly errors.

use afn_core::AfnError;

/// Errors and warnings accumulated while assembling a network.
///
/// Loading continues past the first problem so that every issue is reported
/// at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::warn!("{msg}");
        self.warnings.push(msg);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error(s)", self.errors.len())?;
        for e in &self.errors {
            write!(f, "\n  error: {e}")?;
        }
        for w in &self.warnings {
            write!(f, "\n  warning: {w}")?;
        }
        Ok(())
    }
}

/// Network construction and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Validation failed; the report lists every problem found.
    Load(LoadReport),

    /// No node with this name.
    UnknownNode { name: String },

    /// No link with this name.
    UnknownLink { name: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Load(report) => write!(f, "Network failed to load: {report}"),
            GraphError::UnknownNode { name } => write!(f, "Node \"{name}\" does not exist"),
            GraphError::UnknownLink { name } => write!(f, "Link \"{name}\" does not exist"),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for AfnError {
    fn from(err: GraphError) -> Self {
        AfnError::Invariant {
            what: err.to_string(),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_everything() {
        let mut report = LoadReport::default();
        report.error("first");
        report.error("second");
        report.warning("careful");
        assert!(report.has_errors());
        let text = GraphError::Load(report).to_string();
        assert!(text.contains("2 error(s)"));
        assert!(text.contains("first") && text.contains("second") && text.contains("careful"));
    }
}
