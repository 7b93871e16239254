//! Reader for JSON manifests.
//!
//! This module parses manifest files and feeds them into a
//! [`DependencyGraph`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::types::Manifest;
use crate::graph::{DependencyGraph, GraphError};

/// Errors that can occur while loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest structure is invalid.
    #[error("Invalid manifest: {0}")]
    Invalid(String),

    /// The graph rejected a registration.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Parses a manifest file from a path.
///
/// The manifest is validated before it is returned.
pub fn parse_file(path: &Path) -> ManifestResult<Manifest> {
    let content = fs::read_to_string(path)?;
    let manifest = parse_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        templates = manifest.templates.len(),
        "loaded manifest"
    );
    Ok(manifest)
}

/// Parses and validates a manifest from a string.
///
/// # Example
///
/// ```
/// use modgraph::manifest::parse_str;
///
/// let json = r#"{"templates": [{"id": "header"}]}"#;
/// let manifest = parse_str(json).unwrap();
/// assert_eq!(manifest.templates.len(), 1);
/// ```
pub fn parse_str(content: &str) -> ManifestResult<Manifest> {
    let manifest: Manifest = serde_json::from_str(content)?;
    validate(&manifest)?;
    Ok(manifest)
}

/// Checks that every template has a usable id and appears only once.
///
/// Registering the same id twice would silently keep only the last list,
/// so duplicates are rejected here instead.
pub fn validate(manifest: &Manifest) -> ManifestResult<()> {
    let mut seen = HashSet::new();
    for template in &manifest.templates {
        if template.id.trim().is_empty() {
            return Err(ManifestError::Invalid(
                "template with an empty id".to_string(),
            ));
        }
        if !seen.insert(template.id.as_str()) {
            return Err(ManifestError::Invalid(format!(
                "template '{}' is listed more than once",
                template.id
            )));
        }
        if template
            .dependencies
            .iter()
            .any(|dep| dep.target_id.trim().is_empty())
        {
            return Err(ManifestError::Invalid(format!(
                "template '{}' declares a dependency with an empty target id",
                template.id
            )));
        }
    }
    Ok(())
}

impl Manifest {
    /// Registers every template with `graph`, in file order.
    pub fn register_into(&self, graph: &mut DependencyGraph) -> ManifestResult<()> {
        for template in &self.templates {
            graph.register(&template.id, template.dependencies.clone())?;
        }
        Ok(())
    }

    /// Builds a fresh graph from this manifest.
    pub fn to_graph(&self) -> ManifestResult<DependencyGraph> {
        let mut graph = DependencyGraph::with_capacity(self.templates.len());
        self.register_into(&mut graph)?;
        Ok(graph)
    }
}
