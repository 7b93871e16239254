//! Manifest data model.
//!
//! A manifest lists templates and what each of them requires. It stands in
//! for the discovery layer: whatever scans the project writes one out, and
//! the engine rebuilds the graph from it on every run.

use serde::{Deserialize, Serialize};

use crate::graph::DependencyDeclaration;

/// Represents a whole manifest file.
///
/// # Example
///
/// ```
/// use modgraph::manifest::Manifest;
///
/// let json = r#"{"templates": [{"id": "header", "dependencies": [{"targetId": "logo"}]}]}"#;
/// let manifest: Manifest = serde_json::from_str(json).unwrap();
/// assert_eq!(manifest.templates[0].id, "header");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Optional display name, used in exported reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Templates in registration order.
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,
}

/// One template and its declared requirements.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TemplateEntry {
    /// The template id.
    pub id: String,

    /// Requirements, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DependencyDeclaration>,
}

impl Manifest {
    /// Returns the total count of declarations across all templates.
    pub fn dependency_count(&self) -> usize {
        self.templates.iter().map(|t| t.dependencies.len()).sum()
    }

    /// Returns the template ids in file order.
    pub fn ids(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.id.as_str()).collect()
    }
}

impl TemplateEntry {
    /// Creates an entry.
    pub fn new(id: impl Into<String>, dependencies: Vec<DependencyDeclaration>) -> Self {
        Self {
            id: id.into(),
            dependencies,
        }
    }
}
