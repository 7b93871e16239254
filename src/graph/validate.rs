//! Whole-graph validation and summary statistics.

use serde::Serialize;
use std::fmt;

use super::store::DependencyGraph;
use super::types::CircularChain;

/// A required declaration whose target was never registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDependency {
    /// The template declaring the requirement.
    pub template_id: String,
    /// The id it requires.
    pub target_id: String,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Missing dependency: {} requires {}",
            self.template_id, self.target_id
        )
    }
}

/// Outcome of [`DependencyGraph::validate`].
///
/// `errors` holds one message per cycle followed by one message per missing
/// reference. The structured records behind the messages are kept alongside
/// for exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True when `errors` is empty.
    pub valid: bool,
    /// Display messages, cycles first.
    pub errors: Vec<String>,
    /// Chains found by [`DependencyGraph::detect_all_circular`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cycles: Vec<CircularChain>,
    /// Required references to templates that were never registered.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<MissingDependency>,
}

/// Informational counts over the graph. Never affects validity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Nodes, stubs included.
    pub total_templates: usize,
    /// Nodes declaring at least one dependency.
    pub templates_with_dependencies: usize,
    /// Nodes with at least one dependent.
    pub templates_with_dependents: usize,
    /// Declarations across all nodes.
    pub total_dependencies: usize,
    /// `total_dependencies / total_templates`, 0 for an empty graph.
    pub average_dependencies: f64,
    /// Largest number of declarations on one node.
    pub max_dependencies: usize,
    /// Highest level of any node.
    pub max_level: usize,
    /// Distinct chains reported by [`DependencyGraph::detect_all_circular`].
    pub circular_dependencies: usize,
}

impl DependencyGraph {
    /// Checks the graph for cycles and references to unregistered ids.
    ///
    /// Nothing here is an error in the `Result` sense: the caller decides
    /// whether an invalid report fails a build or is just logged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modgraph::graph::{DependencyDeclaration, DependencyGraph};
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.register("x", vec![DependencyDeclaration::new("missing")]).unwrap();
    ///
    /// let report = graph.validate();
    /// assert!(!report.valid);
    /// assert_eq!(report.errors, vec!["Missing dependency: x requires missing"]);
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let cycles = self.detect_all_circular();
        let mut errors: Vec<String> = cycles
            .iter()
            .map(|chain| format!("Circular dependency detected: {}", chain.path()))
            .collect();

        let mut missing = Vec::new();
        for node in self.nodes() {
            for dep in node.required_dependencies() {
                if !self.is_registered(&dep.target_id) {
                    missing.push(MissingDependency {
                        template_id: node.id.clone(),
                        target_id: dep.target_id.clone(),
                    });
                }
            }
        }
        errors.extend(missing.iter().map(ToString::to_string));

        let valid = errors.is_empty();
        tracing::info!(
            valid,
            cycles = cycles.len(),
            missing = missing.len(),
            "validated dependency graph"
        );

        ValidationReport {
            valid,
            errors,
            cycles,
            missing,
        }
    }

    /// Summarises the shape of the graph.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_templates: self.len(),
            templates_with_dependencies: 0,
            templates_with_dependents: 0,
            total_dependencies: 0,
            average_dependencies: 0.0,
            max_dependencies: 0,
            max_level: 0,
            circular_dependencies: self.detect_all_circular().len(),
        };

        for node in self.nodes() {
            let fan_out = node.dependencies.len();
            if fan_out > 0 {
                stats.templates_with_dependencies += 1;
            }
            if !node.dependents.is_empty() {
                stats.templates_with_dependents += 1;
            }
            stats.total_dependencies += fan_out;
            stats.max_dependencies = stats.max_dependencies.max(fan_out);
            stats.max_level = stats.max_level.max(node.level);
        }

        if stats.total_templates > 0 {
            stats.average_dependencies =
                stats.total_dependencies as f64 / stats.total_templates as f64;
        }

        stats
    }
}
