//! Shared types for the dependency graph.
//!
//! This module defines the declarations fed in by registration, the nodes
//! held by the store, and the cycle witnesses handed back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors raised for malformed calls into the graph.
///
/// Cycles and missing references are never errors; they are reported as
/// data by the validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An id was empty or consisted only of whitespace.
    #[error("Invalid template id {id:?}: {reason}")]
    InvalidId {
        /// The offending id, verbatim.
        id: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Result type alias for graph mutations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Rejects ids that cannot name a template.
pub(crate) fn check_id(id: &str) -> GraphResult<()> {
    if id.is_empty() {
        return Err(GraphError::InvalidId {
            id: id.to_string(),
            reason: "id must not be empty",
        });
    }
    if id.trim().is_empty() {
        return Err(GraphError::InvalidId {
            id: id.to_string(),
            reason: "id must not be blank",
        });
    }
    Ok(())
}

/// One declared requirement: "this template requires `target_id`".
///
/// # Example
///
/// ```
/// use modgraph::graph::DependencyDeclaration;
///
/// let dep = DependencyDeclaration::new("layout").with_version("^2.0");
/// assert_eq!(dep.target_id, "layout");
/// assert!(!dep.optional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyDeclaration {
    /// Id of the template being required.
    pub target_id: String,

    /// Free-form version hint. Never interpreted by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Optional edges are ignored by cycle detection, levels, load order
    /// and the missing-reference scan.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Free-form explanation of why the requirement exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl DependencyDeclaration {
    /// Creates a required declaration on `target_id`.
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            ..Self::default()
        }
    }

    /// Creates an optional declaration on `target_id`.
    pub fn optional(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            optional: true,
            ..Self::default()
        }
    }

    /// Sets the version hint.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the reason text.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns true if this edge takes part in ordering and cycle checks.
    pub fn is_required(&self) -> bool {
        !self.optional
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target_id)?;
        if let Some(version) = &self.version {
            write!(f, "@{}", version)?;
        }
        if self.optional {
            write!(f, " (optional)")?;
        }
        Ok(())
    }
}

/// A vertex of the dependency graph, keyed by template id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Template id.
    pub id: String,
    /// Declared requirements, in declaration order.
    pub dependencies: Vec<DependencyDeclaration>,
    /// Ids of templates that declare a requirement on this one, in the
    /// order they first did so. Lookup only; never owning.
    pub dependents: Vec<String>,
    /// Longest required-dependency chain below this node.
    pub level: usize,
    /// False for stubs created only because another template named them.
    pub registered: bool,
}

impl GraphNode {
    /// Creates an unregistered stub node.
    pub fn stub(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
            level: 0,
            registered: false,
        }
    }

    /// Iterates over declarations that are not optional.
    pub fn required_dependencies(&self) -> impl Iterator<Item = &DependencyDeclaration> {
        self.dependencies.iter().filter(|dep| dep.is_required())
    }

    /// Records `id` as a dependent unless it is already present.
    pub(crate) fn add_dependent(&mut self, id: &str) {
        if !self.dependents.iter().any(|existing| existing == id) {
            self.dependents.push(id.to_string());
        }
    }

    pub(crate) fn remove_dependent(&mut self, id: &str) {
        self.dependents.retain(|existing| existing != id);
    }
}

/// A cycle witness.
///
/// `chain[0] == chain[chain.len() - 1]`; for example `a -> b -> c -> a` is
/// `["a", "b", "c", "a"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularChain {
    /// Ids along the cycle, first id repeated at the end.
    pub chain: Vec<String>,
    /// Caller-owned remediation flag. Always false when produced.
    pub resolved: bool,
}

impl CircularChain {
    /// Creates an unresolved chain.
    pub fn new(chain: Vec<String>) -> Self {
        Self {
            chain,
            resolved: false,
        }
    }

    /// Key used to deduplicate chains, e.g. `a->b->c->a`.
    pub fn key(&self) -> String {
        self.chain.join("->")
    }

    /// Human-readable path, e.g. `a -> b -> c -> a`.
    pub fn path(&self) -> String {
        self.chain.join(" -> ")
    }

    /// Number of distinct templates in the cycle.
    pub fn len(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }

    /// Returns true if the chain is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns true if the chain is a template requiring itself.
    pub fn is_self_loop(&self) -> bool {
        self.len() == 1
    }

    /// Returns true if `id` takes part in this cycle.
    pub fn contains(&self, id: &str) -> bool {
        self.chain.iter().any(|member| member == id)
    }
}

impl fmt::Display for CircularChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
