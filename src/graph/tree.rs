//! Nested dependency views.
//!
//! [`DependencyGraph::dependency_tree`] expands one template's dependencies
//! into a tree. Expansion stops at a depth cap and never expands the same
//! id twice within one call, which keeps the output finite on cyclic
//! graphs. Recursion depth is at most `max_depth + 1`.
//!
//! The tree serializes to the shape diagnostic tooling expects:
//!
//! ```json
//! { "id": "a", "level": 2, "dependencies": [
//!     { "targetId": "b", "tree": { "id": "b", "truncated": true } } ] }
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

use super::store::DependencyGraph;
use super::types::DependencyDeclaration;

/// Depth cap used when callers have no preference.
pub const DEFAULT_TREE_DEPTH: usize = 10;

/// One node of a dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTree {
    /// A fully expanded node.
    Node {
        id: String,
        level: usize,
        dependencies: Vec<TreeDependency>,
    },
    /// Not expanded: past the depth cap, or already expanded elsewhere in
    /// the same tree.
    Truncated { id: String },
    /// Referenced id with no node in the graph.
    NotFound { id: String },
}

/// A declaration paired with the subtree of its target.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TreeDependency {
    #[serde(flatten)]
    pub declaration: DependencyDeclaration,
    pub tree: DependencyTree,
}

impl DependencyTree {
    /// Id at this position of the tree.
    pub fn id(&self) -> &str {
        match self {
            Self::Node { id, .. } | Self::Truncated { id } | Self::NotFound { id } => id,
        }
    }

    /// Returns true for the truncation marker.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Returns true for the not-found marker.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Child entries; empty for markers.
    pub fn children(&self) -> &[TreeDependency] {
        match self {
            Self::Node { dependencies, .. } => dependencies.as_slice(),
            _ => &[],
        }
    }

    /// Finds the first child whose target is `id`.
    pub fn child(&self, id: &str) -> Option<&DependencyTree> {
        self.children()
            .iter()
            .find(|entry| entry.declaration.target_id == id)
            .map(|entry| &entry.tree)
    }
}

impl Serialize for DependencyTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Node {
                id,
                level,
                dependencies,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("id", id)?;
                map.serialize_entry("level", level)?;
                map.serialize_entry("dependencies", dependencies)?;
                map.end()
            }
            Self::Truncated { id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", id)?;
                map.serialize_entry("truncated", &true)?;
                map.end()
            }
            Self::NotFound { id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", id)?;
                map.serialize_entry("notFound", &true)?;
                map.end()
            }
        }
    }
}

impl DependencyGraph {
    /// Builds the dependency tree below `id`, `max_depth` levels deep.
    ///
    /// The root sits at depth 0. Entries deeper than `max_depth`, and ids
    /// already expanded earlier in this call, become
    /// [`DependencyTree::Truncated`]. An id with no node is always reported
    /// as [`DependencyTree::NotFound`], even past the cap. Returns `None` if
    /// `id` itself has no node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modgraph::graph::{DependencyDeclaration, DependencyGraph};
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.register("a", vec![DependencyDeclaration::new("b")]).unwrap();
    /// graph.register("b", vec![DependencyDeclaration::new("c")]).unwrap();
    /// graph.register("c", vec![]).unwrap();
    ///
    /// let tree = graph.dependency_tree("a", 1).unwrap();
    /// let b = tree.child("b").unwrap();
    /// assert!(b.child("c").unwrap().is_truncated());
    /// ```
    pub fn dependency_tree(&self, id: &str, max_depth: usize) -> Option<DependencyTree> {
        self.node(id)?;
        let mut expanded = HashSet::new();
        Some(self.build_tree(id, 0, max_depth, &mut expanded))
    }

    fn build_tree<'a>(
        &'a self,
        id: &str,
        depth: usize,
        max_depth: usize,
        expanded: &mut HashSet<&'a str>,
    ) -> DependencyTree {
        let Some(node) = self.node(id) else {
            return DependencyTree::NotFound { id: id.to_string() };
        };
        if depth > max_depth || expanded.contains(id) {
            return DependencyTree::Truncated { id: id.to_string() };
        }
        expanded.insert(node.id.as_str());

        let dependencies = node
            .dependencies
            .iter()
            .map(|dep| TreeDependency {
                declaration: dep.clone(),
                tree: self.build_tree(&dep.target_id, depth + 1, max_depth, expanded),
            })
            .collect();

        DependencyTree::Node {
            id: node.id.clone(),
            level: node.level,
            dependencies,
        }
    }
}
