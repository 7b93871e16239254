//! Node table for the dependency graph.
//!
//! [`DependencyGraph`] owns every [`GraphNode`] and keeps the forward
//! (`dependencies`) and reverse (`dependents`) relations consistent. The
//! only mutations are [`DependencyGraph::register`] and
//! [`DependencyGraph::clear`]; every registration is followed by a full
//! level recalculation.
//!
//! The recursive queries recurse once per template along a chain, so
//! stack use grows with the longest dependency chain. That is comfortable
//! for registries of tens to a few thousand templates.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use super::levels;
use super::types::{check_id, DependencyDeclaration, GraphNode, GraphResult};

/// Dependency graph over template ids.
///
/// Nodes are kept in the order they were first named, which makes every
/// traversal over "all nodes" deterministic for a given registration
/// history.
///
/// # Example
///
/// ```rust
/// use modgraph::graph::{DependencyDeclaration, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.register("page", vec![DependencyDeclaration::new("layout")]).unwrap();
/// graph.register("layout", vec![]).unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.dependents("layout"), vec!["page"]);
/// assert_eq!(graph.node("page").unwrap().level, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Nodes in first-seen order
    nodes: Vec<GraphNode>,
    /// Maps ids to their position in `nodes` for O(1) lookup
    index: HashMap<String, usize>,
}

impl DependencyGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with room for `templates` nodes.
    pub fn with_capacity(templates: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(templates),
            index: HashMap::with_capacity(templates),
        }
    }

    /// Registers `id` with its full list of dependency declarations.
    ///
    /// Replaces any list registered earlier for `id`, creates stub nodes
    /// for targets that are not yet known, records `id` as a dependent of
    /// each target and drops it from targets it no longer names. Levels
    /// are recalculated for the whole graph afterwards.
    ///
    /// Registering the same list twice leaves the graph unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidId`](super::GraphError::InvalidId) if
    /// `id` or any target id is empty or blank. The graph is untouched in
    /// that case.
    pub fn register(
        &mut self,
        id: &str,
        dependencies: Vec<DependencyDeclaration>,
    ) -> GraphResult<()> {
        check_id(id)?;
        for dep in &dependencies {
            check_id(&dep.target_id)?;
        }

        let idx = self.ensure_node(id);
        let previous = std::mem::take(&mut self.nodes[idx].dependencies);

        let still_named: HashSet<&str> = dependencies
            .iter()
            .map(|dep| dep.target_id.as_str())
            .collect();
        for old in &previous {
            if !still_named.contains(old.target_id.as_str()) {
                if let Some(&target) = self.index.get(&old.target_id) {
                    self.nodes[target].remove_dependent(id);
                }
            }
        }

        for dep in &dependencies {
            let target = self.ensure_node(&dep.target_id);
            self.nodes[target].add_dependent(id);
        }

        let node = &mut self.nodes[idx];
        node.dependencies = dependencies;
        node.registered = true;

        tracing::debug!(
            id,
            dependencies = node.dependencies.len(),
            "registered template"
        );

        levels::recalculate(&mut self.nodes, &self.index);
        Ok(())
    }

    /// Drops every node. Calling this on an empty graph is a no-op.
    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            tracing::debug!(templates = self.nodes.len(), "clearing dependency graph");
        }
        self.nodes.clear();
        self.index.clear();
    }

    /// Returns the position of `id`, inserting a stub if it is unknown.
    fn ensure_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(GraphNode::stub(id));
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Gets a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Checks if a node exists for `id`, registered or stub.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Checks if `id` has been passed to [`register`](Self::register).
    pub fn is_registered(&self, id: &str) -> bool {
        self.node(id).is_some_and(|node| node.registered)
    }

    /// Returns the number of nodes, stubs included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the total number of declarations across all nodes.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.dependencies.len()).sum()
    }

    /// Iterates over all nodes in first-seen order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Iterates over all ids in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    /// Returns the declarations of `id` exactly as registered.
    ///
    /// Unknown ids yield an empty list.
    pub fn dependencies(&self, id: &str) -> Vec<&DependencyDeclaration> {
        self.node(id)
            .map(|node| node.dependencies.iter().collect())
            .unwrap_or_default()
    }

    /// Returns every declaration reachable from `id`, depth first.
    ///
    /// Each node is expanded at most once per call, but a declaration is
    /// emitted every time its edge is walked, so a target reachable along
    /// two paths shows up twice. Optional declarations are included.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modgraph::graph::{DependencyDeclaration, DependencyGraph};
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.register("a", vec![DependencyDeclaration::new("b")]).unwrap();
    /// graph.register("b", vec![DependencyDeclaration::new("c")]).unwrap();
    ///
    /// let targets: Vec<&str> = graph
    ///     .dependencies_recursive("a")
    ///     .iter()
    ///     .map(|dep| dep.target_id.as_str())
    ///     .collect();
    /// assert_eq!(targets, vec!["b", "c"]);
    /// ```
    pub fn dependencies_recursive(&self, id: &str) -> Vec<&DependencyDeclaration> {
        let mut visited = HashSet::new();
        let mut collected = Vec::new();
        self.collect_dependencies(id, &mut visited, &mut collected);
        collected
    }

    fn collect_dependencies<'a>(
        &'a self,
        id: &str,
        visited: &mut HashSet<&'a str>,
        collected: &mut Vec<&'a DependencyDeclaration>,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !visited.insert(node.id.as_str()) {
            return;
        }

        for dep in &node.dependencies {
            collected.push(dep);
            self.collect_dependencies(&dep.target_id, visited, collected);
        }
    }

    /// Returns the ids that declare a dependency on `id`.
    pub fn dependents(&self, id: &str) -> Vec<&str> {
        self.node(id)
            .map(|node| node.dependents.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns every id that transitively depends on `id`.
    ///
    /// Mirrors [`dependencies_recursive`](Self::dependencies_recursive):
    /// expansion is deduplicated, output is not.
    pub fn dependents_recursive(&self, id: &str) -> Vec<&str> {
        let mut visited = HashSet::new();
        let mut collected = Vec::new();
        self.collect_dependents(id, &mut visited, &mut collected);
        collected
    }

    fn collect_dependents<'a>(
        &'a self,
        id: &str,
        visited: &mut HashSet<&'a str>,
        collected: &mut Vec<&'a str>,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !visited.insert(node.id.as_str()) {
            return;
        }

        for dependent in &node.dependents {
            collected.push(dependent.as_str());
            self.collect_dependents(dependent, visited, collected);
        }
    }

    /// Projects the required edges onto a petgraph `DiGraph`.
    ///
    /// Node indices follow first-seen order; edges point from the dependent
    /// to its dependency. Optional declarations are left out.
    pub fn to_digraph(&self) -> DiGraph<&str, &DependencyDeclaration> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edge_count());
        for node in &self.nodes {
            graph.add_node(node.id.as_str());
        }

        for (from, node) in self.nodes.iter().enumerate() {
            for dep in node.required_dependencies() {
                if let Some(&to) = self.index.get(&dep.target_id) {
                    graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), dep);
                }
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphError;

    fn dep(target: &str) -> DependencyDeclaration {
        DependencyDeclaration::new(target)
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.len(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_register_creates_stubs() {
        let mut graph = DependencyGraph::new();
        graph.register("page", vec![dep("layout"), dep("icons")]).unwrap();

        assert_eq!(graph.len(), 3);
        assert!(graph.is_registered("page"));
        assert!(graph.contains("layout"));
        assert!(!graph.is_registered("layout"));
        assert!(graph.dependencies("layout").is_empty());
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec!["page", "layout", "icons"]);
    }

    #[test]
    fn test_register_keeps_declarations_verbatim() {
        let mut graph = DependencyGraph::new();
        let deps = vec![
            dep("b"),
            DependencyDeclaration::optional("c").with_reason("lazy"),
            dep("b"),
        ];
        graph.register("a", deps.clone()).unwrap();

        let stored: Vec<DependencyDeclaration> =
            graph.dependencies("a").into_iter().cloned().collect();
        assert_eq!(stored, deps);
        // Duplicate declaration, single backlink
        assert_eq!(graph.dependents("b"), vec!["a"]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut graph = DependencyGraph::new();
        graph.register("a", vec![dep("b")]).unwrap();
        let before = graph.clone();

        graph.register("a", vec![dep("b")]).unwrap();

        assert_eq!(graph.nodes().collect::<Vec<_>>(), before.nodes().collect::<Vec<_>>());
    }

    #[test]
    fn test_register_replaces_and_drops_stale_backlinks() {
        let mut graph = DependencyGraph::new();
        graph.register("a", vec![dep("b")]).unwrap();
        graph.register("a", vec![dep("c")]).unwrap();

        assert!(graph.dependents("b").is_empty());
        assert_eq!(graph.dependents("c"), vec!["a"]);
        // The stub for b stays alive
        assert!(graph.contains("b"));
    }

    #[test]
    fn test_register_rejects_blank_ids() {
        let mut graph = DependencyGraph::new();
        assert!(matches!(
            graph.register("", vec![]),
            Err(GraphError::InvalidId { .. })
        ));
        assert!(matches!(
            graph.register("a", vec![dep(" ")]),
            Err(GraphError::InvalidId { .. })
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_dependents_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.register("z", vec![dep("base")]).unwrap();
        graph.register("a", vec![dep("base")]).unwrap();
        graph.register("m", vec![dep("base")]).unwrap();

        assert_eq!(graph.dependents("base"), vec!["z", "a", "m"]);
        assert!(graph.dependents("nonexistent").is_empty());
    }

    #[test]
    fn test_dependencies_recursive_counts_each_edge() {
        // Diamond: a -> b -> d, a -> c -> d, d -> e
        let mut graph = DependencyGraph::new();
        graph.register("a", vec![dep("b"), dep("c")]).unwrap();
        graph.register("b", vec![dep("d")]).unwrap();
        graph.register("c", vec![dep("d")]).unwrap();
        graph.register("d", vec![dep("e")]).unwrap();

        let targets: Vec<&str> = graph
            .dependencies_recursive("a")
            .iter()
            .map(|d| d.target_id.as_str())
            .collect();
        // d is expanded once, but both edges into it are reported
        assert_eq!(targets, vec!["b", "d", "e", "c", "d"]);
    }

    #[test]
    fn test_dependencies_recursive_terminates_on_cycle() {
        let mut graph = DependencyGraph::new();
        graph.register("a", vec![dep("b")]).unwrap();
        graph.register("b", vec![dep("a")]).unwrap();

        let targets: Vec<&str> = graph
            .dependencies_recursive("a")
            .iter()
            .map(|d| d.target_id.as_str())
            .collect();
        assert_eq!(targets, vec!["b", "a"]);
        assert!(graph.dependencies_recursive("unknown").is_empty());
    }

    #[test]
    fn test_dependents_recursive() {
        let mut graph = DependencyGraph::new();
        graph.register("b", vec![dep("a")]).unwrap();
        graph.register("c", vec![dep("b")]).unwrap();
        graph.register("d", vec![dep("a"), dep("c")]).unwrap();

        assert_eq!(graph.dependents_recursive("a"), vec!["b", "c", "d", "d"]);
    }

    #[test]
    fn test_clear() {
        let mut graph = DependencyGraph::new();
        graph.clear();
        graph.register("a", vec![dep("b")]).unwrap();
        graph.clear();

        assert!(graph.is_empty());
        assert!(graph.node("a").is_none());
        assert!(graph.dependencies("a").is_empty());
        assert!(graph.dependents("b").is_empty());
    }

    #[test]
    fn test_to_digraph_skips_optional_edges() {
        let mut graph = DependencyGraph::new();
        graph
            .register("a", vec![dep("b"), DependencyDeclaration::optional("c")])
            .unwrap();

        let digraph = graph.to_digraph();
        assert_eq!(digraph.node_count(), 3);
        assert_eq!(digraph.edge_count(), 1);
        assert_eq!(digraph[NodeIndex::new(0)], "a");
    }
}
