//! Load ordering.
//!
//! [`DependencyGraph::load_order`] is a depth-first post-order walk over
//! required edges. It never fails: an edge leading back onto the active
//! path is skipped, which silently breaks the cycle at that point. The
//! result is therefore only guaranteed dependency-correct on the acyclic
//! part of the graph; callers that need strict ordering should check
//! [`DependencyGraph::validate`] first.
//!
//! The walk is recursive, one frame per template on the active path.

use std::collections::HashSet;

use super::store::DependencyGraph;

#[derive(Default)]
struct LoadOrder<'a> {
    visiting: HashSet<&'a str>,
    placed: HashSet<&'a str>,
    order: Vec<String>,
}

impl<'a> LoadOrder<'a> {
    fn visit(&mut self, graph: &'a DependencyGraph, id: &'a str) {
        if self.placed.contains(id) || self.visiting.contains(id) {
            return;
        }

        self.visiting.insert(id);
        if let Some(node) = graph.node(id) {
            for dep in node.required_dependencies() {
                self.visit(graph, dep.target_id.as_str());
            }
        }
        self.visiting.remove(id);

        self.placed.insert(id);
        self.order.push(id.to_string());
    }
}

impl DependencyGraph {
    /// Orders `ids` and their required dependencies so that dependencies
    /// come first.
    ///
    /// Ids are walked in the order given; the same input against the same
    /// registration history always yields the same output. Requested ids
    /// the graph has never seen are still emitted, in request position.
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
    /// assert_eq!(graph.load_order(&["a", "b", "c"]), vec!["c", "b", "a"]);
    /// ```
    pub fn load_order<S: AsRef<str>>(&self, ids: &[S]) -> Vec<String> {
        let mut walk = LoadOrder::default();
        for id in ids {
            walk.visit(self, id.as_ref());
        }
        walk.order
    }

    /// Orders every known template.
    pub fn full_load_order(&self) -> Vec<String> {
        let ids: Vec<&str> = self.ids().collect();
        self.load_order(&ids)
    }
}
