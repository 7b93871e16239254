//! Circular dependency detection.
//!
//! Cycles are reported, never rejected: registration happily accepts a
//! declaration that closes a loop, and the caller decides whether a chain
//! returned here is fatal.
//!
//! The chain search recurses along the current path, so its depth is
//! bounded by the longest required chain in the graph.
//!
//! Two views are offered:
//!
//! - **Witness chains** ([`DependencyGraph::detect_circular`],
//!   [`DependencyGraph::detect_all_circular`]): a DFS that records the path
//!   from the back edge's target to its source, so the chain can be printed
//!   as `a -> b -> c -> a`.
//! - **Cyclic groups** ([`DependencyGraph::strongly_connected_groups`]):
//!   every set of templates that are mutually reachable, via petgraph's
//!   Tarjan SCC. Unlike the chains, a template never hides behind an
//!   earlier report here.
//!
//! Only required edges are walked. An optional declaration cannot close a
//! cycle.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use std::collections::HashSet;

use super::store::DependencyGraph;
use super::types::CircularChain;

/// Per-run DFS bookkeeping.
#[derive(Default)]
struct CycleSearch<'a> {
    /// Ids on the active DFS path
    visiting: HashSet<&'a str>,
    /// Ids whose subtree is finished
    visited: HashSet<&'a str>,
    path: Vec<&'a str>,
    chains: Vec<CircularChain>,
}

impl<'a> CycleSearch<'a> {
    fn visit(&mut self, graph: &'a DependencyGraph, id: &'a str) {
        if self.visiting.contains(id) {
            if let Some(start) = self.path.iter().position(|&member| member == id) {
                let mut chain: Vec<String> =
                    self.path[start..].iter().map(|&member| member.to_string()).collect();
                chain.push(id.to_string());
                self.chains.push(CircularChain::new(chain));
            }
            return;
        }
        if self.visited.contains(id) {
            return;
        }

        self.visiting.insert(id);
        self.path.push(id);

        if let Some(node) = graph.node(id) {
            for dep in node.required_dependencies() {
                self.visit(graph, dep.target_id.as_str());
            }
        }

        self.path.pop();
        self.visiting.remove(id);
        self.visited.insert(id);
    }
}

impl DependencyGraph {
    /// Finds the cycles reachable from `id` through required edges.
    ///
    /// Every back edge met during the search yields one chain, so a node
    /// that closes several loops produces several chains. Each chain starts
    /// and ends with the node the back edge points at.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modgraph::graph::{DependencyDeclaration, DependencyGraph};
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.register("a", vec![DependencyDeclaration::new("b")]).unwrap();
    /// graph.register("b", vec![DependencyDeclaration::new("c")]).unwrap();
    /// graph.register("c", vec![DependencyDeclaration::new("a")]).unwrap();
    ///
    /// let chains = graph.detect_circular("a");
    /// assert_eq!(chains.len(), 1);
    /// assert_eq!(chains[0].chain, vec!["a", "b", "c", "a"]);
    /// ```
    pub fn detect_circular(&self, id: &str) -> Vec<CircularChain> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };

        let mut search = CycleSearch::default();
        search.visit(self, node.id.as_str());

        for chain in &search.chains {
            tracing::debug!(root = id, chain = %chain, "circular dependency found");
        }
        search.chains
    }

    /// Finds cycles across the whole graph.
    ///
    /// Ids are tried as DFS roots in first-seen order. Chains are
    /// deduplicated by their `a->b->a` key, and once a chain is recorded
    /// none of its members is used as a root again, so a template appears
    /// in at most one chain's worth of fresh searches per call.
    pub fn detect_all_circular(&self) -> Vec<CircularChain> {
        let mut checked: HashSet<&str> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut all = Vec::new();

        for id in self.ids() {
            if checked.contains(id) {
                continue;
            }

            for chain in self.detect_circular(id) {
                if !seen.insert(chain.key()) {
                    continue;
                }
                for member in &chain.chain {
                    if let Some(node) = self.node(member) {
                        checked.insert(node.id.as_str());
                    }
                }
                all.push(chain);
            }
        }

        all
    }

    /// Checks if any required edges form a cycle.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.to_digraph())
    }

    /// Returns every group of templates that depend on each other.
    ///
    /// A group is a strongly connected component with more than one member,
    /// or a single template that requires itself. Members are listed in
    /// first-seen order and groups are ordered by their first member.
    pub fn strongly_connected_groups(&self) -> Vec<Vec<String>> {
        let digraph = self.to_digraph();
        let mut groups: Vec<Vec<String>> = Vec::new();

        for mut scc in tarjan_scc(&digraph) {
            // A strongly connected component is a cycle if it has more than one node,
            // or if it's a single node with a self-loop
            let cyclic = scc.len() > 1 || digraph.contains_edge(scc[0], scc[0]);
            if !cyclic {
                continue;
            }
            scc.sort();
            groups.push(scc.iter().map(|&idx| digraph[idx].to_string()).collect());
        }

        groups.sort_by_key(|group| {
            group
                .first()
                .and_then(|id| self.ids().position(|known| known == id))
        });
        groups
    }
}
