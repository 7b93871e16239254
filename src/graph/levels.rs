//! Level calculation.
//!
//! A node's level is the length of its longest chain of required
//! dependencies. Levels are recomputed from scratch after every
//! registration with a breadth-first pass that starts at the roots (nodes
//! with no required dependencies) and raises each dependent to
//! `max(level(dependent), level(current) + 1)` along required edges.
//!
//! Cycles are collapsed first with Tarjan's algorithm so the pass walks a
//! DAG and expands every component once, which keeps it O(V+E). Members of
//! a cycle share one level, taken from the deepest required dependency
//! outside the cycle, and their dependents sit above it as usual. A cycle
//! that no root reaches stays at level 0, as does anything that depends
//! only on such a cycle.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, VecDeque};

use super::types::GraphNode;

/// Recomputes `level` for every node.
///
/// `index` must map each node id to its position in `nodes`.
pub(crate) fn recalculate(nodes: &mut [GraphNode], index: &HashMap<String, usize>) {
    // Edges point from a dependency to its dependent, the direction levels
    // travel in. Node indices match positions in `nodes`.
    let mut propagation: DiGraph<(), ()> = DiGraph::with_capacity(nodes.len(), 0);
    for _ in 0..nodes.len() {
        propagation.add_node(());
    }
    for (position, node) in nodes.iter().enumerate() {
        for dep in node.required_dependencies() {
            if let Some(&target) = index.get(&dep.target_id) {
                propagation.add_edge(NodeIndex::new(target), NodeIndex::new(position), ());
            }
        }
    }

    let components = tarjan_scc(&propagation);
    let mut component_of = vec![0usize; nodes.len()];
    for (component, members) in components.iter().enumerate() {
        for member in members {
            component_of[member.index()] = component;
        }
    }

    // Incoming edges from other components, counted per declaration.
    let mut pending = vec![0usize; components.len()];
    for edge in propagation.raw_edges() {
        let from = component_of[edge.source().index()];
        let to = component_of[edge.target().index()];
        if from != to {
            pending[to] += 1;
        }
    }

    let mut levels = vec![0usize; components.len()];
    let mut reached: Vec<bool> = components
        .iter()
        .enumerate()
        .map(|(component, members)| {
            pending[component] == 0
                && members.len() == 1
                && nodes[members[0].index()].required_dependencies().next().is_none()
        })
        .collect();
    let mut queue: VecDeque<usize> = (0..components.len())
        .filter(|&component| pending[component] == 0)
        .collect();

    while let Some(current) = queue.pop_front() {
        for member in &components[current] {
            for dependent in propagation.neighbors(*member) {
                let next = component_of[dependent.index()];
                if next == current {
                    continue;
                }
                if reached[current] {
                    levels[next] = levels[next].max(levels[current] + 1);
                    reached[next] = true;
                }
                pending[next] -= 1;
                if pending[next] == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    for (position, node) in nodes.iter_mut().enumerate() {
        node.level = levels[component_of[position]];
    }

    let cyclic = components.iter().filter(|members| members.len() > 1).count();
    if cyclic > 0 {
        tracing::debug!(cycles = cyclic, "levels shared across cycle members");
    }
}
