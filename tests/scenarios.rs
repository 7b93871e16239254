//! End-to-end behaviour of the dependency graph.

use modgraph::graph::{DependencyDeclaration, DependencyGraph, DEFAULT_TREE_DEPTH};
use proptest::prelude::*;

fn dep(target: &str) -> DependencyDeclaration {
    DependencyDeclaration::new(target)
}

fn chain_graph() -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    graph.register("a", vec![dep("b")]).unwrap();
    graph.register("b", vec![dep("c")]).unwrap();
    graph.register("c", vec![]).unwrap();
    graph
}

#[test]
fn chain_loads_leaf_first() {
    let graph = chain_graph();
    assert_eq!(graph.load_order(&["a", "b", "c"]), vec!["c", "b", "a"]);
}

#[test]
fn mutual_dependency_is_detected() {
    let mut graph = DependencyGraph::new();
    graph.register("a", vec![dep("b")]).unwrap();
    graph.register("b", vec![dep("a")]).unwrap();

    assert!(!graph.detect_circular("a").is_empty());
    assert!(!graph.validate().valid);
}

#[test]
fn missing_dependency_names_both_ids() {
    let mut graph = DependencyGraph::new();
    graph.register("x", vec![dep("missing")]).unwrap();

    let report = graph.validate();
    assert!(!report.valid);
    assert!(report
        .errors
        .iter()
        .any(|error| error.contains("x") && error.contains("missing")));
}

#[test]
fn depth_cap_truncates_second_level() {
    let graph = chain_graph();
    let tree = graph.dependency_tree("a", 1).unwrap();
    let value = serde_json::to_value(&tree).unwrap();

    let b = &value["dependencies"][0]["tree"];
    assert_eq!(b["id"], "b");
    assert_eq!(
        b["dependencies"][0]["tree"],
        serde_json::json!({ "id": "c", "truncated": true })
    );
}

#[test]
fn optional_edge_cannot_close_cycle() {
    let mut graph = DependencyGraph::new();
    graph
        .register("a", vec![DependencyDeclaration::optional("b")])
        .unwrap();
    graph.register("b", vec![dep("a")]).unwrap();

    assert!(graph.detect_circular("a").is_empty());
    assert!(graph.validate().valid);
}

#[test]
fn clear_empties_every_query() {
    let mut graph = chain_graph();
    graph.clear();

    assert!(graph.dependencies("a").is_empty());
    assert!(graph.dependencies_recursive("a").is_empty());
    assert!(graph.dependents("c").is_empty());
    assert!(graph.dependency_tree("a", DEFAULT_TREE_DEPTH).is_none());
    assert!(graph.detect_all_circular().is_empty());
    assert!(graph.full_load_order().is_empty());
    assert_eq!(graph.stats().total_templates, 0);
    assert!(graph.validate().valid);
}

#[test]
fn level_follows_single_dependency() {
    let mut graph = DependencyGraph::new();
    graph.register("l0", vec![]).unwrap();
    graph.register("l1", vec![dep("l0")]).unwrap();
    graph.register("l2", vec![dep("l1")]).unwrap();
    graph.register("l3", vec![dep("l2")]).unwrap();

    assert_eq!(graph.node("l0").unwrap().level, 0);
    assert_eq!(graph.node("l2").unwrap().level, 2);
    assert_eq!(graph.node("l3").unwrap().level, 3);
}

#[test]
fn cycle_behind_root_raises_levels() {
    let mut graph = DependencyGraph::new();
    graph.register("root", vec![]).unwrap();
    graph.register("a", vec![dep("root"), dep("b")]).unwrap();
    graph.register("b", vec![dep("a")]).unwrap();
    graph.register("top", vec![dep("a")]).unwrap();

    let level = |id: &str| graph.node(id).unwrap().level;
    assert!(level("b") > 0);
    assert!(level("top") > level("a"));

    let stats = graph.stats();
    assert_eq!(stats.max_level, level("top"));
    assert!(stats.max_level > 0);
    assert_eq!(stats.circular_dependencies, 1);
}

#[test]
fn long_chain_is_handled_by_every_traversal() {
    const LENGTH: usize = 500;
    let mut graph = DependencyGraph::new();
    graph.register("t0", vec![]).unwrap();
    for i in 1..LENGTH {
        graph
            .register(&format!("t{i}"), vec![dep(&format!("t{}", i - 1))])
            .unwrap();
    }
    let last = format!("t{}", LENGTH - 1);

    assert_eq!(graph.node(&last).unwrap().level, LENGTH - 1);
    assert_eq!(graph.stats().max_level, LENGTH - 1);
    assert_eq!(graph.dependencies_recursive(&last).len(), LENGTH - 1);
    assert_eq!(graph.dependents_recursive("t0").len(), LENGTH - 1);

    let order = graph.load_order(&[last.as_str()]);
    assert_eq!(order.len(), LENGTH);
    assert_eq!(order[0], "t0");
    assert_eq!(order[LENGTH - 1], last);

    assert!(graph.detect_all_circular().is_empty());
    assert!(graph.validate().valid);

    let tree = graph.dependency_tree(&last, LENGTH).unwrap();
    let mut depth = 0;
    let mut cursor = &tree;
    while let Some(entry) = cursor.children().first() {
        cursor = &entry.tree;
        depth += 1;
    }
    assert_eq!(depth, LENGTH - 1);
    assert_eq!(cursor.id(), "t0");
}

/// Random DAG: template `i` may only depend on templates with a smaller
/// index, so no cycle can form.
fn acyclic_graph() -> impl Strategy<Value = Vec<Vec<(usize, bool)>>> {
    (1usize..24).prop_flat_map(|size| {
        (0..size)
            .map(|i| {
                if i == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec((0..i, any::<bool>()), 0..4).boxed()
                }
            })
            .collect::<Vec<_>>()
    })
}

fn build(edges: &[Vec<(usize, bool)>]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for (i, targets) in edges.iter().enumerate() {
        let deps = targets
            .iter()
            .map(|&(target, optional)| {
                let target = format!("t{target}");
                if optional {
                    DependencyDeclaration::optional(target)
                } else {
                    DependencyDeclaration::new(target)
                }
            })
            .collect();
        graph.register(&format!("t{i}"), deps).unwrap();
    }
    graph
}

proptest! {
    #[test]
    fn load_order_respects_dependencies(edges in acyclic_graph()) {
        let graph = build(&edges);
        let ids: Vec<String> = graph.ids().map(str::to_string).collect();
        let order = graph.load_order(&ids);

        prop_assert_eq!(order.len(), ids.len());
        let position = |id: &str| order.iter().position(|entry| entry == id).unwrap();
        for node in graph.nodes() {
            for dep in node.required_dependencies() {
                prop_assert!(position(&dep.target_id) < position(&node.id));
            }
        }
    }

    #[test]
    fn acyclic_graphs_validate_and_level_correctly(edges in acyclic_graph()) {
        let graph = build(&edges);
        prop_assert!(graph.validate().valid);
        prop_assert!(!graph.has_cycles());

        for node in graph.nodes() {
            let expected = node
                .required_dependencies()
                .map(|dep| graph.node(&dep.target_id).unwrap().level + 1)
                .max()
                .unwrap_or(0);
            prop_assert_eq!(node.level, expected);
        }
    }

    #[test]
    fn reregistering_is_idempotent(edges in acyclic_graph()) {
        let mut graph = build(&edges);
        let before: Vec<_> = graph.nodes().cloned().collect();

        for node in before.clone() {
            graph.register(&node.id, node.dependencies).unwrap();
        }

        let after: Vec<_> = graph.nodes().cloned().collect();
        prop_assert_eq!(before, after);
    }
}
