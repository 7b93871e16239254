//! Dependency resolution engine for templates and modules.
//!
//! This module provides the [`DependencyGraph`] store together with the
//! algorithms that run over it: cycle detection, level calculation, load
//! ordering, tree views and validation.
//!
//! # Example
//!
//! ```rust
//! use modgraph::graph::{DependencyDeclaration, DependencyGraph};
//!
//! let mut graph = DependencyGraph::new();
//! graph.register("page", vec![DependencyDeclaration::new("layout")]).unwrap();
//! graph.register("layout", vec![DependencyDeclaration::optional("analytics")]).unwrap();
//!
//! assert_eq!(graph.load_order(&["page"]), vec!["layout", "page"]);
//! assert!(graph.validate().valid);
//! ```

mod cycles;
mod levels;
mod order;
mod shared;
mod store;
mod tree;
mod types;
mod validate;

pub use shared::shared_graph;
pub use store::DependencyGraph;
pub use tree::{DependencyTree, TreeDependency, DEFAULT_TREE_DEPTH};
pub use types::{CircularChain, DependencyDeclaration, GraphError, GraphNode, GraphResult};
pub use validate::{GraphStats, MissingDependency, ValidationReport};
