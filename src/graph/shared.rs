//! Opt-in process-wide graph.
//!
//! Most hosts should own a [`DependencyGraph`] and pass it around by
//! reference. Hosts that genuinely need one graph reachable from anywhere
//! can call [`shared_graph`]; nothing in this crate uses it implicitly.
//!
//! The lock allows concurrent readers while keeping `register` and `clear`
//! exclusive, so no reader sees a half-finished relevel.

use std::sync::{OnceLock, RwLock};

use super::store::DependencyGraph;

static SHARED: OnceLock<RwLock<DependencyGraph>> = OnceLock::new();

/// Returns the process-wide graph, creating it empty on first use.
///
/// # Example
///
/// ```rust
/// use modgraph::graph::{shared_graph, DependencyDeclaration};
///
/// if let Ok(mut graph) = shared_graph().write() {
///     graph.register("shell", vec![DependencyDeclaration::new("theme")]).unwrap();
/// }
/// let graph = shared_graph().read().unwrap();
/// assert!(graph.contains("theme"));
/// ```
pub fn shared_graph() -> &'static RwLock<DependencyGraph> {
    SHARED.get_or_init(|| RwLock::new(DependencyGraph::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_instance() {
        assert!(std::ptr::eq(shared_graph(), shared_graph()));
    }

    #[test]
    fn test_independent_from_owned_graphs() {
        let mut owned = DependencyGraph::new();
        owned.register("only-owned", vec![]).unwrap();

        let shared = shared_graph().read().unwrap();
        assert!(!shared.contains("only-owned"));
    }
}
