//! modgraph - Dependency resolution engine for template and module registries
//!
//! This crate tracks "template A requires template B" relationships,
//! detects circular dependencies, computes dependency-first load orders and
//! validates that every required template has been registered.

pub mod export;
pub mod graph;
pub mod manifest;
