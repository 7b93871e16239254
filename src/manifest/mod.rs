//! Manifest loading.
//!
//! A manifest is the serialized output of template discovery: a list of
//! template ids with their dependency declarations. Loading one and
//! registering it rebuilds the dependency graph from scratch.
//!
//! # Format
//!
//! ```json
//! {
//!   "name": "storefront",
//!   "templates": [
//!     { "id": "page", "dependencies": [ { "targetId": "layout", "version": "^2" } ] },
//!     { "id": "layout" }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use modgraph::manifest;
//!
//! let manifest = manifest::parse_file(Path::new("templates.json")).unwrap();
//! let graph = manifest.to_graph().unwrap();
//! println!("{} templates", graph.len());
//! ```

pub mod json;
pub mod types;

pub use json::{parse_file, parse_str, validate, ManifestError, ManifestResult};
pub use types::{Manifest, TemplateEntry};
