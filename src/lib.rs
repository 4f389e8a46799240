//! trgraph
//!
//! A typed conversion graph. Types are named membership tests over runtime
//! [`Value`]s; links are named, directed conversions between two types. Values
//! are converted by explicit chains of link names, never by path search.
//!
//! ## Features
//!
//! - **Checked chains**: every step's input is tested against the link's input type
//! - **Spread types**: "many of T" types that check every element
//! - **Schema transforms**: walk a nested object with a tree of chains, producing
//!   a mirrored tree and a flat, ordered list of results
//! - **Extensions**: add types and links to a live graph; names never shadow
//! - **Codegen**: emit registered link names as Rust or TypeScript constants
//!
//! ## Example
//!
//! ```
//! use trgraph::{DataTree, Schema, TrGraph, Value};
//!
//! let graph = TrGraph::standard().unwrap();
//! let field = graph.transform(Value::UInt(25), &["uint64-fp:field"]).unwrap();
//! assert!(graph.is_type("fp:field", &field).unwrap());
//!
//! let schema = Schema::parse(r#"{ "age": ["uint64-fp:field"], "name": ["utf8-bytes"] }"#).unwrap();
//! let input = DataTree::parse(r#"{ "age": 25, "name": "test" }"#).unwrap();
//! let out = graph.object_transform(&input, &schema).unwrap();
//! assert_eq!(out.linear.len(), 2);
//! ```

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod extensions;
pub mod graph;
pub mod link;
pub mod node;
pub mod object;
pub mod registry;
pub mod tree;
pub mod value;

pub use checksum::Fingerprint;
pub use config::TrGraphConfig;
pub use error::{BoxError, EntryKind, GraphError, Result};
pub use extensions::Extension;
pub use graph::TrGraph;
pub use link::Link;
pub use node::{NodeKind, TypeNode};
pub use object::Transformed;
pub use registry::Registry;
pub use tree::{Chain, DataTree, FieldPath, Schema, Tree};
pub use value::Value;
