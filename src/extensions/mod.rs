//! Extensions
//!
//! An extension is a table of types and links installed into a graph with
//! [`TrGraph::install`](crate::TrGraph::install). The engine treats them as
//! plain data; the built-in tables below are ordinary users of the API.

pub mod field;
pub mod primitives;

use crate::link::Link;
use crate::node::TypeNode;

pub use field::PrimeField;
pub use primitives::Primitives;

/// A named set of types and links
pub trait Extension {
    /// Name used in configuration
    fn name(&self) -> &str;

    fn types(&self) -> Vec<TypeNode>;

    fn links(&self) -> Vec<Link>;
}

/// Every built-in extension, in install order
pub fn builtin() -> Vec<Box<dyn Extension>> {
    vec![Box::new(Primitives), Box::new(PrimeField)]
}

/// Look up a built-in extension by name
pub fn by_name(name: &str) -> Option<Box<dyn Extension>> {
    builtin().into_iter().find(|ext| ext.name() == name)
}

/// Error type for transform functions that reject their input
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Rejected(pub String);

impl Rejected {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("primitives").map(|e| e.name().to_string()), Some("primitives".to_string()));
        assert_eq!(by_name("field").map(|e| e.name().to_string()), Some("field".to_string()));
        assert!(by_name("mina").is_none());
    }

    #[test]
    fn test_builtin_link_names_are_unique() {
        let mut names: Vec<String> = builtin()
            .iter()
            .flat_map(|ext| ext.links())
            .map(|link| link.name().to_string())
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
