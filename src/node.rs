//! Type descriptors (graph nodes)

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Membership test for a scalar type
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// How membership in a type is decided
#[derive(Clone)]
pub enum NodeKind {
    /// A single predicate over the value
    Scalar(Predicate),
    /// A list whose every element belongs to `element`
    Spread { element: String },
}

/// A named category of values
#[derive(Clone)]
pub struct TypeNode {
    name: String,
    kind: NodeKind,
}

impl TypeNode {
    /// Create a type decided by a predicate
    pub fn scalar<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: NodeKind::Scalar(Arc::new(predicate)),
        }
    }

    /// Create a "many of `element`" type.
    ///
    /// The element type is looked up by name when membership is tested, so it
    /// may be registered later.
    pub fn spread(name: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Spread {
                element: element.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_spread(&self) -> bool {
        matches!(self.kind, NodeKind::Spread { .. })
    }

    /// Element type name for spread types
    pub fn element(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Spread { element } => Some(element),
            NodeKind::Scalar(_) => None,
        }
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TypeNode");
        s.field("name", &self.name);
        if let Some(element) = self.element() {
            s.field("spread", &element);
        }
        s.finish()
    }
}
