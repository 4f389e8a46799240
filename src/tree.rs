//! Schema and data trees
//!
//! Both trees share one shape: a leaf, or an ordered list of keyed children.
//! Key order is the declaration order and drives traversal order.

use std::fmt;

use crate::error::{GraphError, Result};
use crate::value::{is_tagged_json, Value};

/// An ordered list of link names
pub type Chain = Vec<String>;

/// A tree whose leaves are chains
pub type Schema = Tree<Chain>;

/// A tree whose leaves are values
pub type DataTree = Tree<Value>;

/// A leaf or a node of keyed children in declaration order
#[derive(Debug, Clone, PartialEq)]
pub enum Tree<L> {
    Leaf(L),
    Node(Vec<(String, Tree<L>)>),
}

impl<L> Tree<L> {
    /// Build a node from keyed children, keeping their order
    pub fn node<K, I>(children: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Tree<L>)>,
    {
        Tree::Node(children.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Child of a node by key
    pub fn get(&self, key: &str) -> Option<&Tree<L>> {
        match self {
            Tree::Node(children) => children.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Tree::Leaf(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    /// Number of leaves below (or at) this tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Tree::Leaf(_) => 1,
            Tree::Node(children) => children.iter().map(|(_, v)| v.leaf_count()).sum(),
        }
    }
}

impl Schema {
    /// Leaf holding a chain
    pub fn chain<S: Into<String>>(links: impl IntoIterator<Item = S>) -> Self {
        Tree::Leaf(links.into_iter().map(Into::into).collect())
    }

    /// Load a schema from JSON: arrays of strings are chains, objects are nodes
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        schema_from_json(json, &mut FieldPath::root())
    }

    /// Parse a schema from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(&json)
    }
}

fn schema_from_json(json: &serde_json::Value, path: &mut FieldPath) -> Result<Schema> {
    match json {
        serde_json::Value::Array(items) => {
            let mut chain = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(name) => chain.push(name.to_string()),
                    None => {
                        return Err(GraphError::InvalidSchema {
                            path: path.clone(),
                            reason: format!("chain entries must be link names, got {}", item),
                        })
                    }
                }
            }
            Ok(Tree::Leaf(chain))
        }
        serde_json::Value::Object(map) => {
            let mut children = Vec::with_capacity(map.len());
            for (key, child) in map {
                path.push(key);
                let tree = schema_from_json(child, path);
                path.pop();
                children.push((key.clone(), tree?));
            }
            Ok(Tree::Node(children))
        }
        other => Err(GraphError::InvalidSchema {
            path: path.clone(),
            reason: format!("expected a chain or an object, got {}", other),
        }),
    }
}

impl DataTree {
    /// Leaf holding a value
    pub fn value(value: impl Into<Value>) -> Self {
        Tree::Leaf(value.into())
    }

    /// Load input data from JSON: objects are nodes unless they encode a tagged value
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) if !is_tagged_json(map) => {
                let mut children = Vec::with_capacity(map.len());
                for (key, child) in map {
                    children.push((key.clone(), Self::from_json(child)?));
                }
                Ok(Tree::Node(children))
            }
            other => Value::from_json(other).map(Tree::Leaf),
        }
    }

    /// Parse input data from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json(&json)
    }

    /// Render as JSON, nodes as objects in key order
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Tree::Leaf(value) => value.to_json(),
            Tree::Node(children) => serde_json::Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Dotted key path from the root of a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>) {
        self.0.push(key.into());
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}
