//! Schema Transformer
//!
//! Walks an input tree and a schema tree in lockstep. Every schema leaf is a
//! chain; the input value at the same key path is run through it. Results are
//! collected twice: into a tree with the schema's shape, and into one flat
//! list in depth-first, declared-key order.

use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::graph::TrGraph;
use crate::tree::{Chain, DataTree, FieldPath, Schema, Tree};
use crate::value::Value;

/// Output of [`TrGraph::object_transform`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// Same shape as the schema, leaves replaced by chain outputs
    pub transformed: DataTree,
    /// Every leaf output in traversal order
    pub linear: Vec<Value>,
}

impl Transformed {
    /// Render as `{"transformed": ..., "linear": [...]}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "transformed": self.transformed.to_json(),
            "linear": self.linear.iter().map(Value::to_json).collect::<Vec<_>>(),
        })
    }
}

impl TrGraph {
    /// Transform `input` according to `schema`.
    ///
    /// Stops at the first failing leaf; nothing is returned for the leaves
    /// that already succeeded.
    pub fn object_transform(&self, input: &DataTree, schema: &Schema) -> Result<Transformed> {
        let mut walker = Walker {
            graph: self,
            path: FieldPath::root(),
            linear: Vec::with_capacity(schema.leaf_count()),
        };
        let transformed = walker.walk(input, schema)?;
        debug!(leaves = walker.linear.len(), "object transformed");
        Ok(Transformed {
            transformed,
            linear: walker.linear,
        })
    }
}

struct Walker<'a> {
    graph: &'a TrGraph,
    path: FieldPath,
    linear: Vec<Value>,
}

impl Walker<'_> {
    fn walk(&mut self, input: &DataTree, schema: &Schema) -> Result<DataTree> {
        match (schema, input) {
            (Tree::Leaf(chain), Tree::Leaf(value)) => self.leaf(value, chain).map(Tree::Leaf),
            (Tree::Leaf(_), Tree::Node(_)) => Err(GraphError::ShapeMismatch {
                path: self.path.clone(),
                expected: "a value",
            }),
            (Tree::Node(_), Tree::Leaf(_)) => Err(GraphError::ShapeMismatch {
                path: self.path.clone(),
                expected: "an object",
            }),
            (Tree::Node(fields), Tree::Node(_)) => {
                let mut out = Vec::with_capacity(fields.len());
                for (key, sub_schema) in fields {
                    self.path.push(key.as_str());
                    let sub_input = input.get(key).ok_or_else(|| GraphError::MissingField {
                        path: self.path.clone(),
                    })?;
                    let sub_output = self.walk(sub_input, sub_schema)?;
                    self.path.pop();
                    out.push((key.clone(), sub_output));
                }
                Ok(Tree::Node(out))
            }
        }
    }

    fn leaf(&mut self, value: &Value, chain: &Chain) -> Result<Value> {
        debug!(path = %self.path, chain = ?chain, "transforming field");
        let result = self.graph.transform(value.clone(), chain).map_err(|err| {
            warn!(path = %self.path, error = %err, "field transform failed");
            err
        })?;

        if self.is_spread_output(chain) {
            if let Value::List(items) = &result {
                self.linear.extend(items.iter().cloned());
                return Ok(result);
            }
        }
        self.linear.push(result.clone());
        Ok(result)
    }

    /// Whether the chain's last link declares a registered spread output type
    fn is_spread_output(&self, chain: &Chain) -> bool {
        let registry = self.graph.registry();
        chain
            .last()
            .and_then(|name| registry.get_link(name))
            .and_then(|link| registry.get_type(link.output()))
            .map(|node| node.is_spread())
            .unwrap_or(false)
    }
}
