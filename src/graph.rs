//! Conversion Graph
//!
//! [`TrGraph`] owns a [`Registry`] and executes explicit chains of link names
//! against it. There is no path search: a chain runs exactly the links it
//! names, in order, and the input of every step is checked against the
//! step's declared input type before the link is applied.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, info, trace};

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::extensions::{self, Extension};
use crate::link::Link;
use crate::node::{NodeKind, TypeNode};
use crate::registry::Registry;
use crate::value::Value;

/// A registry of types and links plus the chain executor
#[derive(Debug, Default, Clone)]
pub struct TrGraph {
    registry: Registry,
}

impl TrGraph {
    /// Create a graph with no types or links
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph pre-populated with `types` and `links`
    pub fn with(types: Vec<TypeNode>, links: Vec<Link>) -> Result<Self> {
        let mut graph = Self::new();
        graph.extend(types, links)?;
        Ok(graph)
    }

    /// Create a graph with every built-in extension installed
    pub fn standard() -> Result<Self> {
        let mut graph = Self::new();
        for extension in extensions::builtin() {
            graph.install(extension.as_ref())?;
        }
        Ok(graph)
    }

    /// Create a graph with the extensions named in the configuration
    pub fn from_config(config: &GraphConfig) -> Result<Self> {
        let mut graph = Self::new();
        for name in &config.extensions {
            let extension = extensions::by_name(name)
                .ok_or_else(|| GraphError::UnknownExtension(name.clone()))?;
            graph.install(extension.as_ref())?;
        }
        Ok(graph)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Merge more types and links into the graph.
    ///
    /// A name that is already registered rejects the whole call.
    pub fn extend(&mut self, types: Vec<TypeNode>, links: Vec<Link>) -> Result<()> {
        let (type_count, link_count) = (types.len(), links.len());
        self.registry.register(types, links)?;
        info!(
            types = type_count,
            links = link_count,
            total_types = self.registry.type_count(),
            total_links = self.registry.link_count(),
            "extended conversion graph"
        );
        Ok(())
    }

    /// Install the types and links of an extension
    pub fn install(&mut self, extension: &dyn Extension) -> Result<()> {
        debug!(extension = extension.name(), "installing extension");
        self.extend(extension.types(), extension.links())
    }

    /// Whether `value` belongs to the type called `type_name`
    pub fn is_type(&self, type_name: &str, value: &Value) -> Result<bool> {
        let node = self.registry.lookup_type(type_name)?;
        self.is_member(node, value)
    }

    fn is_member(&self, node: &TypeNode, value: &Value) -> Result<bool> {
        match node.kind() {
            NodeKind::Scalar(predicate) => Ok(predicate(value)),
            NodeKind::Spread { element } => {
                let element = self.registry.lookup_type(element)?;
                let Value::List(items) = value else {
                    return Ok(false);
                };
                for item in items {
                    if !self.is_member(element, item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Run `value` through the links named in `chain`, in order
    pub fn transform<S: AsRef<str>>(&self, value: Value, chain: &[S]) -> Result<Value> {
        if chain.is_empty() {
            return Err(GraphError::EmptyChain);
        }

        let mut current = value;
        for (step, name) in chain.iter().enumerate() {
            let name = name.as_ref();
            let link = self.registry.lookup_link(name)?;
            let input = self.registry.lookup_type(link.input())?;

            if !self.is_member(input, &current)? {
                debug!(link = name, step, value = %current, "input rejected");
                return Err(GraphError::TypeMismatch {
                    link: name.to_string(),
                    expected: link.input().to_string(),
                });
            }

            trace!(link = name, step, input = %current, "applying link");
            current = link
                .apply(current)
                .map_err(|source| GraphError::transform_failed(name, source))?;
        }
        Ok(current)
    }

    /// Run a chain and extract a concrete Rust value from the result
    pub fn transform_into<T, S>(&self, value: Value, chain: &[S]) -> Result<T>
    where
        T: TryFrom<Value, Error = GraphError>,
        S: AsRef<str>,
    {
        T::try_from(self.transform(value, chain)?)
    }

    /// Render types and links as a GraphViz DOT digraph.
    ///
    /// Link endpoints that name unregistered types are drawn dashed.
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraph<String, String> = DiGraph::new();
        let mut indices: HashMap<String, NodeIndex> = HashMap::new();

        for node in self.registry.types() {
            let idx = graph.add_node(node.name().to_string());
            indices.insert(node.name().to_string(), idx);
        }
        for link in self.registry.links() {
            let from = endpoint(&mut graph, &mut indices, link.input());
            let to = endpoint(&mut graph, &mut indices, link.output());
            graph.add_edge(from, to, link.name().to_string());
        }

        let mut output = String::new();
        output.push_str("digraph TrGraph {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=\"rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        for idx in graph.node_indices() {
            let name = &graph[idx];
            let style = match self.registry.get_type(name) {
                Some(node) if node.is_spread() => ", peripheries=2",
                Some(_) => "",
                None => ", style=\"dashed\"",
            };
            output.push_str(&format!("  \"{}\" [label=\"{}\"{}];\n", escape(name), escape(name), style));
        }

        output.push('\n');

        for edge in graph.edge_references() {
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                escape(&graph[edge.source()]),
                escape(&graph[edge.target()]),
                escape(edge.weight())
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn endpoint(
    graph: &mut DiGraph<String, String>,
    indices: &mut HashMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    *indices
        .entry(name.to_string())
        .or_insert_with(|| graph.add_node(name.to_string()))
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
