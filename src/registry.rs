//! Type and Link Registry
//!
//! Two name-keyed maps, grown only by adding entries. A name that is already
//! present is never overwritten: registration fails with
//! [`GraphError::DuplicateName`] and the registry is left as it was.

use std::collections::{HashMap, HashSet};

use crate::checksum::Fingerprint;
use crate::error::{EntryKind, GraphError, Result};
use crate::link::Link;
use crate::node::TypeNode;

/// Named types and links
#[derive(Debug, Default, Clone)]
pub struct Registry {
    types: HashMap<String, TypeNode>,
    links: HashMap<String, Link>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add types. Fails without inserting anything if any name collides.
    pub fn register_types(&mut self, types: Vec<TypeNode>) -> Result<()> {
        self.register(types, Vec::new())
    }

    /// Add links. Fails without inserting anything if any name collides.
    pub fn register_links(&mut self, links: Vec<Link>) -> Result<()> {
        self.register(Vec::new(), links)
    }

    /// Add types and links as one batch.
    ///
    /// The batch is checked against the registry and against itself before
    /// any entry is inserted.
    pub fn register(&mut self, types: Vec<TypeNode>, links: Vec<Link>) -> Result<()> {
        check_names(EntryKind::Type, types.iter().map(TypeNode::name), |n| {
            self.types.contains_key(n)
        })?;
        check_names(EntryKind::Link, links.iter().map(Link::name), |n| {
            self.links.contains_key(n)
        })?;

        for node in types {
            self.types.insert(node.name().to_string(), node);
        }
        for link in links {
            self.links.insert(link.name().to_string(), link);
        }
        Ok(())
    }

    /// Look up a type by name
    pub fn lookup_type(&self, name: &str) -> Result<&TypeNode> {
        self.types.get(name).ok_or_else(|| GraphError::UnknownType {
            name: name.to_string(),
        })
    }

    /// Look up a link by name
    pub fn lookup_link(&self, name: &str) -> Result<&Link> {
        self.links.get(name).ok_or_else(|| GraphError::UnknownLink {
            name: name.to_string(),
        })
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeNode> {
        self.types.get(name)
    }

    pub fn get_link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// All types, sorted by name
    pub fn types(&self) -> Vec<&TypeNode> {
        let mut types: Vec<_> = self.types.values().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types
    }

    /// All links, sorted by name
    pub fn links(&self) -> Vec<&Link> {
        let mut links: Vec<_> = self.links.values().collect();
        links.sort_by(|a, b| a.name().cmp(b.name()));
        links
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types().into_iter().map(TypeNode::name).collect()
    }

    pub fn link_names(&self) -> Vec<&str> {
        self.links().into_iter().map(Link::name).collect()
    }

    /// Fingerprint of every type and link signature.
    ///
    /// Transform functions and predicates are not part of the fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        let types = self.types().into_iter().map(|node| match node.element() {
            Some(element) => format!("type {} spread {}", node.name(), element),
            None => format!("type {}", node.name()),
        });
        let links = self
            .links()
            .into_iter()
            .map(|link| format!("link {} {} {}", link.name(), link.input(), link.output()));
        Fingerprint::from_lines(types.chain(links))
    }
}

fn check_names<'a>(
    kind: EntryKind,
    names: impl Iterator<Item = &'a str>,
    exists: impl Fn(&str) -> bool,
) -> Result<()> {
    let mut batch = HashSet::new();
    for name in names {
        if exists(name) || !batch.insert(name) {
            return Err(GraphError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
