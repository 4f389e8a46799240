//! Identifier Resolution
//!
//! Maps opaque link names (`"uint64-fp:field"`, `"fp:mod.order"`) to unique
//! PascalCase identifiers. Collisions are resolved by numeric suffix in the
//! order names are resolved, so callers pass names in a stable order.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// A link name and the identifier chosen for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// The registered link name
    pub link: String,

    /// The generated identifier
    pub ident: String,

    /// Whether a suffix was added because of a collision
    pub disambiguated: bool,
}

fn separators() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern is valid"))
}

/// PascalCase of `s`, splitting on every run of non-alphanumeric characters
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for word in separators().split(s).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Identifier for one link name, before collision handling
pub fn base_ident(link: &str) -> String {
    let ident = to_pascal_case(link);
    match ident.chars().next() {
        None => "Link".to_string(),
        Some(c) if c.is_ascii_digit() => format!("L{ident}"),
        Some(_) if ident == "Self" => "Self_".to_string(),
        Some(_) => ident,
    }
}

/// Resolve identifiers for `links`, in the given order
pub fn resolve<'a>(links: impl IntoIterator<Item = &'a str>) -> Vec<ResolvedName> {
    let mut taken = HashSet::new();
    let mut resolved = Vec::new();

    for link in links {
        let base = base_ident(link);
        let (ident, disambiguated) = if taken.contains(&base) {
            let mut n = 2;
            while taken.contains(&format!("{base}{n}")) {
                n += 1;
            }
            (format!("{base}{n}"), true)
        } else {
            (base, false)
        };
        taken.insert(ident.clone());
        resolved.push(ResolvedName {
            link: link.to_string(),
            ident,
            disambiguated,
        });
    }

    resolved
}
