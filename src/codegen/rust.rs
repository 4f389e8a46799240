//! Rust Link-Name Emitter
//!
//! Emits a `&[&str]` constant and a `GraphLink` enum whose variants map one
//! to one onto registered link names. `GraphLink` implements `AsRef<str>`, so
//! its values can be used directly as chain entries.

use super::names::ResolvedName;

/// Emit the Rust body for `names` (header excluded)
pub fn emit(names: &[ResolvedName], const_name: &str) -> String {
    let mut output = String::new();

    output.push_str("/// Every registered link name\n");
    output.push_str(&format!("pub const {}: &[&str] = &[\n", const_name));
    for name in names {
        output.push_str(&format!("    {:?},\n", name.link));
    }
    output.push_str("];\n\n");

    output.push_str("/// A registered link name\n");
    output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
    output.push_str("pub enum GraphLink {\n");
    for name in names {
        output.push_str(&format!("    /// `{}`\n", name.link));
        output.push_str(&format!("    {},\n", name.ident));
    }
    output.push_str("}\n\n");

    output.push_str("impl GraphLink {\n");
    output.push_str("    pub const ALL: &'static [GraphLink] = &[\n");
    for name in names {
        output.push_str(&format!("        GraphLink::{},\n", name.ident));
    }
    output.push_str("    ];\n\n");
    output.push_str("    pub const fn as_str(self) -> &'static str {\n");
    output.push_str("        match self {\n");
    for name in names {
        output.push_str(&format!("            GraphLink::{} => {:?},\n", name.ident, name.link));
    }
    output.push_str("        }\n");
    output.push_str("    }\n");
    output.push_str("}\n\n");

    output.push_str("impl AsRef<str> for GraphLink {\n");
    output.push_str("    fn as_ref(&self) -> &str {\n");
    output.push_str("        self.as_str()\n");
    output.push_str("    }\n");
    output.push_str("}\n\n");

    output.push_str("impl std::str::FromStr for GraphLink {\n");
    output.push_str("    type Err = String;\n\n");
    output.push_str("    fn from_str(s: &str) -> Result<Self, Self::Err> {\n");
    output.push_str("        match s {\n");
    for name in names {
        output.push_str(&format!("            {:?} => Ok(GraphLink::{}),\n", name.link, name.ident));
    }
    output.push_str("            other => Err(format!(\"unknown link: {}\", other)),\n");
    output.push_str("        }\n");
    output.push_str("    }\n");
    output.push_str("}\n");

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::names::resolve;

    #[test]
    fn test_emit_rust() {
        let names = resolve(["fp:mod.order", "uint64-fp:field"]);
        let code = emit(&names, "GRAPH_LINKS");

        assert!(code.contains("pub const GRAPH_LINKS: &[&str] = &[\n    \"fp:mod.order\",\n    \"uint64-fp:field\",\n];"));
        assert!(code.contains("    FpModOrder,\n"));
        assert!(code.contains("GraphLink::Uint64FpField => \"uint64-fp:field\","));
        assert!(code.contains("\"fp:mod.order\" => Ok(GraphLink::FpModOrder),"));
    }
}
