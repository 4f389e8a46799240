//! TypeScript Link-Name Emitter
//!
//! Emits a readonly tuple of link names and a string-literal union type over it.

use super::names::ResolvedName;

/// Emit the TypeScript body for `names` (header excluded)
pub fn emit(names: &[ResolvedName], const_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("export const {} = [\n", const_name));
    for name in names {
        let literal = serde_json::Value::String(name.link.clone()).to_string();
        output.push_str(&format!("  {},\n", literal));
    }
    output.push_str("] as const;\n\n");
    output.push_str(&format!("export type GraphLink = typeof {}[number];\n", const_name));

    output
}
