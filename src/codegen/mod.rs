//! Code Generation
//!
//! Emits the registered link names as a closed set of constants so that
//! statically typed callers can check chains at compile time.
//!
//! Every output starts with a header carrying the registry fingerprint. The
//! generated file can later be compared against a registry with [`check`] to
//! detect links that were added or removed since generation.

pub mod names;
pub mod rust;
pub mod typescript;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::checksum::Fingerprint;
use crate::config::{CodegenConfig, Language};
use crate::error::Result;
use crate::registry::Registry;

const GENERATED_MARKER: &str = "@generated by trgraph codegen. Do not edit.";
const FINGERPRINT_PREFIX: &str = "registry-fingerprint: ";

/// Result of comparing generated code with a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    /// The generated code matches the registry
    UpToDate,
    /// The generated code was produced from a different registry
    Stale {
        expected: Fingerprint,
        found: Option<Fingerprint>,
    },
}

impl Drift {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Drift::UpToDate)
    }
}

/// Generate link-name code for every link in `registry`
pub fn generate(registry: &Registry, config: &CodegenConfig) -> String {
    let resolved = names::resolve(registry.link_names());
    let body = match config.language {
        Language::Rust => rust::emit(&resolved, &config.const_name),
        Language::TypeScript => typescript::emit(&resolved, &config.const_name),
    };

    let mut output = String::new();
    output.push_str(&format!("// {}\n", GENERATED_MARKER));
    output.push_str(&format!("// {}{}\n\n", FINGERPRINT_PREFIX, registry.fingerprint()));
    output.push_str(&body);
    output
}

/// Generate and write to `config.output`, creating parent directories
pub fn write(registry: &Registry, config: &CodegenConfig) -> Result<()> {
    let code = generate(registry, config);
    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&config.output, code)?;
    info!(
        output = %config.output.display(),
        links = registry.link_count(),
        "wrote link names"
    );
    Ok(())
}

/// Fingerprint recorded in previously generated code
pub fn recorded_fingerprint(existing: &str) -> Option<Fingerprint> {
    existing
        .lines()
        .take_while(|line| line.starts_with("//"))
        .find_map(|line| {
            line.trim_start_matches('/')
                .trim()
                .strip_prefix(FINGERPRINT_PREFIX)
                .map(|hash| Fingerprint::from(hash.trim()))
        })
}

/// Compare previously generated code with `registry`
pub fn check(existing: &str, registry: &Registry) -> Drift {
    let expected = registry.fingerprint();
    match recorded_fingerprint(existing) {
        Some(found) if found == expected => Drift::UpToDate,
        found => Drift::Stale { expected, found },
    }
}

/// Read a generated file and compare it with `registry`
pub fn check_file(path: &Path, registry: &Registry) -> Result<Drift> {
    let existing = fs::read_to_string(path)?;
    Ok(check(&existing, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;

    fn registry(links: &[&str]) -> Registry {
        let mut registry = Registry::new();
        registry
            .register_links(links.iter().map(|name| Link::identity(*name)).collect())
            .unwrap();
        registry
    }

    #[test]
    fn test_generate_has_header() {
        let registry = registry(&["b", "a"]);
        let code = generate(&registry, &CodegenConfig::default());
        assert!(code.starts_with("// @generated by trgraph codegen. Do not edit.\n"));
        assert_eq!(recorded_fingerprint(&code), Some(registry.fingerprint()));
        assert!(code.find("\"a\"").unwrap() < code.find("\"b\"").unwrap());
    }

    #[test]
    fn test_check_detects_drift() {
        let old = registry(&["a"]);
        let code = generate(&old, &CodegenConfig::default());
        assert!(check(&code, &old).is_up_to_date());

        let new = registry(&["a", "b"]);
        match check(&code, &new) {
            Drift::Stale { expected, found } => {
                assert_eq!(expected, new.fingerprint());
                assert_eq!(found, Some(old.fingerprint()));
            }
            Drift::UpToDate => panic!("expected drift"),
        }

        assert!(matches!(
            check("pub const X: u8 = 0;", &new),
            Drift::Stale { found: None, .. }
        ));
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = CodegenConfig {
            output: dir.path().join("nested/links.ts"),
            language: Language::TypeScript,
            const_name: "LINKS".to_string(),
        };
        let registry = registry(&["x"]);
        write(&registry, &config).unwrap();

        let drift = check_file(&config.output, &registry).unwrap();
        assert!(drift.is_up_to_date());
        let code = fs::read_to_string(&config.output).unwrap();
        assert!(code.contains("export type GraphLink = typeof LINKS[number];"));
    }
}
