//! Configuration management
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (trgraph.toml)
//! - Environment variables (TRGRAPH__*)
//!
//! ## Example config file (trgraph.toml):
//! ```toml
//! [graph]
//! extensions = ["primitives", "field"]
//!
//! [codegen]
//! output = "src/generated/links.rs"
//! language = "rust"
//! const_name = "GRAPH_LINKS"
//!
//! [log]
//! filter = "trgraph=debug"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrGraphConfig {
    /// Which extensions populate the graph
    #[serde(default)]
    pub graph: GraphConfig,

    /// Link-name code generation
    #[serde(default)]
    pub codegen: CodegenConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

/// Graph construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Built-in extensions to install, in order
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Code generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Where generated code is written
    #[serde(default = "default_codegen_output")]
    pub output: PathBuf,

    /// Target language
    #[serde(default)]
    pub language: Language,

    /// Name of the generated constant holding every link name
    #[serde(default = "default_const_name")]
    pub const_name: String,
}

/// Target language for generated link names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Rust,
    TypeScript,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_extensions() -> Vec<String> {
    vec!["primitives".to_string(), "field".to_string()]
}

fn default_codegen_output() -> PathBuf {
    PathBuf::from("generated/links.rs")
}

fn default_const_name() -> String {
    "GRAPH_LINKS".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            output: default_codegen_output(),
            language: Language::default(),
            const_name: default_const_name(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl TrGraphConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["trgraph.toml", ".trgraph.toml", "config/trgraph.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "trgraph", "trgraph") {
            let xdg_config = config_dir.config_dir().join("trgraph.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TRGRAPH")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("graph.extensions")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrGraphConfig::default();
        assert_eq!(config.graph.extensions, vec!["primitives", "field"]);
        assert_eq!(config.codegen.language, Language::Rust);
        assert_eq!(config.codegen.const_name, "GRAPH_LINKS");
    }

    #[test]
    fn test_serialize_config() {
        let config = TrGraphConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[graph]"));
        assert!(toml_str.contains("[codegen]"));
        assert!(toml_str.contains("language = \"rust\""));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[graph]\nextensions = [\"primitives\"]\n\n[codegen]\nlanguage = \"typescript\"\n",
        )
        .unwrap();

        let config = TrGraphConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.graph.extensions, vec!["primitives"]);
        assert_eq!(config.codegen.language, Language::TypeScript);
        assert_eq!(config.codegen.const_name, "GRAPH_LINKS");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = TrGraphConfig::default();
        config.log.filter = "trgraph=trace".to_string();
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = TrGraphConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.log.filter, "trgraph=trace");
    }
}
