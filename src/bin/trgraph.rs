//! trgraph CLI
//!
//! Inspect the conversion graph, run chains and schema transforms on JSON
//! input, export the graph, and generate link-name constants.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use trgraph::codegen::{self, Drift};
use trgraph::config::Language;
use trgraph::{DataTree, Schema, TrGraph, TrGraphConfig, Value};

#[derive(Parser)]
#[command(name = "trgraph")]
#[command(about = "Run typed conversion chains and schema transforms")]
#[command(version)]
struct Cli {
    /// Config file (defaults: trgraph.toml, .trgraph.toml, config/trgraph.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered types
    Types,

    /// List registered links
    Links {
        /// Only links whose input or output is this type
        #[arg(short, long)]
        touching: Option<String>,
    },

    /// Run a JSON value through a chain of links
    Transform {
        /// Link names, applied in order
        #[arg(short = 'l', long = "link", required = true)]
        chain: Vec<String>,

        /// Input value as JSON
        value: String,
    },

    /// Transform a JSON object with a JSON schema of chains
    Object {
        /// Input object file
        #[arg(short, long)]
        input: PathBuf,

        /// Schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Print only the linear result
        #[arg(long)]
        linear: bool,
    },

    /// Export the graph in GraphViz DOT format
    Graph {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate link-name constants
    Codegen {
        /// Output file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target language (overrides config)
        #[arg(short, long, value_enum)]
        language: Option<LanguageArg>,

        /// Check the existing output for drift instead of writing
        #[arg(long)]
        check: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    Rust,
    Typescript,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Rust => Language::Rust,
            LanguageArg::Typescript => Language::TypeScript,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match TrGraphConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, mut config: TrGraphConfig) -> anyhow::Result<()> {
    let graph = TrGraph::from_config(&config.graph)?;

    match command {
        Commands::Types => {
            for node in graph.registry().types() {
                match node.element() {
                    Some(element) => println!("{}  (spread of {})", node.name(), element),
                    None => println!("{}", node.name()),
                }
            }
        }

        Commands::Links { touching } => {
            for link in graph.registry().links() {
                let shown = touching
                    .as_deref()
                    .map_or(true, |t| link.input() == t || link.output() == t);
                if shown {
                    println!("{}", link);
                }
            }
        }

        Commands::Transform { chain, value } => {
            let json: serde_json::Value = serde_json::from_str(&value)?;
            let result = graph.transform(Value::from_json(&json)?, &chain)?;
            println!("{}", serde_json::to_string_pretty(&result.to_json())?);
        }

        Commands::Object { input, schema, linear } => {
            let input = DataTree::parse(&fs::read_to_string(&input)?)?;
            let schema = Schema::parse(&fs::read_to_string(&schema)?)?;
            let out = graph.object_transform(&input, &schema)?;
            let json = if linear {
                serde_json::Value::Array(out.linear.iter().map(Value::to_json).collect())
            } else {
                out.to_json()
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }

        Commands::Graph { output } => {
            let dot = graph.to_dot();
            match output {
                Some(path) => {
                    fs::write(&path, dot)?;
                    eprintln!("Exported DOT to: {}", path.display());
                }
                None => print!("{}", dot),
            }
        }

        Commands::Codegen { output, language, check } => {
            if let Some(output) = output {
                config.codegen.output = output;
            }
            if let Some(language) = language {
                config.codegen.language = language.into();
            }

            if check {
                match codegen::check_file(&config.codegen.output, graph.registry())? {
                    Drift::UpToDate => {
                        println!("{} is up to date", config.codegen.output.display());
                    }
                    Drift::Stale { expected, found } => {
                        println!(
                            "{} is stale: expected fingerprint {}, found {}",
                            config.codegen.output.display(),
                            expected,
                            found.map_or_else(|| "none".to_string(), |f| f.to_string())
                        );
                        std::process::exit(1);
                    }
                }
            } else {
                codegen::write(graph.registry(), &config.codegen)?;
                println!(
                    "Generated {} link names into {}",
                    graph.registry().link_count(),
                    config.codegen.output.display()
                );
            }
        }
    }

    Ok(())
}
