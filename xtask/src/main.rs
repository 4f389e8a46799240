use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use trgraph::codegen::{self, Drift};
use trgraph::config::Language;
use trgraph::{TrGraph, TrGraphConfig};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Repository maintenance tasks for trgraph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate link-name constants for every configured language
    Links {
        /// Directory for the generated files
        #[arg(short, long, default_value = "generated")]
        out_dir: PathBuf,
    },
    /// Fail if generated link names no longer match the registry
    CheckLinks {
        #[arg(short, long, default_value = "generated")]
        out_dir: PathBuf,
    },
    /// Write the conversion graph as DOT
    Graph {
        #[arg(short, long, default_value = "trgraph.dot")]
        output: PathBuf,
    },
}

const TARGETS: [(Language, &str); 2] = [(Language::Rust, "links.rs"), (Language::TypeScript, "links.ts")];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = TrGraphConfig::load()?;
    let graph = TrGraph::from_config(&config.graph)?;

    match cli.command {
        Commands::Links { out_dir } => {
            for (language, file) in TARGETS {
                let mut codegen_config = config.codegen.clone();
                codegen_config.language = language;
                codegen_config.output = out_dir.join(file);
                codegen::write(graph.registry(), &codegen_config)?;
                println!("wrote {}", codegen_config.output.display());
            }
        }

        Commands::CheckLinks { out_dir } => {
            let mut stale = Vec::new();
            for (_, file) in TARGETS {
                let path = out_dir.join(file);
                if let Drift::Stale { .. } = codegen::check_file(&path, graph.registry())? {
                    stale.push(path.display().to_string());
                }
            }
            if !stale.is_empty() {
                bail!("stale generated files: {} (run `cargo run -p xtask -- links`)", stale.join(", "));
            }
            println!("generated link names are up to date");
        }

        Commands::Graph { output } => {
            std::fs::write(&output, graph.to_dot())?;
            println!("wrote {}", output.display());
        }
    }

    Ok(())
}
