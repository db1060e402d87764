use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use proofscope_graph::ProofGraph;
use proofscope_parser::ProofFormat;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "proofscope")]
#[command(about = "Inspect and export SMT proof certificates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a certificate and print a summary of the proof graph
    Inspect {
        /// Certificate file (Alethe or DOT)
        file: PathBuf,

        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,
    },

    /// Print the theory lemmas the proof relies on
    Lemmas {
        file: PathBuf,

        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,
    },

    /// Write the proof graph as a JSON snapshot
    Export {
        file: PathBuf,

        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,

        /// Output path; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Alethe,
    Dot,
}

fn load_graph(file: &Path, format: FormatArg) -> Result<ProofGraph> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read certificate {}", file.display()))?;
    let format = match format {
        FormatArg::Auto => ProofFormat::detect(&text),
        FormatArg::Alethe => ProofFormat::Alethe,
        FormatArg::Dot => ProofFormat::Dot,
    };
    proofscope_parser::parse(&text, format)
        .with_context(|| format!("Failed to parse certificate {}", file.display()))
}

fn inspect(graph: &ProofGraph) {
    println!("nodes:        {}", graph.iter().count());
    println!("hidden:       {}", graph.iter().filter(|n| n.is_hidden).count());
    println!(
        "assumptions:  {}",
        graph.iter().filter(|n| n.rule == "assume").count()
    );
    if let Some(root) = graph.root() {
        println!("root rule:    {}", root.rule);
        println!("root concl:   {}", root.conclusion);
    }
    if !graph.let_map.is_empty() {
        println!("let bindings: {}", graph.let_map.len());
    }
    for (kind, color) in &graph.cluster_colors {
        println!("cluster {kind:?}: {color}");
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect { file, format } => {
            let graph = load_graph(&file, format)?;
            inspect(&graph);
        }
        Command::Lemmas { file, format } => {
            let graph = load_graph(&file, format)?;
            let clusters = graph.slice_nodes_cluster();
            let have_clusters = !graph.cluster_colors.is_empty();
            for lemma in graph.extract_theory_lemmas(&clusters, have_clusters) {
                println!("{lemma}");
            }
        }
        Command::Export { file, format, output } => {
            let graph = load_graph(&file, format)?;
            let snapshot = graph.snapshot();
            let json =
                serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("snapshot written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
