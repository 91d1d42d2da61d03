use anyhow::Result;
use clap::{Parser, Subcommand};
use search_core::corpus::{index_directory, read_lines, write_result};
use search_core::query_file::parse_query_lines;
use search_core::{run_query, IndexStats, InvertedIndex};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a boolean inverted index over tagged documents and answer queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print its statistics as JSON
    Build {
        /// Directory holding the document files
        #[arg(long)]
        input: String,
    },
    /// Answer a single query, one document id per line
    Query {
        /// Directory holding the document files
        #[arg(long)]
        input: String,
        /// Boolean query, e.g. "pes AND kočka OR vlak AND NOT auto"
        #[arg(long)]
        q: String,
    },
    /// Run every query of a topic file and write one result file per query
    Run {
        /// Directory holding the document files
        #[arg(long)]
        input: String,
        /// Topic file with <num> and <query> lines
        #[arg(long)]
        queries: String,
        /// Directory receiving the result files
        #[arg(long, default_value = "results")]
        output: String,
    },
}

#[derive(Debug, Serialize)]
struct RunSummary {
    created_at: String,
    index: IndexStats,
    queries: usize,
    rejected: Vec<RejectedQuery>,
}

#[derive(Debug, Serialize)]
struct RejectedQuery {
    name: String,
    query: String,
    error: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input } => {
            let index = index_directory(&input)?;
            println!("{}", serde_json::to_string_pretty(&index.stats())?);
            Ok(())
        }
        Commands::Query { input, q } => {
            let index = index_directory(&input)?;
            let mut ids: Vec<String> = run_query(&index, &q)?.into_iter().collect();
            ids.sort();
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for id in ids {
                writeln!(out, "{id}")?;
            }
            Ok(())
        }
        Commands::Run { input, queries, output } => {
            let index = index_directory(&input)?;
            run_query_file(&index, Path::new(&queries), Path::new(&output))
        }
    }
}

fn run_query_file(index: &InvertedIndex, queries: &Path, output: &Path) -> Result<()> {
    let entries = parse_query_lines(read_lines(queries)?);
    fs::create_dir_all(output)?;

    let mut rejected = Vec::new();
    for entry in &entries {
        match run_query(index, &entry.query) {
            Ok(ids) => {
                let path = write_result(output, &entry.name, &ids)?;
                tracing::debug!(name = %entry.name, hits = ids.len(), path = %path.display(), "wrote result");
            }
            Err(err) => {
                tracing::warn!(name = %entry.name, query = %entry.query, %err, "query rejected");
                rejected.push(RejectedQuery { name: entry.name.clone(), query: entry.query.clone(), error: err.to_string() });
            }
        }
    }

    let summary = RunSummary {
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        index: index.stats(),
        queries: entries.len(),
        rejected,
    };
    let mut f = File::create(output.join("summary.json"))?;
    f.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

    tracing::info!(queries = entries.len(), rejected = summary.rejected.len(), output = %output.display(), "query run complete");
    Ok(())
}
