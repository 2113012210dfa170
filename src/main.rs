//! # chat-recall CLI (`recall`)
//!
//! The `recall` binary drives the whole pipeline: building the knowledge
//! base from a chat export, searching it, and assembling the prompt or
//! context block a downstream assistant would receive.
//!
//! ## Usage
//!
//! ```bash
//! recall --config ./recall.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recall build` | Parse the export, write the document and chunk corpus |
//! | `recall search "<query>"` | Rank corpus chunks by keyword overlap |
//! | `recall ask "<query>"` | Show the best match and the assembled prompt |
//! | `recall context "<query>"` | Show the multi-chunk context block |
//! | `recall stats` | Summarize the current corpus |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chat_recall::{config, ingest, prompt, search, stats};

/// chat-recall — turn a chat export into a searchable knowledge base.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to built-in defaults (`result.json` in
/// the current directory, 1500/200 chunking, top-3 retrieval).
#[derive(Parser)]
#[command(
    name = "recall",
    about = "Turn a chat export into a searchable knowledge base with keyword retrieval",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./recall.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the knowledge base and chunk corpus from the chat export.
    ///
    /// Parses the export, filters service and empty messages, assembles
    /// the headed document, chunks it, and writes both artifacts. Writes
    /// are atomic; a failed build leaves previous files untouched.
    Build {
        /// Show chat/message/chunk counts without writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Search the chunk corpus.
    ///
    /// Ranks chunks by keyword overlap with the query and prints scores,
    /// source headers, and content previews.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return (at least 1).
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },

    /// Show the best match and the prompt an assistant would receive.
    Ask {
        /// The question to answer from the knowledge base.
        query: String,
    },

    /// Assemble the multi-chunk context block for a query.
    Context {
        /// The query to retrieve context for.
        query: String,

        /// Override the overall context character budget.
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Summarize the current corpus (size, chunk counts, per-chat breakdown).
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Build { dry_run } => {
            ingest::run_build(&cfg, dry_run)?;
        }
        Commands::Search { query, limit } => {
            search::run_search(&cfg, &query, limit.map(|l| l as usize))?;
        }
        Commands::Ask { query } => {
            prompt::run_ask(&cfg, &query)?;
        }
        Commands::Context { query, max_chars } => {
            prompt::run_context(&cfg, &query, max_chars)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
    }

    Ok(())
}
