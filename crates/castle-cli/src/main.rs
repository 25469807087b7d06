//! CLI frontend for Escape the Castle.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commands::play::PlayOptions;

#[derive(Parser)]
#[command(
    name = "castle",
    about = "Escape the Castle: a text adventure narrated by a local model",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play {
        /// Play without a narrator; outcomes come from your own words
        #[arg(long)]
        offline: bool,

        /// Ollama model name (default: $CASTLE_MODEL or llama3.1:8b)
        #[arg(short, long)]
        model: Option<String>,

        /// Ollama host URL (default: $CASTLE_OLLAMA_HOST or http://localhost:11434)
        #[arg(long)]
        host: Option<String>,

        /// Narrator request timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Print one JSON turn report per line instead of prose
        #[arg(long)]
        json: bool,

        /// Write the journal as markdown to this file when the game ends
        #[arg(short, long)]
        journal: Option<PathBuf>,
    },

    /// List the rooms, their exits, and what each exit needs
    Rooms,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            offline,
            model,
            host,
            timeout,
            json,
            journal,
        } => commands::play::run(&PlayOptions {
            offline,
            model,
            host,
            timeout,
            json,
            journal,
        }),
        Commands::Rooms => commands::rooms::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
