//! Loreweave CLI — the main entry point.
//!
//! Commands:
//! - `onboard`      — Initialize configuration
//! - `generate`     — Continue a note with generated text
//! - `lore-entry`   — Generate a lorebook entry from a note
//! - `translate`    — Translate a piece of text
//! - `models`       — List models offered by the configured provider
//! - `validate-key` — Check the configured credential

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "loreweave",
    about = "Loreweave — context-aware text generation for note vaults",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Continue a note with generated text, using matching lore as context
    Generate {
        /// The vault directory holding the note and its lorebook
        #[arg(short = 'd', long)]
        vault: PathBuf,

        /// The note to continue, relative to the vault root
        note: PathBuf,
    },

    /// Generate a structured lorebook entry from a note, overwriting it
    LoreEntry {
        /// The vault directory holding the note and its lorebook
        #[arg(short = 'd', long)]
        vault: PathBuf,

        /// The note to rewrite, relative to the vault root
        note: PathBuf,
    },

    /// Translate a piece of text and print the result
    Translate {
        /// The text to translate
        text: String,
    },

    /// List models offered by the configured provider
    Models,

    /// Check that the configured API key is accepted by the provider
    ValidateKey,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Generate { vault, note } => commands::generate::run(vault, note).await?,
        Commands::LoreEntry { vault, note } => commands::lore_entry::run(vault, note).await?,
        Commands::Translate { text } => commands::translate::run(text).await?,
        Commands::Models => commands::models::run().await?,
        Commands::ValidateKey => commands::validate_key::run().await?,
    }

    Ok(())
}
