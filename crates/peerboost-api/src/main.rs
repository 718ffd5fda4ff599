//! Peerboost operator CLI entry point.
//!
//! Binary name: `pboost`
//!
//! Parses CLI arguments, loads configuration and the persisted document,
//! then dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, DeleteResource, ListResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,peerboost=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "pboost", &mut std::io::stdout());
        return Ok(());
    }

    // Load config and the persisted document
    let state = AppState::init().await?;

    match cli.command {
        Commands::List { resource } => match resource {
            ListResource::Posts { category } => {
                cli::post::list_posts(&state, category, cli.json).await?;
            }
            ListResource::Sessions => {
                cli::session::list_sessions(&state, cli.json).await?;
            }
        },

        Commands::Feed => {
            cli::post::show_feed(&state, cli.json).await?;
        }

        Commands::Delete { resource } => match resource {
            DeleteResource::Post { id, force } => {
                cli::post::delete_post(&state, id, force, cli.json).await?;
            }
        },

        Commands::Clear { force } => {
            cli::post::clear_posts(&state, force, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
