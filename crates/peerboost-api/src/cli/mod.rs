//! CLI command definitions and dispatch for the `pboost` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `pboost list posts`, `pboost delete post 3`).

pub mod post;
pub mod session;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use peerboost_types::post::PostId;

/// Inspect and moderate the peer-promotion hub.
#[derive(Parser)]
#[command(name = "pboost", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show the current reciprocation feed.
    Feed,

    /// Delete a resource.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Delete every post (the allocator keeps counting; ids are not reused).
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show hub status: counts, data file, config.
    Status,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ListResource {
    /// All submitted posts, oldest first.
    Posts {
        /// Only show posts in this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Active conversation sessions.
    Sessions,
}

#[derive(Subcommand)]
pub enum DeleteResource {
    /// Delete a single post by id.
    Post {
        /// Post id to delete.
        id: PostId,

        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}
