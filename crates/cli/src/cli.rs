// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use reel_core::MovieId;

#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-aware movie favorites client")]
#[command(
    long_about = "Offline-aware movie favorites client.\n\n\
    Favorites toggled while offline are queued locally and replayed against the \
    remote API once connectivity returns."
)]
pub struct Cli {
    /// Directory holding config.toml and the query cache
    #[arg(long, global = true, env = "REEL_DATA_DIR", value_name = "path")]
    pub data_dir: Option<PathBuf>,

    /// Treat the network as unavailable
    #[arg(long, global = true)]
    pub offline: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show connectivity, pending actions and cache size
    Status,

    /// List popular movies
    Movies,

    /// List movie genres
    Genres,

    /// Show details of a movie
    Show {
        /// Movie ID
        id: MovieId,
    },

    /// Add a movie to favorites (or remove it with --remove)
    #[command(after_help = "\
Examples:
  reel favorite 949             Add movie 949 to favorites
  reel favorite 949 --remove    Remove movie 949 from favorites
  reel --offline favorite 949   Queue the change for the next sync")]
    Favorite {
        /// Movie ID
        id: MovieId,

        /// Remove from favorites instead of adding
        #[arg(long, short)]
        remove: bool,
    },

    /// List favorite movies, including changes not yet synced
    Favorites,

    /// List actions waiting to be synced
    Queue,

    /// Replay queued actions now
    Sync,

    /// Watch connectivity and sync whenever it comes back
    Watch,

    /// Print the effective configuration
    Config,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
