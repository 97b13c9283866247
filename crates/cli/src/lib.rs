// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reelrs - An offline-aware movie favorites client library.
//!
//! This crate provides the functionality behind the `reel` CLI: favorites
//! are toggled optimistically, queued while offline, and replayed against the
//! remote API when connectivity returns.
//!
//! # Main Components
//!
//! - [`cache::CacheManager`] - Keyed query cache with freshness windows, persisted as JSONL
//! - [`sync`] - Connectivity monitor, pending queue, mutation controller and reconciler
//! - [`favorites::Library`] - Cached reads with offline fallbacks
//! - [`Config`] - Client configuration (`config.toml`)
//! - [`Error`] - Error types for all operations
//!
//! # Wiring
//!
//! ```rust,ignore
//! use reelrs::commands::Context;
//!
//! let ctx = Context::open(None, false).await?;
//! ctx.controller.toggle_favorite(&movie, true).await;
//! ctx.finish().await;
//! ```

mod cli;
pub mod commands;
mod display;
mod env;

pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod notify;
pub mod sync;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{Error, Result};

use std::io::Write;

use commands::Context;

/// Execute a CLI invocation on a fresh tokio runtime.
pub fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(execute(cli))
}

async fn execute(cli: Cli) -> Result<()> {
    let mut out = std::io::stdout();
    let data_dir = cli.data_dir.as_deref();

    // Printing the config must work even when the cache cannot be opened
    if cli.command == Command::Config {
        return commands::config::run(data_dir, &mut out);
    }

    let ctx = Context::open(data_dir, cli.offline).await?;
    let result = dispatch(&ctx, cli.command, &mut out).await;
    ctx.finish().await;
    out.flush()?;
    result
}

async fn dispatch(ctx: &Context, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Status => commands::status::run(ctx, out),
        Command::Movies => commands::catalog::movies(ctx, out).await,
        Command::Genres => commands::catalog::genres(ctx, out).await,
        Command::Show { id } => commands::catalog::show(ctx, id, out).await,
        Command::Favorite { id, remove } => commands::favorite::toggle(ctx, id, remove, out).await,
        Command::Favorites => commands::favorite::list(ctx, out).await,
        Command::Queue => commands::queue::list(ctx, out),
        Command::Sync => commands::queue::sync_now(ctx, out).await,
        Command::Watch => commands::queue::watch(ctx, out).await,
        Command::Config => {
            write!(out, "{}", ctx.config.to_display_toml()?)?;
            Ok(())
        }
    }
}
