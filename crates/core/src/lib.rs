// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reel-core: Shared library for the reel favorites client
//!
//! This crate provides the data structures and pure functions used by the
//! `reel` CLI: movie records, pending offline actions, structured cache keys,
//! the JSONL persistence helpers and the favorites display derivation.

pub mod action;
pub mod clock;
pub mod display;
pub mod error;
pub mod jsonl;
pub mod key;
pub mod movie;

pub use action::{ActionKind, PendingAction};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use display::derive_display_list;
pub use error::{Error, Result};
pub use key::{CacheKey, KeyClass};
pub use movie::{Genre, Movie, MovieId};
