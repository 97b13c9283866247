// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns `REEL_API_TOKEN` unless it is unset or blank.
pub fn api_token() -> Option<String> {
    std::env::var(vars::REEL_API_TOKEN)
        .ok()
        .filter(|token| !token.trim().is_empty())
}

/// Returns the value of `REEL_DATA_DIR` if set and non-empty.
pub fn data_dir() -> Option<PathBuf> {
    std::env::var_os(vars::REEL_DATA_DIR)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
