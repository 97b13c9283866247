// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use crate::config::{resolve_data_dir, Config};
use crate::error::Result;

/// Print the effective configuration, token masked.
///
/// Does not open the cache or touch the network.
pub fn run(data_dir: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = Config::load(&data_dir)?;
    writeln!(out, "# {}", data_dir.join("config.toml").display())?;
    write!(out, "{}", config.to_display_toml()?)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
