// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::display::format_connectivity;
use crate::error::Result;
use crate::sync::FavoritesApi;

use super::Context;

/// Print connectivity, pending action count and cache size.
pub fn run<A: FavoritesApi>(ctx: &Context<A>, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "Connectivity:    {}",
        format_connectivity(&ctx.monitor.state())
    )?;
    writeln!(out, "Pending actions: {}", ctx.library.pending().len())?;
    writeln!(out, "Cache entries:   {}", ctx.cache.len())?;
    if let Some(path) = ctx.cache.path() {
        writeln!(out, "Cache file:      {}", path.display())?;
    }
    if ctx.controller.is_pending() {
        writeln!(out, "A favorite update is in flight.")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
