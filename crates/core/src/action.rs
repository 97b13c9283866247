// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote mutations recorded while offline.

use serde::{Deserialize, Serialize};

use crate::movie::MovieId;

/// Kind of a pending remote mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "toggleFavorite")]
    ToggleFavorite,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ToggleFavorite => "toggleFavorite",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote mutation that has not been confirmed by the server yet.
///
/// Serialized as `{"type":"toggleFavorite","movieId":42,"status":true,"timestamp":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub movie_id: MovieId,
    /// Desired favorite state.
    pub status: bool,
    /// Creation time in milliseconds since Unix epoch.
    pub timestamp: u64,
}

impl PendingAction {
    /// Creates a toggle-favorite action.
    pub fn toggle_favorite(movie_id: MovieId, status: bool, timestamp: u64) -> Self {
        PendingAction {
            kind: ActionKind::ToggleFavorite,
            movie_id,
            status,
            timestamp,
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
