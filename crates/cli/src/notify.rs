// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing notices.

use std::fmt;
use std::io::Write;

/// Category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    SavedOffline,
    Error,
    SyncComplete,
}

impl NoticeKind {
    /// Title shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            NoticeKind::Success => "Success",
            NoticeKind::SavedOffline => "Saved Offline",
            NoticeKind::Error => "Error",
            NoticeKind::SyncComplete => "Sync Complete",
        }
    }
}

/// A message for the user about the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// Optimistic toggle acknowledgement.
    ///
    /// Offline toggles say the change will sync later.
    pub fn toggled(title: &str, favorite: bool, offline: bool) -> Self {
        let change = if favorite { "added to" } else { "removed from" };
        if offline {
            Notice {
                kind: NoticeKind::SavedOffline,
                message: format!(
                    "{title} has been {change} favorites and will sync when back online"
                ),
            }
        } else {
            Notice {
                kind: NoticeKind::Success,
                message: format!("{title} has been {change} favorites"),
            }
        }
    }

    /// An online toggle that failed after every retry and was rolled back.
    pub fn toggle_failed() -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: "Failed to update favorites. The change will be retried when you're back online."
                .to_string(),
        }
    }

    /// Summary of a reconciliation pass.
    pub fn sync_complete(synced: usize, failed: usize) -> Self {
        let mut message = format!("{synced} favorite updates synced successfully.");
        if failed > 0 {
            message.push_str(&format!("\n{failed} updates failed and will retry later."));
        }
        Notice {
            kind: NoticeKind::SyncComplete,
            message,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message)
    }
}

/// Receives notices for display.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices to stdout (errors to stderr).
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::info!(kind = ?notice.kind, "{}", notice.message);
        let result = match notice.kind {
            NoticeKind::Error => writeln!(std::io::stderr(), "{notice}"),
            _ => writeln!(std::io::stdout(), "{notice}"),
        };
        if let Err(e) = result {
            tracing::warn!("failed to print notice: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
