//! User-facing notifications
//!
//! Components push notifications onto an unbounded channel; whatever renders
//! them holds the receiver.

use bookfinder_core::{AppError, ErrorSeverity};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Neutral message, nothing failed
    Info,
    /// Something the user asked for did not happen
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    /// What to show for a search that produced no result list
    ///
    /// `None` for errors that are dropped silently.
    pub fn for_search_error(err: &AppError) -> Option<Self> {
        match err.severity() {
            ErrorSeverity::Suppressed => None,
            ErrorSeverity::Informational => Some(Self::info("No results found", err.user_message())),
            ErrorSeverity::Recoverable => {
                Some(Self::destructive("Search failed", err.user_message()))
            }
        }
    }

    pub fn added_to_favorites(title: &str) -> Self {
        Self::info(
            "Added to favorites",
            format!("\"{}\" was added to your favorites.", title),
        )
    }

    pub fn removed_from_favorites(title: &str) -> Self {
        Self::info(
            "Removed from favorites",
            format!("\"{}\" was removed from your favorites.", title),
        )
    }

    pub fn signed_out() -> Self {
        Self::info("Signed out", "You've been successfully signed out.")
    }

    pub fn is_destructive(&self) -> bool {
        self.kind == NotificationKind::Destructive
    }
}

pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Sending half of the notification channel
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Sends `notification`; dropped if nobody is listening
    pub fn notify(&self, notification: Notification) {
        log::debug!("Notification: {}", notification.title);
        if self.tx.send(notification).is_err() {
            log::debug!("Notification dropped, receiver closed");
        }
    }
}
