//! Transient user-facing notifications (toasts).
//!
//! The engine queues notifications; the host drains and displays them.

use serde::Serialize;
use std::collections::VecDeque;

pub const RENDER_FAILED: &str =
    "There was a problem rendering the diagram. Please check the syntax.";
pub const GENERATE_SUCCEEDED: &str = "Mermaid code generated with AI";
pub const GENERATE_FAILED: &str = "Failed to generate diagram with AI. Please try again.";
pub const GENERATE_BUSY: &str = "A diagram is already being generated.";
pub const SHARE_SUCCEEDED: &str = "Code copied to clipboard";
pub const SHARE_FAILED: &str = "Error copying code";
pub const EXPORT_EMPTY: &str = "Nothing to export yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: Some("Error".to_string()),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    /// Remove and return everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
