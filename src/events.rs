//! Presentation Notifications
//!
//! Push notifications emitted by the quest tracker and the hint gate.
//! The presentation layer owns the receiving end of the channel.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::quest::QuestView;

/// State changes the presentation layer reacts to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// The current quest summary changed (or was refreshed)
    QuestViewChanged { view: QuestView },
    /// A hint should be displayed
    HintShown { quest_index: usize, text: String },
    /// The visible hint should be removed
    HintHidden,
}

impl Notification {
    /// Get event type as string (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            Notification::QuestViewChanged { .. } => "quest_view_changed",
            Notification::HintShown { .. } => "hint_shown",
            Notification::HintHidden => "hint_hidden",
        }
    }
}

/// Sending half of the notification channel
///
/// Sending never blocks. A closed receiver is not an error for the core.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Create a notifier together with its receiver
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn send(&self, notification: Notification) {
        let event_type = notification.event_type();
        if self.tx.send(notification).is_err() {
            debug!("No presentation receiver for {} notification", event_type);
        }
    }
}
