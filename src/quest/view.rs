//! Quest View
//!
//! Presentation-facing summary of the current quest.

use serde::Serialize;

use super::state::Quest;

/// What the quest panel should show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuestView {
    /// Every quest is done (or there are none)
    AllCompleted,
    /// The current quest has not been unlocked
    Locked,
    /// The current quest is in progress
    Active {
        title: String,
        description: String,
        progress: f32,
    },
}

impl QuestView {
    pub fn active(quest: &Quest) -> Self {
        QuestView::Active {
            title: quest.title().to_string(),
            description: quest.description().to_string(),
            progress: quest.progress_fraction(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, QuestView::Active { .. })
    }

    /// Progress bar value as a whole percentage
    pub fn progress_percent(&self) -> u32 {
        match self {
            QuestView::AllCompleted => 100,
            QuestView::Locked => 0,
            QuestView::Active { progress, .. } => (progress * 100.0).round() as u32,
        }
    }
}
