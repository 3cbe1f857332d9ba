//! Quest State Tracking
//!
//! Step progress, unlock and completion flags for a single quest.

use serde::Serialize;

use crate::error::QuestError;

/// A quest in the player's ordered quest list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quest {
    title: String,
    description: String,
    total_steps: u32,
    current_step: u32,
    is_unlocked: bool,
    is_completed: bool,
}

impl Quest {
    /// Create a locked quest with no progress
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        total_steps: u32,
    ) -> Result<Self, QuestError> {
        let title = title.into();
        if total_steps < 1 {
            return Err(QuestError::InvalidStepCount { title, total_steps });
        }

        Ok(Self {
            title,
            description: description.into(),
            total_steps,
            current_step: 0,
            is_unlocked: false,
            is_completed: false,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn is_unlocked(&self) -> bool {
        self.is_unlocked
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub(crate) fn unlock(&mut self) {
        self.is_unlocked = true;
    }

    /// Advance one step, clamped to `total_steps`. Returns true if this
    /// step completed the quest.
    pub(crate) fn advance(&mut self) -> bool {
        if self.is_completed {
            return false;
        }
        self.current_step = (self.current_step + 1).min(self.total_steps);
        if self.current_step == self.total_steps {
            self.is_completed = true;
            true
        } else {
            false
        }
    }

    /// Progress in `0.0..=1.0`
    pub fn progress_fraction(&self) -> f32 {
        self.current_step as f32 / self.total_steps as f32
    }

    /// Progress rounded to a whole percentage
    pub fn progress_percent(&self) -> u32 {
        (self.progress_fraction() * 100.0).round() as u32
    }
}
