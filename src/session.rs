//! Quest Session
//!
//! Couples the quest tracker with the hint gate and processes external
//! events one at a time: presentation commands and clock continuations.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::clock::{Clock, ManualClock};
use crate::config::HintSettings;
use crate::content::ContentRegistry;
use crate::error::QuestError;
use crate::events::Notifier;
use crate::hint::{HintGate, HintTable, HintTimer};
use crate::quest::{QuestTracker, QuestView};

/// Commands issued by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Advance the current quest by one step
    AdvanceStep,
    /// Append a quest to the end of the list
    AddQuest {
        title: String,
        description: String,
        total_steps: u32,
    },
    /// The quest panel was opened: refresh the view (may surface a hint)
    OpenQuestPanel,
    /// Ask for a hint for the current quest
    RequestHint,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AdvanceStep => "advance_step",
            Command::AddQuest { .. } => "add_quest",
            Command::OpenQuestPanel => "open_quest_panel",
            Command::RequestHint => "request_hint",
        }
    }
}

/// A single player's quest progress and hint state
pub struct QuestSession<C: Clock> {
    tracker: QuestTracker<HintGate<C>>,
}

impl<C: Clock> QuestSession<C> {
    /// Create an empty session
    pub fn new(hints: HintTable, settings: &HintSettings, clock: Arc<C>, notifier: Notifier) -> Self {
        let gate = HintGate::new(hints, settings, clock, notifier.clone());
        Self {
            tracker: QuestTracker::new(gate, notifier),
        }
    }

    /// Create a session seeded with the registry's quests, in order
    pub fn from_content(
        content: &ContentRegistry,
        settings: &HintSettings,
        clock: Arc<C>,
        notifier: Notifier,
    ) -> Result<Self, QuestError> {
        let mut session = Self::new(content.hint_table().clone(), settings, clock, notifier);
        for seed in content.seeds() {
            session
                .tracker
                .add_quest(seed.title.clone(), seed.description.clone(), seed.total_steps)?;
        }
        info!("Session started with {} quests", session.tracker.len());
        Ok(session)
    }

    /// Process one command
    pub fn handle(&mut self, command: Command) -> Result<(), QuestError> {
        debug!("Handling command {}", command.name());
        match command {
            Command::AdvanceStep => self.tracker.advance_step(),
            Command::AddQuest {
                title,
                description,
                total_steps,
            } => {
                self.tracker.add_quest(title, description, total_steps)?;
            }
            Command::OpenQuestPanel => self.tracker.refresh(),
            Command::RequestHint => self.tracker.offer_hint(),
        }
        Ok(())
    }

    /// Deliver a clock continuation to the hint gate
    pub fn on_timer(&mut self, timer: HintTimer) {
        self.tracker.hints_mut().on_timer(timer);
    }

    pub fn tracker(&self) -> &QuestTracker<HintGate<C>> {
        &self.tracker
    }

    pub fn gate(&self) -> &HintGate<C> {
        self.tracker.hints()
    }

    pub fn view(&self) -> QuestView {
        self.tracker.view()
    }
}

impl QuestSession<ManualClock> {
    /// Move the manual clock forward, delivering every continuation that
    /// comes due along the way
    pub fn advance_clock(&mut self, by: Duration) {
        let clock = Arc::clone(self.gate().clock());
        clock.advance(by, |timer| self.on_timer(timer));
    }
}
