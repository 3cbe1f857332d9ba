//! Hint Gate
//!
//! Decides when a hint may be shown and runs the timed
//! show -> lock -> idle cycle. One cycle runs at a time across all quests;
//! each quest keeps its own cursor into its hint list.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, trace};

use super::state::{HintCursor, HintCycle, HintPhase, HintTimer};
use super::table::HintTable;
use crate::clock::{Clock, TimerHandle};
use crate::config::HintSettings;
use crate::events::{Notification, Notifier};

/// The narrow interface the quest tracker uses to surface hints
pub trait HintPort {
    /// True when no hint cycle is in flight
    fn is_available(&self) -> bool;

    /// Begin a hint cycle for a quest (see [`HintGate::request_hint`])
    fn request_hint(&mut self, quest_index: usize);
}

/// Owns the hint cycle state machine
pub struct HintGate<C: Clock> {
    clock: Arc<C>,
    table: HintTable,
    display_duration: Duration,
    lock_duration: Duration,
    cycle: HintCycle,
    cursors: HashMap<usize, HintCursor>,
    /// Continuation of the in-flight cycle
    pending: Option<TimerHandle>,
    /// Bumped for every new cycle; stale continuations carry an older value
    generation: u64,
    notifier: Notifier,
}

impl<C: Clock> HintGate<C> {
    pub fn new(table: HintTable, settings: &HintSettings, clock: Arc<C>, notifier: Notifier) -> Self {
        Self {
            clock,
            table,
            display_duration: settings.display_duration(),
            lock_duration: settings.lock_duration(),
            cycle: HintCycle::Idle,
            cursors: HashMap::new(),
            pending: None,
            generation: 0,
            notifier,
        }
    }

    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    pub fn table(&self) -> &HintTable {
        &self.table
    }

    pub fn cycle(&self) -> &HintCycle {
        &self.cycle
    }

    /// True iff the gate is idle
    pub fn is_available(&self) -> bool {
        self.cycle.is_idle()
    }

    /// Hints already handed out for a quest
    pub fn cursor(&self, quest_index: usize) -> usize {
        self.cursors
            .get(&quest_index)
            .map(HintCursor::next_position)
            .unwrap_or(0)
    }

    /// Hints still available for a quest
    pub fn remaining_hints(&self, quest_index: usize) -> usize {
        self.table
            .get(quest_index)
            .map(|hints| hints.len().saturating_sub(self.cursor(quest_index)))
            .unwrap_or(0)
    }

    /// Time left before the visible hint is hidden
    pub fn remaining_display(&self) -> Option<Duration> {
        match &self.cycle {
            HintCycle::Showing { display_deadline, .. } => {
                Some(display_deadline.saturating_duration_since(self.clock.now()))
            }
            _ => None,
        }
    }

    /// Time left before the gate unlocks
    pub fn remaining_lock(&self) -> Option<Duration> {
        match &self.cycle {
            HintCycle::Locked { unlock_deadline, .. } => {
                Some(unlock_deadline.saturating_duration_since(self.clock.now()))
            }
            _ => None,
        }
    }

    /// Dispense the next hint for `quest_index` and start a new cycle.
    ///
    /// A request for the quest whose cycle is already in flight does nothing.
    /// A request for any other quest abandons the in-flight cycle first; the
    /// abandoned quest keeps its cursor increment. Missing or exhausted hint
    /// lists leave the gate idle.
    pub fn request_hint(&mut self, quest_index: usize) {
        if self.cycle.quest_index() == Some(quest_index) {
            debug!(
                "Hint cycle for quest {} already {}, ignoring request",
                quest_index,
                self.cycle.as_str()
            );
            return;
        }

        let was_showing = self.preempt();

        let Some(hint) = self.next_hint(quest_index) else {
            if was_showing {
                self.notifier.send(Notification::HintHidden);
            }
            return;
        };

        self.generation += 1;
        let display_deadline = self.clock.now() + self.display_duration;
        let handle = self.clock.after(
            self.display_duration,
            HintTimer {
                generation: self.generation,
                phase: HintPhase::Hide,
            },
        );
        self.pending = Some(handle);
        self.cycle = HintCycle::Showing {
            quest_index,
            hint: hint.clone(),
            display_deadline,
        };

        info!(
            "Showing hint {} for quest {} for {:?}",
            self.cursor(quest_index),
            quest_index,
            self.display_duration
        );
        self.notifier.send(Notification::HintShown {
            quest_index,
            text: hint,
        });
    }

    /// Take the next hint off a quest's list, advancing its cursor
    fn next_hint(&mut self, quest_index: usize) -> Option<String> {
        let Some(hints) = self.table.get(quest_index) else {
            debug!("No hints registered for quest {}", quest_index);
            return None;
        };

        let cursor = self.cursors.entry(quest_index).or_default();
        let Some(hint) = hints.get(cursor.next_position()) else {
            debug!("Hints for quest {} exhausted", quest_index);
            return None;
        };

        cursor.advance();
        Some(hint.clone())
    }

    /// Abandon the in-flight cycle. Returns whether a hint was visible.
    fn preempt(&mut self) -> bool {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel(handle);
        }

        let previous = std::mem::take(&mut self.cycle);
        if let Some(quest_index) = previous.quest_index() {
            debug!(
                "Abandoning {} hint cycle for quest {}",
                previous.as_str(),
                quest_index
            );
        }
        previous.visible_hint().is_some()
    }

    /// Apply a timed transition delivered by the clock
    pub fn on_timer(&mut self, timer: HintTimer) {
        if timer.generation != self.generation {
            trace!(
                "Ignoring stale {:?} timer (generation {} != {})",
                timer.phase, timer.generation, self.generation
            );
            return;
        }

        match timer.phase {
            HintPhase::Hide => {
                let HintCycle::Showing { quest_index, .. } = self.cycle else {
                    trace!("Ignoring hide timer while {}", self.cycle.as_str());
                    return;
                };

                let unlock_deadline = self.clock.now() + self.lock_duration;
                self.pending = Some(self.clock.after(
                    self.lock_duration,
                    HintTimer {
                        generation: self.generation,
                        phase: HintPhase::Unlock,
                    },
                ));
                self.cycle = HintCycle::Locked {
                    quest_index,
                    unlock_deadline,
                };

                info!(
                    "Hint for quest {} hidden, locked for {:?}",
                    quest_index, self.lock_duration
                );
                self.notifier.send(Notification::HintHidden);
            }
            HintPhase::Unlock => {
                let HintCycle::Locked { quest_index, .. } = self.cycle else {
                    trace!("Ignoring unlock timer while {}", self.cycle.as_str());
                    return;
                };

                info!("Hints available again (last cycle: quest {})", quest_index);
                self.pending = None;
                self.cycle = HintCycle::Idle;
            }
        }
    }
}

impl<C: Clock> HintPort for HintGate<C> {
    fn is_available(&self) -> bool {
        HintGate::is_available(self)
    }

    fn request_hint(&mut self, quest_index: usize) {
        HintGate::request_hint(self, quest_index)
    }
}
