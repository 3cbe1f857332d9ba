//! Hint Cycle State
//!
//! The single active show -> lock -> idle cycle, per-quest cursors, and the
//! timer continuations that drive the cycle forward.

use tokio::time::Instant;

/// Which timed transition a continuation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPhase {
    /// Display window elapsed: hide the hint and start the lockout
    Hide,
    /// Lockout elapsed: the gate becomes available again
    Unlock,
}

/// A scheduled continuation for a hint cycle
///
/// `generation` identifies the cycle that scheduled it, so a continuation
/// belonging to a preempted cycle is recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintTimer {
    pub generation: u64,
    pub phase: HintPhase,
}

/// Global hint cycle. Only one cycle exists at a time across all quests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HintCycle {
    /// No cycle in flight; a hint may be requested
    #[default]
    Idle,
    /// A hint is visible until `display_deadline`
    Showing {
        quest_index: usize,
        hint: String,
        display_deadline: Instant,
    },
    /// The hint was hidden; no new hint until `unlock_deadline`
    Locked {
        quest_index: usize,
        unlock_deadline: Instant,
    },
}

impl HintCycle {
    pub fn is_idle(&self) -> bool {
        matches!(self, HintCycle::Idle)
    }

    /// Quest the in-flight cycle belongs to
    pub fn quest_index(&self) -> Option<usize> {
        match self {
            HintCycle::Idle => None,
            HintCycle::Showing { quest_index, .. } | HintCycle::Locked { quest_index, .. } => {
                Some(*quest_index)
            }
        }
    }

    /// Text currently on screen, if any
    pub fn visible_hint(&self) -> Option<&str> {
        match self {
            HintCycle::Showing { hint, .. } => Some(hint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HintCycle::Idle => "idle",
            HintCycle::Showing { .. } => "showing",
            HintCycle::Locked { .. } => "locked",
        }
    }
}

/// How many hints of a quest have been handed out. Never rewinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HintCursor {
    next_position: usize,
}

impl HintCursor {
    pub fn next_position(&self) -> usize {
        self.next_position
    }

    pub fn advance(&mut self) {
        self.next_position += 1;
    }
}
