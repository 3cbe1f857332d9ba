//! Questline
//!
//! Tracks a player's progress through an ordered list of narrative quests
//! and decides when hints for the current quest may be shown.
//!
//! - [`quest::QuestTracker`] unlocks quests one after another as steps are completed.
//! - [`hint::HintGate`] shows a hint for a display window, then locks
//!   further hints for a lockout window. Windows run on an injected [`clock::Clock`].
//! - [`session::QuestSession`] wires both together and processes one event at a time.
//!
//! State changes are pushed to the presentation layer as [`events::Notification`]s.

pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod hint;
pub mod quest;
pub mod session;

pub use clock::{Clock, ManualClock, TimerHandle, TokioClock};
pub use config::{HintSettings, Settings};
pub use content::{ContentRegistry, QuestSeed};
pub use error::{ContentError, QuestError};
pub use events::{Notification, Notifier};
pub use hint::{HintCycle, HintGate, HintPort, HintTable, HintTimer};
pub use quest::{Quest, QuestTracker, QuestView};
pub use session::{Command, QuestSession};
