//! Quest Module
//!
//! Sequential quest progression: quest state, the derived view, and the
//! tracker that ties them to the hint gate.

pub mod state;
pub mod tracker;
pub mod view;

pub use state::Quest;
pub use tracker::QuestTracker;
pub use view::QuestView;
