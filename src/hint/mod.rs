//! Hint Module
//!
//! Per-quest hint delivery with a display window followed by a lockout window.

pub mod gate;
pub mod state;
pub mod table;

pub use gate::{HintGate, HintPort};
pub use state::{HintCursor, HintCycle, HintPhase, HintTimer};
pub use table::HintTable;
