//! Error Types
//!
//! Only configuration mistakes surface as errors. Runtime edge cases
//! (locked quest, exhausted hints, stale timers) are silent no-ops.

use std::path::PathBuf;

/// Errors raised by quest commands
#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    /// A quest must need at least one step to complete
    #[error("Quest '{title}' has invalid step count {total_steps} (must be >= 1)")]
    InvalidStepCount { title: String, total_steps: u32 },
}

/// Errors raised while loading quest/hint content or settings
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Quest #{index} '{title}' has invalid step count {steps} (must be >= 1)")]
    InvalidSteps { index: usize, title: String, steps: i64 },

    #[error("Hint table key '{0}' is not a quest index")]
    InvalidHintIndex(String),

    #[error("Hint #{position} for quest {index} is empty")]
    EmptyHint { index: usize, position: usize },

    #[error("{origin}: hints.{field} = {secs} exceeds the maximum of {max} seconds")]
    WindowTooLong {
        origin: String,
        field: &'static str,
        secs: u64,
        max: u64,
    },
}
