//! Content Definition Structures
//!
//! These structures are deserialized from the quest content TOML file.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ContentError;

/// A content file as it appears in TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContentFile {
    /// Quests in play order
    #[serde(default, rename = "quest")]
    pub quests: Vec<RawQuest>,
    /// Extra hints keyed by quest index ("0", "1", ...)
    #[serde(default)]
    pub hints: HashMap<String, Vec<String>>,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Signed so bad seed data is reported instead of failing to parse
    #[serde(default = "default_steps")]
    pub steps: i64,
    #[serde(default)]
    pub hints: Vec<String>,
}

fn default_steps() -> i64 {
    1
}

// ============================================================================
// Resolved Structures
// ============================================================================

/// A validated entry of the quest seed list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestSeed {
    pub title: String,
    pub description: String,
    pub total_steps: u32,
}

impl QuestSeed {
    /// Validate a raw quest found at `index` in the file
    pub fn from_raw(index: usize, raw: &RawQuest) -> Result<Self, ContentError> {
        let total_steps = u32::try_from(raw.steps)
            .ok()
            .filter(|steps| *steps >= 1)
            .ok_or_else(|| ContentError::InvalidSteps {
                index,
                title: raw.title.clone(),
                steps: raw.steps,
            })?;

        Ok(Self {
            title: raw.title.clone(),
            description: raw.description.trim_end().to_string(),
            total_steps,
        })
    }
}

/// Parse a hint table key into a quest index
pub fn parse_hint_index(key: &str) -> Result<usize, ContentError> {
    key.trim()
        .parse::<usize>()
        .map_err(|_| ContentError::InvalidHintIndex(key.to_string()))
}
