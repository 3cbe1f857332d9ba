//! Content Registry
//!
//! Loads the quest seed list and hint table from TOML.

use std::path::Path;

use tracing::{info, warn};

use super::definition::{QuestSeed, RawContentFile, parse_hint_index};
use crate::error::ContentError;
use crate::hint::HintTable;

/// File name looked up inside the data directory
pub const CONTENT_FILE: &str = "quests.toml";

/// Static quest and hint content
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    seeds: Vec<QuestSeed>,
    hints: HintTable,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `quests.toml` from a data directory. A missing file yields an
    /// empty registry.
    pub fn load_from_directory(data_dir: &Path) -> Result<Self, ContentError> {
        let path = data_dir.join(CONTENT_FILE);
        if !path.exists() {
            warn!("Quest content file does not exist: {:?}", path);
            return Ok(Self::new());
        }
        Self::load_from_file(&path)
    }

    /// Load content from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse content from TOML text; `origin` names the source in errors
    pub fn parse(content: &str, origin: &str) -> Result<Self, ContentError> {
        let raw: RawContentFile = toml::from_str(content).map_err(|source| ContentError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawContentFile) -> Result<Self, ContentError> {
        let mut registry = Self::new();

        for (index, raw_quest) in raw.quests.iter().enumerate() {
            let seed = QuestSeed::from_raw(index, raw_quest)?;
            if !raw_quest.hints.is_empty() {
                registry.add_hints(index, raw_quest.hints.clone())?;
            }
            info!("Loaded quest #{}: {} ({} steps)", index, seed.title, seed.total_steps);
            registry.seeds.push(seed);
        }

        // Sort so appends are deterministic regardless of map order
        let mut extra: Vec<(usize, Vec<String>)> = raw
            .hints
            .into_iter()
            .map(|(key, hints)| parse_hint_index(&key).map(|index| (index, hints)))
            .collect::<Result<_, _>>()?;
        extra.sort_by_key(|(index, _)| *index);

        for (index, hints) in extra {
            registry.add_hints(index, hints)?;
        }

        registry.validate_hint_indices();
        info!(
            "Loaded {} quests with hints for {} of them",
            registry.seeds.len(),
            registry.hints.len()
        );
        Ok(registry)
    }

    /// Append hints for a quest index, rejecting blank entries
    pub fn add_hints(&mut self, quest_index: usize, hints: Vec<String>) -> Result<(), ContentError> {
        let offset = self.hints.get(quest_index).map_or(0, <[String]>::len);
        if let Some(position) = hints.iter().position(|h| h.trim().is_empty()) {
            return Err(ContentError::EmptyHint {
                index: quest_index,
                position: offset + position,
            });
        }
        self.hints.extend(quest_index, hints);
        Ok(())
    }

    /// Warn about hints registered for quests that do not exist (yet)
    fn validate_hint_indices(&self) {
        for index in self.hints.indices() {
            if index >= self.seeds.len() {
                warn!(
                    "Hints registered for quest {} but only {} quests are defined",
                    index,
                    self.seeds.len()
                );
            }
        }
    }

    /// Quest seeds in play order
    pub fn seeds(&self) -> &[QuestSeed] {
        &self.seeds
    }

    pub fn hint_table(&self) -> &HintTable {
        &self.hints
    }

    /// Split into seeds and hint table
    pub fn into_parts(self) -> (Vec<QuestSeed>, HintTable) {
        (self.seeds, self.hints)
    }

    /// Number of quests
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}
