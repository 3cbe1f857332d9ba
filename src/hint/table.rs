//! Hint Table
//!
//! Static hint content keyed by quest index.

use std::collections::HashMap;

/// Ordered hint texts for each quest index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintTable {
    hints: HashMap<usize, Vec<String>>,
}

impl HintTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append hints for a quest, after any already registered
    pub fn extend<I, S>(&mut self, quest_index: usize, hints: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hints
            .entry(quest_index)
            .or_default()
            .extend(hints.into_iter().map(Into::into));
    }

    /// Hints for a quest, `None` when the quest has no entry
    pub fn get(&self, quest_index: usize) -> Option<&[String]> {
        self.hints.get(&quest_index).map(Vec::as_slice)
    }

    pub fn contains(&self, quest_index: usize) -> bool {
        self.hints.contains_key(&quest_index)
    }

    /// Quest indices that have an entry
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.hints.keys().copied()
    }

    /// Number of quests with an entry
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(usize, Vec<S>)> for HintTable {
    fn from_iter<T: IntoIterator<Item = (usize, Vec<S>)>>(iter: T) -> Self {
        let mut table = HintTable::new();
        for (index, hints) in iter {
            table.extend(index, hints);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_appends_in_order() {
        let mut table = HintTable::new();
        table.extend(0, ["You will need light..."]);
        table.extend(0, vec!["Check the bags and cupboards.".to_string()]);

        let hints = table.get(0).unwrap();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[1], "Check the bags and cupboards.");
        assert!(table.get(1).is_none());
        assert!(!table.contains(1));
    }

    #[test]
    fn test_collect() {
        let table: HintTable = vec![(0, vec!["a", "b"]), (3, vec!["c"])].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(3).unwrap(), ["c".to_string()]);
    }
}
