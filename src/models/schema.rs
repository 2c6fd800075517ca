//! Admin level schema: the ordered property keys of one dataset.

use serde::{Deserialize, Serialize};

/// Ordered admin level keys. Index 0 is the root level (e.g. `country`),
/// the last index the leaf level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminLevelSchema {
    keys: Vec<String>,
}

impl AdminLevelSchema {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Property key for a level.
    pub fn key(&self, level: usize) -> Option<&str> {
        self.keys.get(level).map(String::as_str)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Level numbers `0..len`.
    pub fn levels(&self) -> Vec<usize> {
        (0..self.keys.len()).collect()
    }

    /// First key that appears more than once.
    pub fn duplicate_key(&self) -> Option<&str> {
        self.keys
            .iter()
            .enumerate()
            .find(|(i, k)| self.keys[..*i].contains(k))
            .map(|(_, k)| k.as_str())
    }
}

/// How a relation is presented in a grouped dropdown menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuRole {
    /// Root level group header
    Header,
    /// Intermediate level group header
    SubHeader,
    /// Selectable leaf entry
    Item,
}

impl MenuRole {
    pub fn for_level(level: usize, levels: &[usize]) -> Self {
        match (levels.first(), levels.last()) {
            (Some(first), _) if *first == level => MenuRole::Header,
            (_, Some(last)) if *last == level => MenuRole::Item,
            _ => MenuRole::SubHeader,
        }
    }
}
