//! Boundary relation types.

use serde::{Deserialize, Serialize};

use super::Envelope;

/// Identity of a relation: `(level, name, parent)`.
///
/// Two same-named regions under different parents are different relations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationKey {
    pub level: usize,
    pub name: String,
    pub parent: Option<String>,
}

impl RelationKey {
    pub fn new(level: usize, name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            level,
            name: name.into(),
            parent,
        }
    }
}

/// One named region at one admin level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRelation {
    pub name: String,

    /// Name of the parent relation at `level - 1`; `None` at level 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    pub level: usize,

    /// Child names at `level + 1`, first-seen order, no duplicates
    #[serde(default)]
    pub children: Vec<String>,

    /// Covers every feature contributing to this relation's subtree
    pub bbox: Envelope,
}

impl BoundaryRelation {
    pub fn key(&self) -> RelationKey {
        RelationKey::new(self.level, self.name.clone(), self.parent.clone())
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

/// Output of the relation builder: the level numbers and every relation,
/// grouped by level ascending and in first-seen order within a level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationTreeData {
    pub levels: Vec<usize>,
    pub relations: Vec<BoundaryRelation>,
}

impl RelationTreeData {
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Relations at one level, in output order.
    pub fn at_level(&self, level: usize) -> impl Iterator<Item = &BoundaryRelation> {
        self.relations.iter().filter(move |r| r.level == level)
    }

    pub fn roots(&self) -> impl Iterator<Item = &BoundaryRelation> {
        self.at_level(0)
    }

    /// Envelope covering every root, for fitting a viewport to the dataset.
    pub fn extent(&self) -> Option<Envelope> {
        super::envelope::aggregate(self.roots().map(|r| &r.bbox)).ok()
    }
}
