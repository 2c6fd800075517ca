//! Root-to-node ancestor chains.

use serde::Serialize;

use super::index::RelationIndex;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::RelationError;
use crate::models::BoundaryRelation;

/// The missing relation where an ancestor walk stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub level: usize,
    pub name: String,
}

impl BrokenLink {
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::AncestorChainBroken {
            level: self.level,
            name: self.name.clone(),
        }
    }
}

impl From<BrokenLink> for RelationError {
    fn from(link: BrokenLink) -> Self {
        RelationError::AncestorChainBroken {
            level: link.level,
            name: link.name,
        }
    }
}

/// Relations from the root (or the highest reachable ancestor) down to the
/// requested relation, inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct AncestorChain<'a> {
    pub relations: Vec<&'a BoundaryRelation>,
    /// Set when a parent could not be found; `relations` is then partial.
    pub broken: Option<BrokenLink>,
}

impl<'a> AncestorChain<'a> {
    pub fn is_complete(&self) -> bool {
        self.broken.is_none()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Forward a broken link to a sink, if there is one.
    pub fn report(&self, sink: &dyn DiagnosticSink) {
        if let Some(link) = &self.broken {
            sink.report(&link.diagnostic());
        }
    }

    /// Strict form: a broken chain becomes [`RelationError::AncestorChainBroken`].
    pub fn into_result(self) -> Result<Vec<&'a BoundaryRelation>, RelationError> {
        match self.broken {
            Some(link) => Err(link.into()),
            None => Ok(self.relations),
        }
    }
}

/// Ancestor chain of the relation named `name` at `level`.
///
/// `parent_hint` picks between same-named relations; without it the
/// first-seen one is used. A missing link never fails the query: the chain
/// built so far is returned with [`AncestorChain::broken`] set.
pub fn ancestors<'a>(
    index: &RelationIndex<'a>,
    level: usize,
    name: &str,
    parent_hint: Option<&str>,
) -> AncestorChain<'a> {
    match index.resolve_position(level, name, parent_hint) {
        Some(position) => {
            let (positions, broken) = ancestor_positions(index, position);
            AncestorChain {
                relations: positions.into_iter().map(|p| index.relation(p)).collect(),
                broken,
            }
        }
        None => AncestorChain {
            relations: Vec::new(),
            broken: Some(BrokenLink {
                level,
                name: name.to_string(),
            }),
        },
    }
}

/// Positions from the top of the chain down to `position`.
pub(crate) fn ancestor_positions(
    index: &RelationIndex<'_>,
    position: usize,
) -> (Vec<usize>, Option<BrokenLink>) {
    let mut chain = vec![position];
    let mut broken = None;
    let mut current = position;

    loop {
        let relation = index.relation(current);
        let (Some(parent_name), Some(parent_level)) =
            (relation.parent.as_deref(), relation.level.checked_sub(1))
        else {
            break;
        };
        match index.parent_of(current) {
            Some(parent) => {
                chain.push(parent);
                current = parent;
            }
            None => {
                broken = Some(BrokenLink {
                    level: parent_level,
                    name: parent_name.to_string(),
                });
                break;
            }
        }
    }

    chain.reverse();
    (chain, broken)
}
