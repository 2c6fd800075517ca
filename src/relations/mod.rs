//! Admin boundary relation tree.
//!
//! Reconstructs a named region hierarchy from flat, denormalized boundary
//! features and answers ancestor, descendant and search queries over it.
//!
//! ```text
//! features + schema -> extract -> flat records -> build -> RelationTreeData
//!                                                             |
//!                                   RelationIndex <-----------+
//!                                   (ancestors / descendants / search / menu)
//! ```

mod ancestors;
mod builder;
mod descendants;
mod extract;
mod index;
mod menu;
mod search;


pub use ancestors::{ancestors, AncestorChain, BrokenLink};
pub use builder::{build_relations, RelationTreeBuilder};
pub use descendants::descendants;
pub use extract::{FeatureRelationExtractor, FlatRelationRecord, GapPolicy};
pub use index::RelationIndex;
pub use menu::{menu_order, MenuEntry};
pub use search::{contains_text, match_tree, search};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{BoundaryRelation, Envelope};

    /// A relation with a unit envelope.
    pub(crate) fn relation(
        level: usize,
        name: &str,
        parent: Option<&str>,
        children: &[&str],
    ) -> BoundaryRelation {
        BoundaryRelation {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            level,
            children: children.iter().map(|c| c.to_string()).collect(),
            bbox: Envelope::new(0.0, 0.0, 1.0, 1.0).unwrap(),
        }
    }
}
