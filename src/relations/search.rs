//! Free-text search returning matches with enough context to render them.

use hashbrown::HashSet;

use super::ancestors::ancestor_positions;
use super::index::RelationIndex;
use crate::models::BoundaryRelation;

/// Case-insensitive substring test.
pub fn contains_text(text: &str, query: &str) -> bool {
    text.to_lowercase().contains(&query.to_lowercase())
}

/// Relations whose name contains `query`, plus their ancestors and siblings.
pub fn search<'a>(index: &RelationIndex<'a>, query: &str) -> Vec<&'a BoundaryRelation> {
    let matches: Vec<usize> = (0..index.len())
        .filter(|&p| contains_text(&index.relation(p).name, query))
        .collect();
    expand_positions(index, &matches)
}

/// Expand already-matched relations into the minimal set needed to show them
/// in a grouped menu.
///
/// Each match brings its ancestor chain and every relation sharing its parent.
/// The result has no duplicate identities and is ordered by level, then by
/// discovery order.
pub fn match_tree<'a>(
    index: &RelationIndex<'a>,
    matches: &[&BoundaryRelation],
) -> Vec<&'a BoundaryRelation> {
    let positions: Vec<usize> = matches.iter().filter_map(|m| index.position(m)).collect();
    expand_positions(index, &positions)
}

fn expand_positions<'a>(
    index: &RelationIndex<'a>,
    matches: &[usize],
) -> Vec<&'a BoundaryRelation> {
    let mut seen: HashSet<(usize, &str, Option<&str>)> = HashSet::new();
    let mut found: Vec<&'a BoundaryRelation> = Vec::new();

    let mut push = |position: usize| {
        let relation = index.relation(position);
        if seen.insert((relation.level, relation.name.as_str(), relation.parent.as_deref())) {
            found.push(relation);
        }
    };

    for &position in matches {
        let (chain, _) = ancestor_positions(index, position);
        chain.into_iter().for_each(&mut push);

        for &sibling in siblings(index, position) {
            push(sibling);
        }
    }

    // Stable: discovery order is kept within a level.
    found.sort_by_key(|r| r.level);
    found
}

/// Relations at the same level sharing this relation's parent name, under
/// any relation of that name. Roots have no siblings.
fn siblings<'i>(index: &'i RelationIndex<'_>, position: usize) -> &'i [usize] {
    let relation = index.relation(position);
    match relation.parent.as_deref() {
        Some(parent) => index.with_parent_name(relation.level, parent),
        None => &[],
    }
}
