//! Subtree collection along `children` links.

use hashbrown::HashSet;

use super::index::RelationIndex;
use crate::error::{RelationError, Result};
use crate::models::BoundaryRelation;

/// The relation named `name` at `level` and everything reachable from it,
/// in depth-first pre-order.
///
/// Fails with [`RelationError::NotFound`] for an unknown relation and with
/// [`RelationError::CycleDetected`] if a child link leads back onto the
/// current path.
pub fn descendants<'a>(
    index: &RelationIndex<'a>,
    level: usize,
    name: &str,
    parent_hint: Option<&str>,
) -> Result<Vec<&'a BoundaryRelation>> {
    let start = index
        .resolve_position(level, name, parent_hint)
        .ok_or_else(|| RelationError::NotFound {
            level,
            name: name.to_string(),
        })?;

    let mut visited = HashSet::new();
    let mut out = Vec::new();
    walk(index, start, &mut visited, &mut out)?;
    Ok(out.into_iter().map(|p| index.relation(p)).collect())
}

/// Iterative pre-order walk from `start`, appending unvisited positions.
///
/// A node reached a second time from a different branch is skipped; a node
/// that is still on the current path is a cycle.
pub(crate) fn walk(
    index: &RelationIndex<'_>,
    start: usize,
    visited: &mut HashSet<usize>,
    out: &mut Vec<usize>,
) -> Result<()> {
    if !visited.insert(start) {
        return Ok(());
    }

    let mut on_path: HashSet<usize> = HashSet::new();
    on_path.insert(start);
    out.push(start);

    // (node, next child cursor)
    let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

    while let Some(&(node, cursor)) = stack.last() {
        let Some(&child) = index.children_of(node).get(cursor) else {
            on_path.remove(&node);
            stack.pop();
            continue;
        };

        let top = stack.len() - 1;
        stack[top].1 += 1;

        if on_path.contains(&child) {
            let relation = index.relation(child);
            return Err(RelationError::CycleDetected {
                level: relation.level,
                name: relation.name.clone(),
            });
        }
        if !visited.insert(child) {
            continue;
        }

        on_path.insert(child);
        out.push(child);
        stack.push((child, 0));
    }

    Ok(())
}
