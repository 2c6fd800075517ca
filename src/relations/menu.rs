//! Dropdown menu ordering.

use hashbrown::HashSet;

use super::descendants::walk;
use super::index::RelationIndex;
use crate::error::Result;
use crate::models::{BoundaryRelation, MenuRole};

/// A relation together with how a grouped menu should show it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuEntry<'a> {
    pub relation: &'a BoundaryRelation,
    pub role: MenuRole,
}

/// Every relation in depth-first pre-order, roots in first-seen order.
///
/// This is the order a grouped dropdown lists them: each header followed by
/// its subheaders and items.
pub fn menu_order<'a>(index: &RelationIndex<'a>) -> Result<Vec<MenuEntry<'a>>> {
    let levels = &index.data().levels;
    let mut visited = HashSet::new();
    let mut positions = Vec::with_capacity(index.len());

    let roots: Vec<usize> = index.root_positions().collect();
    for root in roots {
        walk(index, root, &mut visited, &mut positions)?;
    }

    Ok(positions
        .into_iter()
        .map(|p| {
            let relation = index.relation(p);
            MenuEntry {
                relation,
                role: MenuRole::for_level(relation.level, levels),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelationTreeData;
    use crate::relations::fixtures::relation;

    #[test]
    fn test_menu_order_and_roles() {
        let data = RelationTreeData {
            levels: vec![0, 1, 2],
            relations: vec![
                relation(0, "Nordland", None, &["North"]),
                relation(0, "Ostland", None, &["Plains"]),
                relation(1, "North", Some("Nordland"), &["Ridge"]),
                relation(1, "Plains", Some("Ostland"), &[]),
                relation(2, "Ridge", Some("North"), &[]),
            ],
        };
        let index = RelationIndex::new(&data);
        let entries = menu_order(&index).unwrap();

        let listed: Vec<(&str, MenuRole)> = entries
            .iter()
            .map(|e| (e.relation.name.as_str(), e.role))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("Nordland", MenuRole::Header),
                ("North", MenuRole::SubHeader),
                ("Ridge", MenuRole::Item),
                ("Ostland", MenuRole::Header),
                ("Plains", MenuRole::SubHeader),
            ]
        );
    }
}
