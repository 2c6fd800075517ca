//! Lookup index over a built relation tree.

use hashbrown::HashMap;

use crate::models::{BoundaryRelation, RelationTreeData};

/// Exact identity lookup key, borrowed from the indexed relations.
type KeyRef<'a> = (usize, &'a str, Option<&'a str>);

/// Read-only index over a [`RelationTreeData`].
///
/// Built once per tree: identity and name lookups are hashed, and every
/// relation's parent and children are resolved up front so traversals never
/// rescan the relation list.
pub struct RelationIndex<'a> {
    data: &'a RelationTreeData,
    by_key: HashMap<KeyRef<'a>, usize>,
    by_name: HashMap<(usize, &'a str), Vec<usize>>,
    by_parent: HashMap<(usize, &'a str), Vec<usize>>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl<'a> RelationIndex<'a> {
    pub fn new(data: &'a RelationTreeData) -> Self {
        let relations = &data.relations;
        let mut by_key = HashMap::with_capacity(relations.len());
        let mut by_name: HashMap<(usize, &str), Vec<usize>> = HashMap::new();
        let mut by_parent: HashMap<(usize, &str), Vec<usize>> = HashMap::new();

        for (position, relation) in relations.iter().enumerate() {
            let key = (
                relation.level,
                relation.name.as_str(),
                relation.parent.as_deref(),
            );
            by_key.entry(key).or_insert(position);
            by_name
                .entry((relation.level, relation.name.as_str()))
                .or_default()
                .push(position);
            if let Some(parent) = relation.parent.as_deref() {
                by_parent
                    .entry((relation.level, parent))
                    .or_default()
                    .push(position);
            }
        }

        let children: Vec<Vec<usize>> = relations
            .iter()
            .map(|relation| {
                relation
                    .children
                    .iter()
                    .filter_map(|child| {
                        let key = (
                            relation.level + 1,
                            child.as_str(),
                            Some(relation.name.as_str()),
                        );
                        by_key.get(&key).copied()
                    })
                    .collect()
            })
            .collect();

        let mut index = Self {
            data,
            by_key,
            by_name,
            by_parent,
            parents: Vec::new(),
            children,
        };
        index.parents = (0..relations.len()).map(|p| index.find_parent(p)).collect();
        index
    }

    pub fn data(&self) -> &'a RelationTreeData {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.relations.is_empty()
    }

    /// Relation by identity.
    pub fn find(
        &self,
        level: usize,
        name: &str,
        parent: Option<&str>,
    ) -> Option<&'a BoundaryRelation> {
        self.by_key
            .get(&(level, name, parent))
            .map(|&p| self.relation(p))
    }

    /// Every relation with this name at this level, first-seen order.
    pub fn named<'b>(
        &'b self,
        level: usize,
        name: &'b str,
    ) -> impl Iterator<Item = &'a BoundaryRelation> + 'b {
        let positions = self
            .by_name
            .get(&(level, name))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        positions.iter().map(move |&p| self.relation(p))
    }

    /// Resolve `(level, name)` using the parent as a tie-breaker.
    ///
    /// With a parent hint the identity must match exactly. Without one, the
    /// first-seen relation of that name wins.
    pub fn resolve(
        &self,
        level: usize,
        name: &str,
        parent_hint: Option<&str>,
    ) -> Option<&'a BoundaryRelation> {
        self.resolve_position(level, name, parent_hint)
            .map(|p| self.relation(p))
    }

    pub fn parent(&self, relation: &BoundaryRelation) -> Option<&'a BoundaryRelation> {
        let position = self.position(relation)?;
        self.parent_of(position).map(|p| self.relation(p))
    }

    /// Child relations in `children` order; names with no relation are skipped.
    pub fn children(&self, relation: &BoundaryRelation) -> Vec<&'a BoundaryRelation> {
        self.position(relation)
            .map(|position| {
                self.children_of(position)
                    .iter()
                    .map(|&p| self.relation(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn roots(&self) -> impl Iterator<Item = &'a BoundaryRelation> {
        self.data.roots()
    }

    pub(crate) fn relation(&self, position: usize) -> &'a BoundaryRelation {
        &self.data.relations[position]
    }

    pub(crate) fn position(&self, relation: &BoundaryRelation) -> Option<usize> {
        self.by_key
            .get(&(relation.level, relation.name.as_str(), relation.parent.as_deref()))
            .copied()
    }

    pub(crate) fn resolve_position(
        &self,
        level: usize,
        name: &str,
        parent_hint: Option<&str>,
    ) -> Option<usize> {
        match parent_hint {
            Some(parent) => self.by_key.get(&(level, name, Some(parent))).copied(),
            None => self
                .by_name
                .get(&(level, name))
                .and_then(|candidates| candidates.first())
                .copied(),
        }
    }

    pub(crate) fn parent_of(&self, position: usize) -> Option<usize> {
        self.parents.get(position).copied().flatten()
    }

    pub(crate) fn children_of(&self, position: usize) -> &[usize] {
        self.children.get(position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Relations at `level` whose parent is named `parent`, across every
    /// same-named parent relation, first-seen order.
    pub(crate) fn with_parent_name<'b>(&'b self, level: usize, parent: &'b str) -> &'b [usize] {
        self.by_parent
            .get(&(level, parent))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn root_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.data
            .relations
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_root())
            .map(|(p, _)| p)
    }

    /// Parent of a relation: the relation one level up with the parent's name.
    /// Among same-named candidates, one listing this relation as a child wins,
    /// then first-seen order.
    fn find_parent(&self, position: usize) -> Option<usize> {
        let relation = self.relation(position);
        let parent_name = relation.parent.as_deref()?;
        let level = relation.level.checked_sub(1)?;
        let candidates = self.by_name.get(&(level, parent_name))?;

        candidates
            .iter()
            .copied()
            .find(|&c| self.relation(c).children.iter().any(|n| *n == relation.name))
            .or_else(|| candidates.first().copied())
    }

    #[cfg(test)]
    pub(crate) fn add_child_link(&mut self, from: usize, to: usize) {
        self.children[from].push(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::fixtures::relation;

    fn tree() -> RelationTreeData {
        RelationTreeData {
            levels: vec![0, 1, 2],
            relations: vec![
                relation(0, "Nordland", None, &["North", "South"]),
                relation(1, "North", Some("Nordland"), &["Central"]),
                relation(1, "South", Some("Nordland"), &["Central", "Bay"]),
                relation(2, "Central", Some("North"), &[]),
                relation(2, "Central", Some("South"), &[]),
                relation(2, "Bay", Some("South"), &[]),
            ],
        }
    }

    #[test]
    fn test_find_by_identity() {
        let data = tree();
        let index = RelationIndex::new(&data);
        let central = index.find(2, "Central", Some("South")).unwrap();
        assert_eq!(central.parent.as_deref(), Some("South"));
        assert!(index.find(2, "Central", Some("Nordland")).is_none());
        assert_eq!(index.named(2, "Central").count(), 2);
    }

    #[test]
    fn test_resolve_without_hint_takes_first_seen() {
        let data = tree();
        let index = RelationIndex::new(&data);
        let central = index.resolve(2, "Central", None).unwrap();
        assert_eq!(central.parent.as_deref(), Some("North"));
        assert!(index.resolve(2, "Central", Some("East")).is_none());
    }

    #[test]
    fn test_children_resolved_per_parent() {
        let data = tree();
        let index = RelationIndex::new(&data);
        let south = index.find(1, "South", Some("Nordland")).unwrap();
        let children = index.children(south);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].parent.as_deref(), Some("South"));
        assert_eq!(children[1].name, "Bay");
    }

    #[test]
    fn test_parent_prefers_candidate_listing_child() {
        let data = RelationTreeData {
            levels: vec![0, 1, 2],
            relations: vec![
                relation(0, "East", None, &["Central"]),
                relation(0, "West", None, &["Central"]),
                relation(1, "Central", Some("East"), &["Market"]),
                relation(1, "Central", Some("West"), &["Harbour"]),
                relation(2, "Harbour", Some("Central"), &[]),
            ],
        };
        let index = RelationIndex::new(&data);
        let harbour = index.find(2, "Harbour", Some("Central")).unwrap();
        let parent = index.parent(harbour).unwrap();
        assert_eq!(parent.parent.as_deref(), Some("West"));
        assert!(index.parent(index.find(0, "East", None).unwrap()).is_none());
    }

    #[test]
    fn test_named_and_parent_name_lookups() {
        let data = tree();
        let index = RelationIndex::new(&data);

        let query = String::from("Central");
        let parents: Vec<_> = index
            .named(2, &query)
            .map(|r| r.parent.as_deref())
            .collect();
        assert_eq!(parents, vec![Some("North"), Some("South")]);
        assert_eq!(index.named(2, "Nowhere").count(), 0);

        assert_eq!(index.with_parent_name(2, "South"), &[4, 5]);
        assert!(index.with_parent_name(2, "Nordland").is_empty());
    }

    #[test]
    fn test_root_positions() {
        let data = tree();
        let index = RelationIndex::new(&data);
        assert_eq!(index.root_positions().collect::<Vec<_>>(), vec![0]);
        assert_eq!(index.roots().count(), 1);
    }
}
