//! Canonical relation tree construction.
//!
//! A single hash-indexed pass groups flat records by `(level, name, parent)`.
//! Each group becomes one relation whose children are the distinct child
//! names of its members and whose envelope covers every member feature.

use hashbrown::{HashMap, HashSet};

use super::extract::{FeatureRelationExtractor, FlatRelationRecord, GapPolicy};
use crate::diagnostics::{Diagnostic, DiagnosticSink, NoOpSink};
use crate::error::{RelationError, Result};
use crate::models::{
    aggregate, AdminLevelSchema, BoundaryFeature, BoundaryRelation, Envelope, RelationKey,
    RelationTreeData,
};

/// Builds a [`RelationTreeData`] from boundary features.
pub struct RelationTreeBuilder<'a> {
    schema: &'a AdminLevelSchema,
    policy: GapPolicy,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> RelationTreeBuilder<'a> {
    pub fn new(schema: &'a AdminLevelSchema) -> Self {
        Self {
            schema,
            policy: GapPolicy::default(),
            sink: &NoOpSink,
        }
    }

    pub fn with_gap_policy(mut self, policy: GapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Extract and group in one go.
    pub fn build(&self, features: &[BoundaryFeature]) -> Result<RelationTreeData> {
        let extractor = FeatureRelationExtractor::new(self.schema, &self.policy, self.sink);
        let records = extractor.extract_all(features);
        build_relations(records, self.schema, self.sink)
    }
}

/// Members of one `(level, name, parent)` group.
struct Group {
    key: RelationKey,
    children: Vec<String>,
    seen_children: HashSet<String>,
    boxes: Vec<Envelope>,
}

impl Group {
    fn new(key: RelationKey) -> Self {
        Self {
            key,
            children: Vec::new(),
            seen_children: HashSet::new(),
            boxes: Vec::new(),
        }
    }

    fn add(&mut self, child: Option<String>, bbox: Envelope) {
        if let Some(child) = child {
            if self.seen_children.insert(child.clone()) {
                self.children.push(child);
            }
        }
        self.boxes.push(bbox);
    }

    fn into_relation(self) -> Result<BoundaryRelation> {
        debug_assert!(!self.boxes.is_empty(), "relation group without members");
        let bbox = aggregate(&self.boxes).map_err(|_| RelationError::EmptyGroup {
            level: self.key.level,
            name: self.key.name.clone(),
        })?;
        Ok(BoundaryRelation {
            name: self.key.name,
            parent: self.key.parent,
            level: self.key.level,
            children: self.children,
            bbox,
        })
    }
}

/// Group flat records into canonical relations.
///
/// Output is ordered by level, then by first appearance within the level.
/// Same-named relations at one level under different parents are kept apart
/// and reported as [`Diagnostic::AmbiguousName`].
pub fn build_relations(
    records: Vec<FlatRelationRecord>,
    schema: &AdminLevelSchema,
    sink: &dyn DiagnosticSink,
) -> Result<RelationTreeData> {
    let mut positions: HashMap<RelationKey, usize> = HashMap::with_capacity(records.len());
    let mut groups: Vec<Group> = Vec::new();

    for record in records {
        let key = RelationKey::new(record.level, record.value, record.parent);
        let position = match positions.get(&key) {
            Some(&position) => position,
            None => {
                let position = groups.len();
                positions.insert(key.clone(), position);
                groups.push(Group::new(key));
                position
            }
        };
        groups[position].add(record.child, record.bbox_lowest);
    }

    // Stable, so first-seen order survives within each level.
    groups.sort_by_key(|g| g.key.level);

    let relations = groups
        .into_iter()
        .map(Group::into_relation)
        .collect::<Result<Vec<_>>>()?;

    report_ambiguous_names(&relations, sink);

    Ok(RelationTreeData {
        levels: schema.levels(),
        relations,
    })
}

fn report_ambiguous_names(relations: &[BoundaryRelation], sink: &dyn DiagnosticSink) {
    let mut parents: HashMap<(usize, &str), Vec<Option<&str>>> = HashMap::new();
    let mut order: Vec<(usize, &str)> = Vec::new();

    for relation in relations {
        let entry = parents
            .entry((relation.level, relation.name.as_str()))
            .or_insert_with(|| {
                order.push((relation.level, relation.name.as_str()));
                Vec::new()
            });
        entry.push(relation.parent.as_deref());
    }

    for id in order {
        if let Some(found) = parents.get(&id) {
            if found.len() > 1 {
                sink.report(&Diagnostic::AmbiguousName {
                    level: id.0,
                    name: id.1.to_string(),
                    parents: found.iter().map(|p| p.map(str::to_string)).collect(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use geo::{polygon, MultiPolygon};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
            (x: x0, y: y0),
        ]])
    }

    fn feature(x0: f64, y0: f64, x1: f64, y1: f64, names: &[(&str, &str)]) -> BoundaryFeature {
        names
            .iter()
            .fold(BoundaryFeature::new(rect(x0, y0, x1, y1)), |f, (k, v)| {
                f.with_property(*k, *v)
            })
    }

    fn env(a: f64, b: f64, c: f64, d: f64) -> Envelope {
        Envelope::new(a, b, c, d).unwrap()
    }

    #[test]
    fn test_two_region_example() {
        let schema = AdminLevelSchema::new(["country", "region"]);
        let features = vec![
            feature(0.0, 0.0, 1.0, 1.0, &[("country", "Nordland"), ("region", "A")]),
            feature(2.0, 2.0, 3.0, 3.0, &[("country", "Nordland"), ("region", "B")]),
        ];

        let tree = RelationTreeBuilder::new(&schema).build(&features).unwrap();
        assert_eq!(tree.levels, vec![0, 1]);
        assert_eq!(
            tree.relations,
            vec![
                BoundaryRelation {
                    name: "Nordland".to_string(),
                    parent: None,
                    level: 0,
                    children: vec!["A".to_string(), "B".to_string()],
                    bbox: env(0.0, 0.0, 3.0, 3.0),
                },
                BoundaryRelation {
                    name: "A".to_string(),
                    parent: Some("Nordland".to_string()),
                    level: 1,
                    children: vec![],
                    bbox: env(0.0, 0.0, 1.0, 1.0),
                },
                BoundaryRelation {
                    name: "B".to_string(),
                    parent: Some("Nordland".to_string()),
                    level: 1,
                    children: vec![],
                    bbox: env(2.0, 2.0, 3.0, 3.0),
                },
            ]
        );
    }

    #[test]
    fn test_children_deduplicated_in_first_seen_order() {
        let schema = AdminLevelSchema::new(["country", "region", "district"]);
        let district = |x: f64, y: f64, region: &str, district: &str| {
            feature(
                x,
                y,
                x + 1.0,
                y + 1.0,
                &[("country", "N"), ("region", region), ("district", district)],
            )
        };
        let features = vec![
            district(0.0, 0.0, "West", "d1"),
            district(1.0, 0.0, "East", "d2"),
            district(0.0, 1.0, "West", "d3"),
        ];

        let tree = RelationTreeBuilder::new(&schema).build(&features).unwrap();
        let root = tree.roots().next().unwrap();
        assert_eq!(root.children, vec!["West", "East"]);

        let west = tree.at_level(1).find(|r| r.name == "West").unwrap();
        assert_eq!(west.children, vec!["d1", "d3"]);
        assert_eq!(west.bbox, env(0.0, 0.0, 1.0, 2.0));
    }

    #[test]
    fn test_same_name_under_different_parents_stays_apart() {
        let schema = AdminLevelSchema::new(["province", "district"]);
        let features = vec![
            feature(0.0, 0.0, 1.0, 1.0, &[("province", "North"), ("district", "Central")]),
            feature(5.0, 5.0, 6.0, 6.0, &[("province", "South"), ("district", "Central")]),
        ];
        let sink = CollectingSink::new();

        let tree = RelationTreeBuilder::new(&schema)
            .with_sink(&sink)
            .build(&features)
            .unwrap();

        let centrals: Vec<_> = tree.at_level(1).filter(|r| r.name == "Central").collect();
        assert_eq!(centrals.len(), 2);
        assert_eq!(centrals[0].bbox, env(0.0, 0.0, 1.0, 1.0));
        assert_eq!(centrals[1].bbox, env(5.0, 5.0, 6.0, 6.0));

        assert_eq!(
            sink.take(),
            vec![Diagnostic::AmbiguousName {
                level: 1,
                name: "Central".to_string(),
                parents: vec![Some("North".to_string()), Some("South".to_string())],
            }]
        );
    }

    #[test]
    fn test_output_grouped_by_level() {
        let schema = AdminLevelSchema::new(["country", "region"]);
        let features = vec![
            feature(0.0, 0.0, 1.0, 1.0, &[("country", "X"), ("region", "x1")]),
            feature(2.0, 0.0, 3.0, 1.0, &[("country", "Y"), ("region", "y1")]),
        ];

        let tree = RelationTreeBuilder::new(&schema).build(&features).unwrap();
        let names: Vec<&str> = tree.relations.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y", "x1", "y1"]);
    }

    #[test]
    fn test_records_grouped_directly() {
        let schema = AdminLevelSchema::new(["country"]);
        let records = vec![
            FlatRelationRecord {
                level: 0,
                value: "Solo".to_string(),
                parent: None,
                child: None,
                bbox_lowest: env(0.0, 0.0, 1.0, 1.0),
                feature: 0,
            },
            FlatRelationRecord {
                level: 0,
                value: "Solo".to_string(),
                parent: None,
                child: None,
                bbox_lowest: env(-1.0, 0.5, 0.5, 4.0),
                feature: 1,
            },
        ];

        let tree = build_relations(records, &schema, &NoOpSink).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.relations[0].bbox, env(-1.0, 0.0, 1.0, 4.0));
    }

    #[test]
    fn test_empty_dataset() {
        let schema = AdminLevelSchema::new(["country", "region"]);
        let tree = RelationTreeBuilder::new(&schema).build(&[]).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.levels, vec![0, 1]);
    }
}
