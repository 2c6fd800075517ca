//! Per-feature flat relation records.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::models::{AdminLevelSchema, BoundaryFeature, Envelope};

/// One feature's view of one admin level.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRelationRecord {
    pub level: usize,
    pub value: String,
    pub parent: Option<String>,
    pub child: Option<String>,
    /// Envelope of the contributing feature
    pub bbox_lowest: Envelope,
    /// Position of the contributing feature in the dataset
    pub feature: usize,
}

/// What to do with a feature that skips an intermediate level, e.g. has a
/// `district` but no `region`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Keep levels down to the first missing one; drop everything deeper.
    #[default]
    Drop,
    /// Fill a missing level that has a deeper value with a placeholder name.
    Synthetic { label: String },
}

/// Turns features into flat relation records, one per present level.
pub struct FeatureRelationExtractor<'a> {
    schema: &'a AdminLevelSchema,
    policy: &'a GapPolicy,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> FeatureRelationExtractor<'a> {
    pub fn new(
        schema: &'a AdminLevelSchema,
        policy: &'a GapPolicy,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            schema,
            policy,
            sink,
        }
    }

    /// Records for every feature, in feature order then level order.
    pub fn extract_all(&self, features: &[BoundaryFeature]) -> Vec<FlatRelationRecord> {
        let mut records = Vec::with_capacity(features.len() * self.schema.len());
        for (position, feature) in features.iter().enumerate() {
            records.extend(self.extract(position, feature));
        }
        records
    }

    /// Records for one feature. A feature without geometry contributes nothing;
    /// missing levels are handled per [`GapPolicy`] and never abort the feature.
    pub fn extract(&self, position: usize, feature: &BoundaryFeature) -> Vec<FlatRelationRecord> {
        let Some(bbox) = feature.envelope() else {
            self.sink
                .report(&Diagnostic::EmptyGeometry { feature: position });
            return Vec::new();
        };

        let values = self.resolve_levels(position, feature);

        let mut records = Vec::with_capacity(values.len());
        for (level, value) in values.iter().enumerate() {
            let Some(value) = value else {
                continue;
            };
            let parent = level
                .checked_sub(1)
                .and_then(|l| values[l])
                .map(str::to_string);
            let child = values.get(level + 1).copied().flatten().map(str::to_string);

            records.push(FlatRelationRecord {
                level,
                value: value.to_string(),
                parent,
                child,
                bbox_lowest: bbox,
                feature: position,
            });
        }
        records
    }

    /// Level values after applying the gap policy.
    fn resolve_levels<'f>(
        &'f self,
        position: usize,
        feature: &'f BoundaryFeature,
    ) -> Vec<Option<&'f str>> {
        let mut values: Vec<Option<&str>> = (0..self.schema.len())
            .map(|level| feature.level_value(self.schema, level))
            .collect();

        for (level, value) in values.iter().enumerate() {
            if value.is_none() {
                self.sink.report(&Diagnostic::MissingProperty {
                    feature: position,
                    level,
                    key: self.schema.key(level).unwrap_or_default().to_string(),
                });
            }
        }

        let Some(first_gap) = values.iter().position(Option::is_none) else {
            return values;
        };

        match self.policy {
            GapPolicy::Drop => {
                for (level, value) in values.iter().enumerate().skip(first_gap + 1) {
                    if let Some(name) = value {
                        self.sink.report(&Diagnostic::OrphanDropped {
                            feature: position,
                            level,
                            name: name.to_string(),
                        });
                    }
                }
                values.truncate(first_gap);
            }
            GapPolicy::Synthetic { label } => {
                if let Some(deepest) = values.iter().rposition(Option::is_some) {
                    for value in values.iter_mut().take(deepest) {
                        if value.is_none() {
                            *value = Some(label.as_str());
                        }
                    }
                }
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, NoOpSink};
    use geo::{polygon, MultiPolygon};

    fn square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
            (x: x, y: y),
        ]])
    }

    fn schema() -> AdminLevelSchema {
        AdminLevelSchema::new(["country", "region", "district"])
    }

    #[test]
    fn test_full_feature_yields_one_record_per_level() {
        let schema = schema();
        let policy = GapPolicy::Drop;
        let extractor = FeatureRelationExtractor::new(&schema, &policy, &NoOpSink);
        let feature = BoundaryFeature::new(square(2.0, 3.0))
            .with_property("country", "Nordland")
            .with_property("region", "Coast")
            .with_property("district", "Harbour");

        let records = extractor.extract(4, &feature);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].value, "Nordland");
        assert_eq!(records[0].parent, None);
        assert_eq!(records[0].child.as_deref(), Some("Coast"));

        assert_eq!(records[2].level, 2);
        assert_eq!(records[2].parent.as_deref(), Some("Coast"));
        assert_eq!(records[2].child, None);

        let expected = Envelope::new(2.0, 3.0, 3.0, 4.0).unwrap();
        assert!(records.iter().all(|r| r.bbox_lowest == expected && r.feature == 4));
    }

    #[test]
    fn test_trailing_missing_level_is_omitted() {
        let schema = schema();
        let policy = GapPolicy::Drop;
        let sink = CollectingSink::new();
        let extractor = FeatureRelationExtractor::new(&schema, &policy, &sink);
        let feature = BoundaryFeature::new(square(0.0, 0.0))
            .with_property("country", "Nordland")
            .with_property("region", "Coast");

        let records = extractor.extract(0, &feature);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].child, None);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::MissingProperty {
                feature: 0,
                level: 2,
                key: "district".to_string()
            }]
        );
    }

    #[test]
    fn test_drop_policy_discards_levels_below_gap() {
        let schema = schema();
        let policy = GapPolicy::Drop;
        let sink = CollectingSink::new();
        let extractor = FeatureRelationExtractor::new(&schema, &policy, &sink);
        let feature = BoundaryFeature::new(square(0.0, 0.0))
            .with_property("country", "Nordland")
            .with_property("district", "Harbour");

        let records = extractor.extract(1, &feature);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, "Nordland");
        assert_eq!(records[0].child, None);

        let diagnostics = sink.take();
        assert!(diagnostics.contains(&Diagnostic::OrphanDropped {
            feature: 1,
            level: 2,
            name: "Harbour".to_string()
        }));
    }

    #[test]
    fn test_synthetic_policy_fills_gap() {
        let schema = schema();
        let policy = GapPolicy::Synthetic {
            label: "Unknown".to_string(),
        };
        let extractor = FeatureRelationExtractor::new(&schema, &policy, &NoOpSink);
        let feature = BoundaryFeature::new(square(0.0, 0.0))
            .with_property("country", "Nordland")
            .with_property("district", "Harbour");

        let records = extractor.extract(0, &feature);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].child.as_deref(), Some("Unknown"));
        assert_eq!(records[1].value, "Unknown");
        assert_eq!(records[2].parent.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_synthetic_policy_does_not_fill_trailing_levels() {
        let schema = schema();
        let policy = GapPolicy::Synthetic {
            label: "Unknown".to_string(),
        };
        let extractor = FeatureRelationExtractor::new(&schema, &policy, &NoOpSink);
        let feature = BoundaryFeature::new(square(0.0, 0.0)).with_property("country", "Nordland");

        let records = extractor.extract(0, &feature);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_geometry_contributes_nothing() {
        let schema = schema();
        let policy = GapPolicy::Drop;
        let sink = CollectingSink::new();
        let extractor = FeatureRelationExtractor::new(&schema, &policy, &sink);
        let feature =
            BoundaryFeature::new(MultiPolygon::new(vec![])).with_property("country", "Nordland");

        assert!(extractor.extract(3, &feature).is_empty());
        assert_eq!(sink.take(), vec![Diagnostic::EmptyGeometry { feature: 3 }]);
    }

    #[test]
    fn test_extract_all_keeps_other_features() {
        let schema = schema();
        let policy = GapPolicy::Drop;
        let extractor = FeatureRelationExtractor::new(&schema, &policy, &NoOpSink);
        let features = vec![
            BoundaryFeature::new(square(0.0, 0.0)).with_property("region", "Lost"),
            BoundaryFeature::new(square(1.0, 1.0))
                .with_property("country", "Nordland")
                .with_property("region", "Coast")
                .with_property("district", "Harbour"),
        ];

        let records = extractor.extract_all(&features);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.feature == 1));
    }
}
