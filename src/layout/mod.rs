mod grid;
mod pack;
mod scale;

use crate::cases::{Field, Snapshot, Summary, group_by};

pub use grid::{GroupedLayout, LABEL_BAND, pack_groups};
pub use pack::{Circle, LayoutNode, PackEngine, PackLayout, SortMode};
pub use scale::RadiusScale;

/// What the chart arranges bubbles by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grouping {
    All,
    By(Field),
}

impl Grouping {
    pub const TABS: [Grouping; 3] = [
        Grouping::All,
        Grouping::By(Field::Judge),
        Grouping::By(Field::County),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::By(Field::Judge) => "Judge",
            Self::By(Field::County) => "County",
            Self::By(field) => field.column(),
        }
    }
}

/// Geometry for one chart pass, always recomputed from scratch.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartLayout {
    Flat {
        layout: PackLayout,
        summary: Summary,
        height: f64,
    },
    Grouped(GroupedLayout),
}

impl ChartLayout {
    /// Packs `snapshot` into a `width` x `height` viewport. A flat pack whose
    /// root outgrows the viewport extends the content height downwards.
    pub fn compute(
        engine: &PackEngine,
        scale: &RadiusScale,
        snapshot: &Snapshot,
        grouping: Grouping,
        width: f64,
        height: f64,
    ) -> Self {
        match grouping {
            Grouping::All => {
                let mut layout = engine.pack(
                    snapshot.records(),
                    |record| record.id.as_str(),
                    |record| record.weight(),
                    scale,
                    width,
                    height,
                );
                let diameter = layout.root().map_or(0.0, |root| root.circle.r * 2.0);
                let content_height = if diameter > height {
                    layout.translate(0.0, (diameter - height) / 2.0);
                    diameter
                } else {
                    height
                };

                Self::Flat {
                    layout,
                    summary: Summary::of(snapshot.records()),
                    height: content_height,
                }
            }
            Grouping::By(field) => {
                let groups = group_by(snapshot, field);
                Self::Grouped(pack_groups(engine, &groups, scale, width))
            }
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Self::Flat { height, .. } => *height,
            Self::Grouped(grouped) => grouped.height,
        }
    }

    /// Every positioned leaf, keyed by case id.
    pub fn leaves(&self) -> Box<dyn Iterator<Item = (&str, Circle)> + '_> {
        match self {
            Self::Flat { layout, .. } => Box::new(layout.leaves().filter_map(leaf_entry)),
            Self::Grouped(grouped) => Box::new(
                grouped
                    .cells
                    .iter()
                    .flat_map(|cell| cell.layout.leaves().filter_map(leaf_entry)),
            ),
        }
    }
}

fn leaf_entry(node: &LayoutNode) -> Option<(&str, Circle)> {
    node.leaf_id().map(|id| (id, node.circle))
}

/// Scale fitted to the full dataset and the chart's drawing diameter.
pub fn dataset_scale(base: &Snapshot, width: f64, height: f64) -> RadiusScale {
    let (min_non_zero, max) = base.weight_bounds();
    RadiusScale::new(min_non_zero, max, width.min(height))
}

#[cfg(test)]
mod tests {
    use super::scale::MIN_RADIUS;
    use super::*;
    use crate::cases::test_record as record;

    fn three_cases() -> Snapshot {
        let mut na = record("na", 0.0, "Kern", "");
        na.is_na = true;
        Snapshot::from_records(vec![
            na,
            record("small", 100.0, "Kern", ""),
            record("large", 500.0, "Fresno", ""),
        ])
    }

    #[test]
    fn flat_chart_sizes_na_and_largest_cases() {
        let snapshot = three_cases();
        let scale = dataset_scale(&snapshot, 900.0, 600.0);
        let engine = PackEngine::new(SortMode::Descending, PackEngine::DEFAULT_PADDING);
        let chart = ChartLayout::compute(&engine, &scale, &snapshot, Grouping::All, 900.0, 600.0);

        let leaves = chart.leaves().collect::<Vec<_>>();
        assert_eq!(leaves.len(), 3);
        let radius = |id: &str| {
            leaves
                .iter()
                .find(|(leaf, _)| *leaf == id)
                .map(|(_, circle)| circle.r)
                .expect("leaf")
        };
        assert_eq!(radius("na"), MIN_RADIUS);
        assert_eq!(radius("large"), 60.0);
        assert!(radius("large") > radius("small"));
        assert_eq!(chart.height(), 600.0);
    }

    #[test]
    fn oversized_flat_pack_extends_content_height() {
        let records = (0..80)
            .map(|index| record(&index.to_string(), 1_000.0 + index as f64, "Kern", ""))
            .collect();
        let snapshot = Snapshot::from_records(records);
        let scale = dataset_scale(&snapshot, 2_000.0, 2_000.0);
        let engine = PackEngine::new(SortMode::Ascending, PackEngine::DEFAULT_PADDING);
        let chart = ChartLayout::compute(&engine, &scale, &snapshot, Grouping::All, 400.0, 300.0);

        let ChartLayout::Flat { layout, height, .. } = &chart else {
            panic!("flat layout expected");
        };
        let root = layout.root().expect("root").circle;
        assert!(*height > 300.0);
        assert!((root.y - root.r).abs() < 1e-6);
        assert!((*height - root.r * 2.0).abs() < 1e-6);
    }

    #[test]
    fn grouped_chart_yields_one_cell_per_value() {
        let snapshot = three_cases();
        let scale = dataset_scale(&snapshot, 900.0, 600.0);
        let engine = PackEngine::new(SortMode::Descending, PackEngine::DEFAULT_PADDING);
        let chart = ChartLayout::compute(
            &engine,
            &scale,
            &snapshot,
            Grouping::By(Field::County),
            900.0,
            600.0,
        );

        let ChartLayout::Grouped(grouped) = &chart else {
            panic!("grouped layout expected");
        };
        assert_eq!(grouped.cells.len(), 2);
        assert_eq!(grouped.cells[0].name, "Fresno");
        assert_eq!(chart.leaves().count(), 3);
    }

    #[test]
    fn empty_snapshot_packs_to_nothing() {
        let snapshot = Snapshot::default();
        let scale = dataset_scale(&snapshot, 900.0, 600.0);
        let engine = PackEngine::new(SortMode::Descending, PackEngine::DEFAULT_PADDING);
        let chart = ChartLayout::compute(&engine, &scale, &snapshot, Grouping::All, 900.0, 600.0);
        assert_eq!(chart.leaves().count(), 0);
        assert_eq!(chart.height(), 600.0);
    }
}
