use crate::cases::{CaseGroup, Summary};

use super::pack::{PackEngine, PackLayout};
#[cfg(test)]
use super::pack::Circle;
use super::scale::RadiusScale;

pub const PREFERRED_COLUMN_WIDTH: f64 = 300.0;
/// Height reserved at the top of each cell for its group label.
pub const LABEL_BAND: f64 = 20.0;

/// Row-major grid of square cells, one per group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupGrid {
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GroupGrid {
    pub fn new(width: f64, preferred_column_width: f64) -> Self {
        let quotient = width / preferred_column_width;
        let (columns, cell_width) = if quotient < 1.0 || !quotient.is_finite() {
            (1, width.max(0.0))
        } else {
            let columns = (quotient.round() as usize).max(1);
            (columns, width / columns as f64)
        };

        Self {
            columns,
            cell_width,
            cell_height: cell_width,
        }
    }

    /// Top-left corner of the pack area for the `index`-th group.
    pub fn cell_origin(&self, index: usize) -> (f64, f64) {
        let column = index % self.columns;
        let row = index / self.columns;
        (
            self.cell_width * column as f64,
            self.cell_height * row as f64 + LABEL_BAND,
        )
    }

    /// Height left for the pack once the label band is taken off the cell.
    pub fn pack_height(&self) -> f64 {
        (self.cell_height - LABEL_BAND).max(0.0)
    }

    pub fn content_height(&self, groups: usize) -> f64 {
        groups.div_ceil(self.columns) as f64 * self.cell_height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupCell {
    pub name: String,
    pub bounds: CellBounds,
    pub layout: PackLayout,
    pub summary: Summary,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellBounds {
    #[cfg(test)]
    pub fn contains(&self, circle: &Circle, tolerance: f64) -> bool {
        circle.x - circle.r >= self.x - tolerance
            && circle.x + circle.r <= self.x + self.width + tolerance
            && circle.y - circle.r >= self.y - tolerance
            && circle.y + circle.r <= self.y + self.height + tolerance
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupedLayout {
    pub cells: Vec<GroupCell>,
    pub height: f64,
}

/// One independent pack per group, each confined to its own grid cell.
pub fn pack_groups(
    engine: &PackEngine,
    groups: &[CaseGroup],
    scale: &RadiusScale,
    width: f64,
) -> GroupedLayout {
    let grid = GroupGrid::new(width, PREFERRED_COLUMN_WIDTH);
    let cells = groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let (x, y) = grid.cell_origin(index);
            let mut layout = engine.pack(
                group.cases.records(),
                |record| record.id.as_str(),
                |record| record.weight(),
                scale,
                grid.cell_width,
                grid.pack_height(),
            );
            layout.fit_within(grid.cell_width.min(grid.pack_height()));
            layout.translate(x, y);

            GroupCell {
                name: group.name.clone(),
                bounds: CellBounds {
                    x,
                    y,
                    width: grid.cell_width,
                    height: grid.pack_height(),
                },
                layout,
                summary: Summary::of(group.cases.records()),
            }
        })
        .collect::<Vec<_>>();

    GroupedLayout {
        height: grid.content_height(cells.len()),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{Field, Snapshot, group_by};
    use crate::cases::test_record as record;
    use crate::layout::SortMode;

    #[test]
    fn column_count_follows_available_width() {
        let narrow = GroupGrid::new(240.0, PREFERRED_COLUMN_WIDTH);
        assert_eq!(narrow.columns, 1);
        assert_eq!(narrow.cell_width, 240.0);

        let wide = GroupGrid::new(1000.0, PREFERRED_COLUMN_WIDTH);
        assert_eq!(wide.columns, 3);
        assert!((wide.cell_width - 1000.0 / 3.0).abs() < 1e-9);
        assert_eq!(wide.cell_height, wide.cell_width);
    }

    #[test]
    fn cells_fill_rows_first() {
        let grid = GroupGrid::new(900.0, PREFERRED_COLUMN_WIDTH);
        assert_eq!(grid.cell_origin(0), (0.0, LABEL_BAND));
        assert_eq!(grid.cell_origin(2), (600.0, LABEL_BAND));
        assert_eq!(grid.cell_origin(3), (0.0, 300.0 + LABEL_BAND));
        assert_eq!(grid.content_height(4), 600.0);
        assert_eq!(grid.content_height(3), 300.0);
    }

    #[test]
    fn every_group_stays_inside_its_cell() {
        let mut records = Vec::new();
        for index in 0..40 {
            let county = ["Kern", "Fresno", "Alameda"][index % 3];
            records.push(record(&index.to_string(), (index * 1_000) as f64, county, ""));
        }
        let snapshot = Snapshot::from_records(records);
        let groups = group_by(&snapshot, Field::County);
        let (min, max) = snapshot.weight_bounds();
        let scale = RadiusScale::new(min, max, 900.0);
        let engine = PackEngine::new(SortMode::Descending, PackEngine::DEFAULT_PADDING);

        let grouped = pack_groups(&engine, &groups, &scale, 640.0);
        assert_eq!(GroupGrid::new(640.0, PREFERRED_COLUMN_WIDTH).columns, 2);
        assert_eq!(grouped.cells.len(), 3);
        assert_eq!(grouped.height, 640.0);

        let names = grouped.cells.iter().map(|cell| cell.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Alameda", "Fresno", "Kern"]);
        for cell in &grouped.cells {
            for node in cell.layout.nodes() {
                assert!(cell.bounds.contains(&node.circle, 1e-6), "{node:?} escapes {:?}", cell.bounds);
            }
            assert_eq!(cell.summary.count, cell.layout.leaves().count());
        }
    }

    #[test]
    fn packs_stop_above_the_next_row_label() {
        let records = (0..6)
            .map(|index| {
                let county = ["Kern", "Fresno"][index % 2];
                record(&index.to_string(), (index + 1) as f64 * 1_000.0, county, "")
            })
            .collect();
        let snapshot = Snapshot::from_records(records);
        let groups = group_by(&snapshot, Field::County);
        let (min, max) = snapshot.weight_bounds();
        let scale = RadiusScale::new(min, max, 4_000.0);
        let engine = PackEngine::new(SortMode::Descending, PackEngine::DEFAULT_PADDING);

        let grouped = pack_groups(&engine, &groups, &scale, 300.0);
        assert_eq!(grouped.cells.len(), 2);
        assert_eq!(grouped.height, 600.0);

        let first = &grouped.cells[0];
        let second_row_label = grouped.cells[1].bounds.y - LABEL_BAND;
        assert_eq!(first.bounds.height, 300.0 - LABEL_BAND);
        assert!(first.bounds.y + first.bounds.height <= second_row_label + 1e-9);

        let root = first.layout.root().expect("root").circle;
        assert!((root.r * 2.0 - first.bounds.height).abs() < 1e-6);
        for node in first.layout.nodes() {
            assert!(node.circle.y + node.circle.r <= second_row_label + 1e-6);
        }
    }
}
