//! Scrolling brick formation
//!
//! Cells are addressed by (column, row) and stored column-major, which is
//! also the hit-test scan order. The whole formation drifts horizontally by a
//! shared scroll offset that wraps modulo the formation width.

use glam::Vec2;

use super::collision::Aabb;
use crate::tuning::Tuning;
use crate::{Rgba, wrap};

/// Row colors, cycled by row index
pub const BRICK_PALETTE: [Rgba; 8] = [
    [1.0, 0.0, 1.0, 1.0], // magenta
    [0.0, 1.0, 1.0, 1.0], // cyan
    [1.0, 1.0, 0.0, 1.0], // yellow
    [1.0, 0.0, 0.6, 1.0], // hot pink
    [0.2, 0.8, 0.2, 1.0], // green
    [1.0, 0.4, 0.0, 1.0], // orange
    [0.4, 1.0, 0.4, 1.0], // lime
    [1.0, 0.2, 0.8, 1.0], // pink
];

/// Color of every brick in `row`
#[inline]
pub fn row_color(row: usize) -> Rgba {
    BRICK_PALETTE[row % BRICK_PALETTE.len()]
}

/// Fixed geometry of the formation
#[derive(Debug, Clone, PartialEq)]
pub struct BrickLayout {
    pub columns: usize,
    pub rows: usize,
    pub brick_size: Vec2,
    pub padding: f32,
    pub offset_y: f32,
    /// Scroll offset at round start
    pub start_offset: f32,
    /// Scroll per nominal frame
    pub drift: f32,
}

impl BrickLayout {
    /// Fit as many columns as the field allows between the side margins
    pub fn for_field(field_width: f32, tuning: &Tuning) -> Self {
        let pitch = tuning.brick_width + tuning.brick_padding;
        let usable = field_width - 2.0 * tuning.brick_offset_x;
        let columns = ((usable / pitch).floor().max(0.0) as usize).max(1);
        Self {
            columns,
            rows: tuning.brick_rows,
            brick_size: Vec2::new(tuning.brick_width, tuning.brick_height),
            padding: tuning.brick_padding,
            offset_y: tuning.brick_offset_y,
            start_offset: tuning.brick_offset_x,
            drift: tuning.brick_drift,
        }
    }

    /// Horizontal distance between neighbouring column origins
    #[inline]
    pub fn column_pitch(&self) -> f32 {
        self.brick_size.x + self.padding
    }

    /// Total span of one formation, the scroll wrap modulus
    #[inline]
    pub fn formation_width(&self) -> f32 {
        self.columns as f32 * self.column_pitch()
    }

    #[inline]
    pub fn row_y(&self, row: usize) -> f32 {
        row as f32 * (self.brick_size.y + self.padding) + self.offset_y
    }
}

/// One cell of the formation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brick {
    pub intact: bool,
    pub color: Rgba,
}

/// The brick formation plus its scroll offset
#[derive(Debug, Clone)]
pub struct BrickGrid {
    layout: BrickLayout,
    cells: Vec<Brick>,
    scroll_offset: f32,
}

impl BrickGrid {
    pub fn new(layout: BrickLayout) -> Self {
        let mut grid = Self {
            cells: Vec::with_capacity(layout.columns * layout.rows),
            scroll_offset: 0.0,
            layout,
        };
        grid.reset();
        grid
    }

    /// Restore every brick and the starting scroll offset
    pub fn reset(&mut self) {
        self.cells.clear();
        for _column in 0..self.layout.columns {
            for row in 0..self.layout.rows {
                self.cells.push(Brick {
                    intact: true,
                    color: row_color(row),
                });
            }
        }
        self.scroll_offset = wrap(self.layout.start_offset, self.layout.formation_width());
    }

    pub fn layout(&self) -> &BrickLayout {
        &self.layout
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.layout.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    #[inline]
    fn index(&self, column: usize, row: usize) -> usize {
        column * self.layout.rows + row
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&Brick> {
        if column >= self.layout.columns || row >= self.layout.rows {
            return None;
        }
        self.cells.get(self.index(column, row))
    }

    /// Advance the drift by `delta` pixels, wrapping into `[0, formation_width)`
    pub fn shift(&mut self, delta: f32) {
        self.scroll_offset = wrap(self.scroll_offset + delta, self.layout.formation_width());
    }

    /// Per-frame drift, scaled for frame time
    pub fn scroll(&mut self, dt_scale: f32) {
        if self.layout.drift != 0.0 {
            self.shift(self.layout.drift * dt_scale);
        }
    }

    /// Primary on-screen X of a column (before field wrapping)
    ///
    /// Renderers draw each brick here and again one formation width to the left.
    #[inline]
    pub fn draw_x(&self, column: usize) -> f32 {
        column as f32 * self.layout.column_pitch() + self.scroll_offset
    }

    /// X used for hit testing: the primary X wrapped into the field
    #[inline]
    pub fn hit_x(&self, column: usize, field_width: f32) -> f32 {
        wrap(self.draw_x(column), field_width)
    }

    /// Hit-test rectangle of a cell
    pub fn hit_rect(&self, column: usize, row: usize, field_width: f32) -> Aabb {
        Aabb::from_origin_size(
            Vec2::new(self.hit_x(column, field_width), self.layout.row_y(row)),
            self.layout.brick_size,
        )
    }

    /// First intact cell overlapping `bounds`, scanning columns then rows
    pub fn first_hit(&self, bounds: &Aabb, field_width: f32) -> Option<(usize, usize)> {
        for column in 0..self.layout.columns {
            for row in 0..self.layout.rows {
                if !self.cells[self.index(column, row)].intact {
                    continue;
                }
                if self.hit_rect(column, row, field_width).overlaps(bounds) {
                    return Some((column, row));
                }
            }
        }
        None
    }

    /// Mark a cell broken. Returns false if it was already broken or out of range.
    pub fn break_cell(&mut self, column: usize, row: usize) -> bool {
        if column >= self.layout.columns || row >= self.layout.rows {
            return false;
        }
        let index = self.index(column, row);
        let brick = &mut self.cells[index];
        if !brick.intact {
            return false;
        }
        brick.intact = false;
        true
    }

    pub fn intact_count(&self) -> usize {
        self.cells.iter().filter(|b| b.intact).count()
    }

    pub fn all_broken(&self) -> bool {
        self.cells.iter().all(|b| !b.intact)
    }

    /// Intact bricks as (column, row, brick), column-major
    pub fn intact(&self) -> impl Iterator<Item = (usize, usize, &Brick)> + '_ {
        let rows = self.layout.rows;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, b)| b.intact)
            .map(move |(i, b)| (i / rows, i % rows, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(field_width: f32) -> BrickGrid {
        BrickGrid::new(BrickLayout::for_field(field_width, &Tuning::default()))
    }

    #[test]
    fn test_layout_fits_columns_between_margins() {
        // (800 - 60) / 85 = 8.7
        let layout = BrickLayout::for_field(800.0, &Tuning::default());
        assert_eq!(layout.columns, 8);
        assert_eq!(layout.rows, 5);
        assert_eq!(layout.formation_width(), 680.0);
        assert_eq!(layout.row_y(0), 50.0);
        assert_eq!(layout.row_y(2), 110.0);
    }

    #[test]
    fn test_narrow_field_keeps_one_column() {
        let layout = BrickLayout::for_field(50.0, &Tuning::default());
        assert_eq!(layout.columns, 1);
    }

    #[test]
    fn test_new_grid_is_intact_and_colored_by_row() {
        let g = grid(800.0);
        assert_eq!(g.intact_count(), 40);
        assert_eq!(g.scroll_offset(), 30.0);
        assert_eq!(g.cell(3, 1).unwrap().color, BRICK_PALETTE[1]);
        assert!(g.cell(8, 0).is_none());
    }

    #[test]
    fn test_break_cell_only_once() {
        let mut g = grid(800.0);
        assert!(g.break_cell(2, 3));
        assert!(!g.break_cell(2, 3));
        assert!(!g.cell(2, 3).unwrap().intact);
        assert_eq!(g.intact_count(), 39);
    }

    #[test]
    fn test_all_broken() {
        let mut g = grid(800.0);
        for c in 0..g.columns() {
            for r in 0..g.rows() {
                assert!(!g.all_broken());
                g.break_cell(c, r);
            }
        }
        assert!(g.all_broken());
        assert_eq!(g.intact().count(), 0);
    }

    #[test]
    fn test_hit_x_wraps_into_field() {
        let mut g = grid(800.0);
        g.shift(600.0); // offset 630
        // column 3 draws at 255 + 630 = 885, hit-tested at 85
        assert_eq!(g.draw_x(3), 885.0);
        assert_eq!(g.hit_x(3, 800.0), 85.0);
    }

    #[test]
    fn test_first_hit_scans_column_major() {
        let g = grid(800.0);
        // Tall box covering column 0 rows 0..=1 and column 1 row 0
        let bounds = Aabb::new(Vec2::new(100.0, 55.0), Vec2::new(120.0, 85.0));
        assert_eq!(g.first_hit(&bounds, 800.0), Some((0, 0)));

        let mut g = g;
        g.break_cell(0, 0);
        assert_eq!(g.first_hit(&bounds, 800.0), Some((0, 1)));
    }

    #[test]
    fn test_first_hit_skips_broken_and_misses() {
        let mut g = grid(800.0);
        let far_below = Aabb::around_circle(Vec2::new(400.0, 500.0), 10.0);
        assert_eq!(g.first_hit(&far_below, 800.0), None);

        let on_first = Aabb::around_circle(Vec2::new(60.0, 60.0), 10.0);
        g.break_cell(0, 0);
        assert_eq!(g.first_hit(&on_first, 800.0), None);
    }

    #[test]
    fn test_static_grid_does_not_scroll() {
        let mut g = BrickGrid::new(BrickLayout::for_field(800.0, &Tuning::classic()));
        g.scroll(3.0);
        assert_eq!(g.scroll_offset(), 30.0);
        assert_eq!(g.rows(), 3);
    }

    #[test]
    fn test_intact_iter_reports_coordinates() {
        let mut g = grid(800.0);
        g.break_cell(0, 0);
        let first = g.intact().next().map(|(c, r, _)| (c, r));
        assert_eq!(first, Some((0, 1)));
    }

    proptest! {
        #[test]
        fn prop_scroll_offset_stays_in_range(
            deltas in proptest::collection::vec(-5000.0f32..5000.0, 1..50)
        ) {
            let mut g = grid(1024.0);
            let width = g.layout().formation_width();
            for delta in deltas {
                g.shift(delta);
                prop_assert!(g.scroll_offset() >= 0.0);
                prop_assert!(g.scroll_offset() < width);
            }
        }

        #[test]
        fn prop_hit_x_stays_in_field(
            shift in -10000.0f32..10000.0,
            field_width in 200.0f32..2000.0,
        ) {
            let mut g = grid(field_width);
            g.shift(shift);
            for column in 0..g.columns() {
                let x = g.hit_x(column, field_width);
                prop_assert!(x >= 0.0 && x < field_width);
            }
        }
    }
}
