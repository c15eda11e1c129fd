//! Uniform spatial grid for broad-phase collision queries
//!
//! Rebuilt from scratch every tick. Cells are sized to twice the largest
//! collision radius, so any overlapping pair sits in the same or an adjacent
//! cell and a query only needs the surrounding 3x3 block.

use glam::Vec2;

use super::state::WorldBounds;

/// Which collection a grid entry points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Asteroid,
    Bullet,
    Powerup,
}

/// One occupant of a cell: kind tag plus index into that collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEntry {
    pub kind: EntityKind,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<GridEntry>>,
}

impl SpatialGrid {
    /// Upper bound on cells per axis so a tiny radius cannot explode memory
    pub const MAX_CELLS_PER_AXIS: usize = 256;

    /// Build an empty grid covering `bounds` for radii up to `max_radius`
    pub fn new(bounds: &WorldBounds, max_radius: f32) -> Self {
        let wanted = if max_radius.is_finite() && max_radius > 0.0 {
            max_radius * 2.0
        } else {
            bounds.width.max(bounds.height)
        };
        let min_cell = bounds.width.max(bounds.height) / Self::MAX_CELLS_PER_AXIS as f32;
        let cell_size = wanted.max(min_cell).max(f32::EPSILON);

        let cols = ((bounds.width / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Cell coordinates for a position, clamped onto the grid
    pub fn cell_of(&self, pos: Vec2) -> (usize, usize) {
        let to_cell = |v: f32, count: usize| -> usize {
            if !v.is_finite() || v <= 0.0 {
                return 0;
            }
            ((v / self.cell_size) as usize).min(count - 1)
        };
        (to_cell(pos.x, self.cols), to_cell(pos.y, self.rows))
    }

    pub fn insert(&mut self, kind: EntityKind, index: usize, pos: Vec2) {
        let (cx, cy) = self.cell_of(pos);
        self.cells[cy * self.cols + cx].push(GridEntry { kind, index });
    }

    /// Entries of `kind` in the 3x3 neighbourhood around `pos`
    ///
    /// Each cell is visited once even on grids narrower than three cells.
    pub fn query(&self, pos: Vec2, kind: EntityKind) -> Vec<usize> {
        let (cx, cy) = self.cell_of(pos);
        let x_range = cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1);
        let y_range = cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1);

        let mut found = Vec::new();
        for y in y_range {
            for x in x_range.clone() {
                found.extend(
                    self.cells[y * self.cols + x]
                        .iter()
                        .filter(|entry| entry.kind == kind)
                        .map(|entry| entry.index),
                );
            }
        }
        found
    }

    /// Total number of entries (all kinds)
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
