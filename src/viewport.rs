//! Mapping between world pixels and terminal cells.

use crate::entities::Rect;

/// A rectangle in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

/// Scales a `world_width` x `world_height` pixel screen onto `cols` x `rows`
/// terminal cells.  Each axis is scaled independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub world_width: i32,
    pub world_height: i32,
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(world_width: i32, world_height: i32, cols: u16, rows: u16) -> Self {
        Self {
            world_width: world_width.max(1),
            world_height: world_height.max(1),
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Cells covered by a world rectangle, clipped to the terminal.
    /// Anything visible covers at least one cell; `None` when fully off-screen.
    pub fn rect_to_cells(&self, rect: &Rect) -> Option<CellRect> {
        let (col0, col1) = span(rect.left(), rect.right(), self.world_width, self.cols)?;
        let (row0, row1) = span(rect.top(), rect.bottom(), self.world_height, self.rows)?;
        Some(CellRect {
            col: col0,
            row: row0,
            width: col1 - col0,
            height: row1 - row0,
        })
    }

    /// Cell containing a world point, clamped to the terminal.
    pub fn point_to_cell(&self, x: i32, y: i32) -> (u16, u16) {
        (
            scale_down(x, self.world_width, self.cols).clamp(0, self.cols as i64 - 1) as u16,
            scale_down(y, self.world_height, self.rows).clamp(0, self.rows as i64 - 1) as u16,
        )
    }

    /// World point at the centre of a terminal cell.  Used to hit-test mouse clicks.
    pub fn cell_to_world(&self, col: u16, row: u16) -> (i32, i32) {
        let x = (2 * col as i64 + 1) * self.world_width as i64 / (2 * self.cols as i64);
        let y = (2 * row as i64 + 1) * self.world_height as i64 / (2 * self.rows as i64);
        (x as i32, y as i32)
    }
}

fn scale_down(v: i32, world: i32, cells: u16) -> i64 {
    (v as i64 * cells as i64).div_euclid(world as i64)
}

/// Half-open cell span `[start, end)` of the cells whose centres fall inside
/// the world span `[lo, hi)`.  A visible span always gets at least one cell.
fn span(lo: i32, hi: i32, world: i32, cells: u16) -> Option<(u16, u16)> {
    if hi <= 0 || lo >= world || hi <= lo {
        return None;
    }
    let cells_i = cells as i64;
    let first_centre_at_or_after = |v: i32| {
        let num = 2 * v as i64 * cells_i - world as i64;
        let den = 2 * world as i64;
        -(-num).div_euclid(den)
    };
    let start = first_centre_at_or_after(lo).clamp(0, cells_i - 1);
    let end = first_centre_at_or_after(hi).clamp(start + 1, cells_i);
    Some((start as u16, end as u16))
}
