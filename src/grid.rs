/// Cell edge length in tikz units. The grid lines are drawn with the same
/// step, so node centers land at cell_size/2 offsets.
pub const CELL_SIZE: usize = 4;

/// How the song list maps onto square card grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlan {
    /// Cards per row (and per column).
    pub size: usize,
    /// Cards per grid, size^2.
    pub cells: usize,
    /// Number of grids (each grid is one front page plus one back page).
    pub grids: usize,
}

impl GridPlan {
    /// Smallest square grid that fits `count` songs, capped at `max_grid`
    /// per side; overflow spills into additional grids.
    pub fn for_count(count: usize, max_grid: usize) -> GridPlan {
        let size = ceil_sqrt(count).clamp(1, max_grid.max(1));
        let cells = size * size;
        let grids = count.div_ceil(cells);
        GridPlan { size, cells, grids }
    }

    /// Total cells across all grids; the song list is padded to this length.
    pub fn total_cells(&self) -> usize {
        self.cells * self.grids
    }
}

fn ceil_sqrt(n: usize) -> usize {
    let s = n.isqrt();
    if s * s < n { s + 1 } else { s }
}

/// Center coordinates of the cell at `index` in a `size`-wide grid,
/// row-major from the tikz origin.
pub fn grid_pos(index: usize, size: usize) -> (usize, usize) {
    let x = (index % size) * CELL_SIZE + CELL_SIZE / 2;
    let y = (index / size) * CELL_SIZE + CELL_SIZE / 2;
    (x, y)
}

/// Reverse each row of a row-major grid. The QR back page uses this so that
/// cards line up with their fronts under long-side double-sided printing.
pub fn mirror_rows<T: Clone>(cells: &[T], size: usize) -> Vec<T> {
    let mut mirrored = Vec::with_capacity(cells.len());
    for row in cells.chunks(size) {
        mirrored.extend(row.iter().rev().cloned());
    }
    mirrored
}
