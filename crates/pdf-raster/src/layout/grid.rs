//! Grid layout calculation
//!
//! This module handles the geometric layout of a page grid on a sheet
//! (N-Up) and the partitioning of a page into equal sub-rectangles
//! (Poster and Tile).

use crate::types::Size;

use super::{GridPosition, Placement, Rect, fit_and_center};

// =============================================================================
// Grid Creation
// =============================================================================

/// Equal-cell grid over a rectangular area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Number of columns in the grid
    pub cols: usize,
    /// Number of rows in the grid
    pub rows: usize,
    /// Width of each cell in points
    pub cell_width: f32,
    /// Height of each cell in points
    pub cell_height: f32,
}

impl GridLayout {
    /// Total number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }
}

/// Divide an area of `size` into `cols` × `rows` equal cells.
pub fn create_grid_layout(cols: usize, rows: usize, size: Size) -> GridLayout {
    GridLayout {
        cols,
        rows,
        cell_width: size.width / cols as f32,
        cell_height: size.height / rows as f32,
    }
}

// =============================================================================
// Cell Calculations
// =============================================================================

/// Calculate the bounds of a cell at the given grid position.
///
/// Row 0 is the top row, so the cell origin is simply
/// `(col * cell_width, row * cell_height)`.
pub fn cell_bounds(grid: &GridLayout, pos: GridPosition) -> Rect {
    Rect::new(
        pos.col as f32 * grid.cell_width,
        pos.row as f32 * grid.cell_height,
        grid.cell_width,
        grid.cell_height,
    )
}

/// All cells of a grid in row-major order (top-left to bottom-right)
pub fn cells_row_major(grid: &GridLayout) -> impl Iterator<Item = Rect> + '_ {
    (0..grid.cell_count()).map(move |i| cell_bounds(grid, GridPosition::from_index(i, grid.cols)))
}

// =============================================================================
// N-Up
// =============================================================================

/// Place `page_count` pages on sheets of `sheet_size`, `cols` × `rows` per sheet.
///
/// Slot `i` of sheet `s` receives page `s * cols * rows + i + 1`; slots past
/// the last page are blank placements so the compositor can leave them empty.
pub fn nup_placements(
    page_count: usize,
    cols: usize,
    rows: usize,
    source_size: Size,
    sheet_size: Size,
    margin_factor: f32,
) -> Vec<Placement> {
    let grid = create_grid_layout(cols, rows, sheet_size);
    let pages_per_sheet = grid.cell_count();
    let sheet_count = page_count.div_ceil(pages_per_sheet);

    let mut placements = Vec::with_capacity(sheet_count * pages_per_sheet);
    for sheet in 0..sheet_count {
        for (slot, cell) in cells_row_major(&grid).enumerate() {
            let page = sheet * pages_per_sheet + slot + 1;
            let source_page = (page <= page_count).then_some(page);
            let (dest, scale) = fit_and_center(source_size, &cell, margin_factor);

            placements.push(Placement {
                sheet_index: sheet,
                source_page,
                source_rect: Rect::from_size(source_size),
                dest,
                scale,
                cell,
                margin_factor,
                rotation_degrees: 0.0,
            });
        }
    }
    placements
}

// =============================================================================
// Tests
// =============================================================================
