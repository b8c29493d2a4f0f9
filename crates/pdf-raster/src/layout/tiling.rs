//! Poster and tile partitioning
//!
//! Both schemes cut a source page into a grid of equal sub-rectangles
//! read in row-major order. A poster enlarges the pieces of one page onto
//! full sheets; tiling emits every piece of every page as its own page.

use crate::types::Size;

use super::{Placement, Rect, cells_row_major, create_grid_layout, fit_and_center};

/// Sub-rectangles of a `size` page cut into `cols` × `rows`, row-major
pub fn tile_rects(size: Size, cols: usize, rows: usize) -> Vec<Rect> {
    let grid = create_grid_layout(cols, rows, size);
    cells_row_major(&grid).collect()
}

/// Size of one tile when `size` is cut into `cols` × `rows`
pub fn tile_size(size: Size, cols: usize, rows: usize) -> Size {
    Size::new(size.width / cols as f32, size.height / rows as f32)
}

/// Enlarge source page 1 over `grid` × `grid` sheets of `sheet_size`.
///
/// Sheet `row * grid + col` shows tile `(row, col)`; keeping row-major order
/// lets the printed sheets be taped together left-to-right, top-to-bottom.
pub fn poster_placements(grid: usize, source_size: Size, sheet_size: Size) -> Vec<Placement> {
    let sheet = Rect::from_size(sheet_size);

    tile_rects(source_size, grid, grid)
        .into_iter()
        .enumerate()
        .map(|(sheet_index, tile)| {
            let (dest, scale) = fit_and_center(tile.size(), &sheet, 1.0);
            Placement {
                sheet_index,
                source_page: Some(1),
                source_rect: tile,
                dest,
                scale,
                cell: sheet,
                margin_factor: 1.0,
                rotation_degrees: 0.0,
            }
        })
        .collect()
}

/// Split each of `page_count` pages into `rows` × `cols` output pages.
///
/// Every output page is exactly one tile in size, so tiles are drawn 1:1.
pub fn tile_placements(
    page_count: usize,
    rows: usize,
    cols: usize,
    source_size: Size,
) -> Vec<Placement> {
    let tiles = tile_rects(source_size, cols, rows);
    let page_rect = Rect::from_size(tile_size(source_size, cols, rows));

    (1..=page_count)
        .flat_map(|page| tiles.iter().map(move |tile| (page, *tile)))
        .enumerate()
        .map(|(sheet_index, (page, tile))| Placement {
            sheet_index,
            source_page: Some(page),
            source_rect: tile,
            dest: page_rect,
            scale: 1.0,
            cell: page_rect,
            margin_factor: 1.0,
            rotation_degrees: 0.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_rects_cover_page() {
        let size = Size::new(600.0, 900.0);
        let rects = tile_rects(size, 2, 3);

        assert_eq!(rects.len(), 6);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 300.0, 300.0));
        assert_eq!(rects[1], Rect::new(300.0, 0.0, 300.0, 300.0));
        assert_eq!(rects[5], Rect::new(300.0, 600.0, 300.0, 300.0));
    }

    #[test]
    fn test_poster_uses_first_page_only() {
        let placements =
            poster_placements(3, Size::new(612.0, 792.0), Size::new(612.0, 792.0));

        assert_eq!(placements.len(), 9);
        assert!(placements.iter().all(|p| p.source_page == Some(1)));
        let sheets: Vec<usize> = placements.iter().map(|p| p.sheet_index).collect();
        assert_eq!(sheets, (0..9).collect::<Vec<_>>());
        // Same aspect as the sheet, so each tile fills it
        assert!((placements[4].scale - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_tile_pages_repeat_per_source() {
        let placements = tile_placements(2, 2, 2, Size::new(400.0, 400.0));

        assert_eq!(placements.len(), 8);
        assert_eq!(placements[3].source_page, Some(1));
        assert_eq!(placements[4].source_page, Some(2));
        assert_eq!(placements[4].source_rect, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(placements[7].sheet_index, 7);
    }
}
