//! Layout calculation modules for imposition
//!
//! This module handles all the geometric calculations for page imposition:
//! - Grid layout (N-Up cells, poster and tile partitioning)
//! - Booklet page ordering
//! - Content placement (fit-and-center scaling)
//!
//! Everything here is pure geometry: no rasters are touched.

mod booklet;
mod grid;
mod placement;
mod tiling;
mod types;

pub use booklet::*;
pub use grid::*;
pub use placement::*;
pub use tiling::*;
pub use types::*;

use crate::options::ToolOptions;
use crate::types::{RasterError, Result, Size};

/// Compute the complete layout for `page_count` source pages.
///
/// Placements are computed for `source_size` (points); pages of another
/// size are refitted into their cell by [`Placement::fit_page`]. N-Up and
/// Poster sheets take their size from `options.paper_size` and
/// `options.orientation`; the other schemes derive it from the source.
///
/// # Errors
/// Returns a configuration error, before anything is computed, when the
/// spec has a non-positive dimension, there are no pages, or the source
/// size is degenerate.
pub fn compute_layout(
    page_count: usize,
    spec: &LayoutSpec,
    source_size: Size,
    options: &ToolOptions,
) -> Result<Layout> {
    validate_spec(spec)?;
    if page_count == 0 {
        return Err(RasterError::NoPages);
    }
    if !source_size.is_valid() {
        return Err(RasterError::Config(format!(
            "Source page size must be positive, got {}x{}",
            source_size.width, source_size.height
        )));
    }
    if !(options.margin_factor > 0.0 && options.margin_factor <= 1.0) {
        return Err(RasterError::Config(format!(
            "Margin factor must be in (0, 1], got {}",
            options.margin_factor
        )));
    }

    let paper = options.paper_size.size_pt(options.orientation);

    let (sheet_size, placements) = match *spec {
        LayoutSpec::NUp { cols, rows } => (
            paper,
            nup_placements(
                page_count,
                cols,
                rows,
                source_size,
                paper,
                options.margin_factor,
            ),
        ),
        LayoutSpec::Booklet => (
            booklet_sheet_size(source_size),
            booklet_placements(page_count, source_size),
        ),
        LayoutSpec::Poster { grid } => (paper, poster_placements(grid, source_size, paper)),
        LayoutSpec::Tile { rows, cols } => (
            tile_size(source_size, cols, rows),
            tile_placements(page_count, rows, cols, source_size),
        ),
        LayoutSpec::Resize {
            target_width,
            target_height,
        } => {
            let target = Size::new(target_width, target_height);
            (target, resize_placements(page_count, source_size, target))
        }
    };

    let sheet_count = placements
        .last()
        .map(|p| p.sheet_index + 1)
        .unwrap_or_default();

    log::debug!(
        "{} layout: {} pages -> {} sheets of {:.1}x{:.1}pt",
        spec.name(),
        page_count,
        sheet_count,
        sheet_size.width,
        sheet_size.height
    );

    Ok(Layout {
        spec: *spec,
        source_size,
        sheet_size,
        sheet_count,
        placements,
    })
}

/// Check that every dimension of a layout spec is usable.
pub fn validate_spec(spec: &LayoutSpec) -> Result<()> {
    match *spec {
        LayoutSpec::NUp { cols, rows } => {
            if cols == 0 || rows == 0 {
                return Err(RasterError::Config(format!(
                    "N-Up grid must have at least one cell, got {cols}x{rows}"
                )));
            }
        }
        LayoutSpec::Booklet => {}
        LayoutSpec::Poster { grid } => {
            if grid == 0 {
                return Err(RasterError::Config(
                    "Poster grid must be at least 1".to_string(),
                ));
            }
        }
        LayoutSpec::Tile { rows, cols } => {
            if cols == 0 || rows == 0 {
                return Err(RasterError::Config(format!(
                    "Tile grid must have at least one cell, got {rows} rows x {cols} cols"
                )));
            }
        }
        LayoutSpec::Resize {
            target_width,
            target_height,
        } => {
            if !Size::new(target_width, target_height).is_valid() {
                return Err(RasterError::Config(format!(
                    "Resize target must be positive, got {target_width}x{target_height}"
                )));
            }
        }
    }
    Ok(())
}

/// One page per source page, fitted uniformly and centered on `target`.
pub fn resize_placements(page_count: usize, source_size: Size, target: Size) -> Vec<Placement> {
    let page = Rect::from_size(target);
    (0..page_count)
        .map(|i| {
            let (dest, scale) = fit_and_center(source_size, &page, 1.0);
            Placement {
                sheet_index: i,
                source_page: Some(i + 1),
                source_rect: Rect::from_size(source_size),
                dest,
                scale,
                cell: page,
                margin_factor: 1.0,
                rotation_degrees: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> Size {
        Size::new(612.0, 792.0)
    }

    #[test]
    fn test_rejects_empty_grid() {
        let options = ToolOptions::default();
        let err = compute_layout(4, &LayoutSpec::NUp { cols: 0, rows: 2 }, letter(), &options)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_rejects_zero_pages() {
        let options = ToolOptions::default();
        let err = compute_layout(0, &LayoutSpec::Booklet, letter(), &options).unwrap_err();
        assert!(matches!(err, RasterError::NoPages));
    }

    #[test]
    fn test_rejects_negative_resize() {
        let spec = LayoutSpec::Resize {
            target_width: -10.0,
            target_height: 100.0,
        };
        assert!(validate_spec(&spec).is_err());

        let spec = LayoutSpec::Resize {
            target_width: f32::NAN,
            target_height: 100.0,
        };
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn test_resize_centers_landscape_on_portrait() {
        let placements = resize_placements(1, Size::new(800.0, 400.0), Size::new(400.0, 400.0));
        let p = &placements[0];

        assert!((p.scale - 0.5).abs() < 1e-6);
        assert!((p.dest.width - 400.0).abs() < 1e-4);
        assert!((p.dest.height - 200.0).abs() < 1e-4);
        assert!((p.dest.y - 100.0).abs() < 1e-4);
        assert_eq!(p.dest.x, 0.0);
    }

    #[test]
    fn test_sheet_count_from_placements() {
        let options = ToolOptions::default();
        let layout = compute_layout(3, &LayoutSpec::Booklet, letter(), &options).unwrap();
        // 3 pages pad to 4: one physical sheet, two sides
        assert_eq!(layout.sheet_count, 2);
        assert_eq!(layout.sheet_size, Size::new(1224.0, 792.0));
    }
}
