//! Content placement within cells
//!
//! Every scheme ends up fitting a source region into some destination
//! rectangle: an N-Up cell, a booklet half-sheet, a poster sheet or a
//! resized page. This module holds that shared fit-and-center step.

use crate::types::Size;

use super::{Placement, Rect};

/// Uniform scale that fits `source` inside `target` without cropping.
pub fn fit_scale(source: Size, target: Size) -> f32 {
    let scale_w = target.width / source.width;
    let scale_h = target.height / source.height;
    scale_w.min(scale_h)
}

/// Fit `source` into `cell` and center it.
///
/// The fitted scale is multiplied by `margin_factor` (1.0 fills the
/// constraining dimension exactly, 0.95 leaves a visual gutter).
///
/// # Returns
/// The destination rectangle and the scale applied to the source.
pub fn fit_and_center(source: Size, cell: &Rect, margin_factor: f32) -> (Rect, f32) {
    let scale = fit_scale(source, cell.size()) * margin_factor;

    let scaled_width = source.width * scale;
    let scaled_height = source.height * scale;

    let x = cell.x + (cell.width - scaled_width) / 2.0;
    let y = cell.y + (cell.height - scaled_height) / 2.0;

    (Rect::new(x, y, scaled_width, scaled_height), scale)
}

impl Placement {
    /// Source region and destination for a page whose real size is `page_size`.
    ///
    /// Placements are computed for the layout's nominal source size. A page
    /// of another size keeps the same relative region and is refitted into
    /// the cell, so it is never cropped or stretched. For a page of the
    /// nominal size this reproduces `source_rect` and `dest`.
    pub fn fit_page(&self, nominal: Size, page_size: Size) -> (Rect, Rect) {
        let sx = page_size.width / nominal.width;
        let sy = page_size.height / nominal.height;
        let region = Rect::new(
            self.source_rect.x * sx,
            self.source_rect.y * sy,
            self.source_rect.width * sx,
            self.source_rect.height * sy,
        );
        let (dest, _) = fit_and_center(region.size(), &self.cell, self.margin_factor);
        (region, dest)
    }
}
