//! Edge point extraction
//!
//! Scanned text and line art produce sharp horizontal luminance changes at
//! glyph and rule edges. An edge point is a dark interior pixel whose left
//! and right neighbors differ strongly in luminance.

use crate::raster::RasterPage;

/// A pixel coordinate that passed the edge test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgePoint {
    pub x: u32,
    pub y: u32,
}

/// Collect every dark edge pixel of `page`.
///
/// Border pixels are skipped since they lack a neighbor on one side.
pub fn extract_edge_points(
    page: &RasterPage,
    edge_threshold: f32,
    dark_threshold: f32,
) -> Vec<EdgePoint> {
    let (width, height) = (page.width(), page.height());
    if width < 3 || height < 3 {
        return Vec::new();
    }

    let mut points = Vec::new();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let left = page.luminance(x - 1, y);
            let right = page.luminance(x + 1, y);
            if (right - left).abs() > edge_threshold && page.luminance(x, y) < dark_threshold {
                points.push(EdgePoint { x, y });
            }
        }
    }
    points
}
