//! Shared constants for imposition and deskew
//!
//! This module centralizes magic numbers and constants used throughout
//! the layout, compositing and skew-estimation code.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert a rendering resolution to a raster scale (pixels per point)
#[inline]
pub fn dpi_to_scale(dpi: f32) -> f32 {
    dpi / POINTS_PER_INCH
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

// =============================================================================
// Compositing
// =============================================================================

/// Fraction of an N-Up cell the fitted page may occupy, leaving a visual gutter
pub const DEFAULT_MARGIN_FACTOR: f32 = 0.95;

/// Default rasterization scale (pixels per point, 144 dpi)
pub const DEFAULT_RASTER_SCALE: f32 = 2.0;

/// Default JPEG quality when re-encoding sheets (0-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Background used for blank slots and uncovered areas
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

// =============================================================================
// Skew Estimation
// =============================================================================

/// Minimum horizontal luminance difference for an edge pixel (0-255 scale)
pub const EDGE_THRESHOLD: f32 = 50.0;

/// Edge pixels must be darker than this luminance
pub const DARK_THRESHOLD: f32 = 200.0;

/// Below this many edge points the page is left alone
pub const MIN_EDGE_POINTS: usize = 100;

/// Largest skew angle considered, in degrees (both directions)
pub const MAX_SKEW_DEGREES: f32 = 15.0;

/// Angular resolution of the voting pass, in degrees
pub const SKEW_STEP_DEGREES: f32 = 0.5;

/// Corrections at or below this magnitude are not applied
pub const APPLY_THRESHOLD_DEGREES: f32 = 0.5;
