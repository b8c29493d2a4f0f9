use thiserror::Error;

use crate::constants::mm_to_pt;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[cfg(feature = "pdfium")]
    #[error("Pdfium error: {0}")]
    Pdfium(#[from] pdfium_render::prelude::PdfiumError),
    #[error("No pages to process")]
    NoPages,
}

impl RasterError {
    /// True for errors raised while validating a layout, before any page is touched
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RasterError::Config(_) | RasterError::NoPages)
    }
}

pub type Result<T> = std::result::Result<T, RasterError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    A4,
    A5,
    #[default]
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Sheet size in points with orientation applied
    pub fn size_pt(self, orientation: Orientation) -> Size {
        // Letter and friends are defined in inches, so use the exact point values
        // rather than round-tripping through millimeters.
        let (w, h) = match self {
            PaperSize::Letter => (612.0, 792.0),
            PaperSize::Legal => (612.0, 1008.0),
            PaperSize::Tabloid => (792.0, 1224.0),
            other => {
                let (w, h) = other.dimensions_mm();
                (mm_to_pt(w), mm_to_pt(h))
            }
        };
        match orientation {
            Orientation::Portrait => Size::new(w, h),
            Orientation::Landscape => Size::new(h, w),
        }
    }
}

/// Width and height in points (or pixels, where noted)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Summary of one deskew pass over a document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeskewSummary {
    /// Pages examined
    pub total_pages: usize,
    /// Pages that were actually rotated
    pub pages_corrected: usize,
    /// Pages skipped because too few edge points were found
    pub low_signal_pages: usize,
    /// Per-page estimates in source order
    pub estimates: Vec<crate::deskew::SkewEstimate>,
}

/// Statistics about a layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Source pages that actually appear in the output
    pub pages_used: usize,
    /// Number of output sheets (output pages)
    pub output_sheets: usize,
    /// Source page slots per output sheet (None when a page spans several sheets)
    pub pages_per_sheet: Option<usize>,
    /// Total number of placements
    pub placements: usize,
    /// Number of blank slots added for padding
    pub blank_slots: usize,
}
