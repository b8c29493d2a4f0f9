//! Raster imposition - re-paginating rendered pages onto output sheets
//!
//! This module orchestrates the imposition process:
//! 1. Validate options and compute the layout from the first page's size
//! 2. Composite each output sheet from its placements, refitting pages
//!    whose size differs from the first
//! 3. Assemble the sheets into an output PDF

mod io;
mod sheet;

#[cfg(feature = "pdfium")]
pub use io::rasterize_pdf;
pub use io::{is_pdf, load_inputs, load_page, load_pages, save_pdf, save_pngs};
pub use sheet::render_sheet;

use crate::constants::WHITE;
use crate::layout::{Layout, LayoutSpec, compute_layout};
use crate::options::ToolOptions;
use crate::raster::RasterPage;
use crate::render::build_pdf;
use crate::types::*;
use image::RgbaImage;
use lopdf::Document;

/// Composited output of one imposition run
#[derive(Debug, Clone)]
pub struct ImposedDocument {
    pub layout: Layout,
    /// Pixels per point the sheets were rendered at
    pub render_scale: f32,
    /// Rendered sheets in output order (may be fewer than the layout's for previews)
    pub sheets: Vec<RgbaImage>,
}

impl ImposedDocument {
    /// Encode the rendered sheets as a PDF
    pub fn to_pdf(&self, jpeg_quality: u8) -> Result<Document> {
        build_pdf(&self.sheets, self.layout.sheet_size, jpeg_quality)
    }
}

/// Loaded pages and the layout they are imposed with.
///
/// Sheets are composited one at a time with [`Imposition::render`], so a
/// caller can report progress or stop between sheets; [`impose`] and
/// [`generate_preview`](crate::generate_preview) render them in one go.
#[derive(Debug, Clone)]
pub struct Imposition {
    layout: Layout,
    pages: Vec<RasterPage>,
    render_scale: f32,
}

impl Imposition {
    /// Validate the settings and compute the layout for already-loaded pages.
    ///
    /// `pages` must be in source order, and should have been rasterized at
    /// `spec.raster_scale(options.raster_scale)`.
    pub fn new(pages: Vec<RasterPage>, spec: &LayoutSpec, options: &ToolOptions) -> Result<Self> {
        options.validate_settings()?;
        let first = pages.first().ok_or(RasterError::NoPages)?;
        let layout = compute_layout(pages.len(), spec, first.size_pt(), options)?;
        Ok(Self {
            layout,
            pages,
            render_scale: options.raster_scale,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn pages(&self) -> &[RasterPage] {
        &self.pages
    }

    pub fn sheet_count(&self) -> usize {
        self.layout.sheet_count
    }

    /// Composite one output sheet on a white background
    pub fn render(&self, sheet_index: usize) -> Result<RgbaImage> {
        render_sheet(&self.layout, sheet_index, &self.pages, self.render_scale, WHITE)
    }

    /// Render the first `max_sheets` sheets
    pub fn render_first(&self, max_sheets: usize) -> Result<ImposedDocument> {
        let sheets = (0..max_sheets.min(self.sheet_count()))
            .map(|i| self.render(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.finish(sheets))
    }

    /// Wrap sheets rendered by [`Imposition::render`], in output order
    pub fn finish(&self, sheets: Vec<RgbaImage>) -> ImposedDocument {
        log::info!(
            "Imposed {} pages as {}: {} of {} sheets rendered",
            self.pages.len(),
            self.layout.spec.name(),
            sheets.len(),
            self.layout.sheet_count
        );

        ImposedDocument {
            layout: self.layout.clone(),
            render_scale: self.render_scale,
            sheets,
        }
    }
}

/// Main imposition function
///
/// `pages` must be in source order; see [`Imposition::new`].
pub async fn impose(
    pages: Vec<RasterPage>,
    spec: &LayoutSpec,
    options: &ToolOptions,
) -> Result<ImposedDocument> {
    let imposition = Imposition::new(pages, spec, options)?;
    tokio::task::spawn_blocking(move || imposition.render_first(imposition.sheet_count())).await?
}
