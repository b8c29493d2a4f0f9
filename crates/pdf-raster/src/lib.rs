pub mod constants;
pub mod deskew;
pub mod impose;
pub mod layout;
mod options;
mod preview;
mod raster;
pub mod render;
mod stats;
mod types;

pub use deskew::{
    DeskewOptions, SkewEstimate, deskew_page, deskew_pages, estimate_skew, rotate_page,
};
#[cfg(feature = "pdfium")]
pub use impose::rasterize_pdf;
pub use impose::{ImposedDocument, Imposition, impose, load_inputs, load_pages, render_sheet, save_pdf};
pub use layout::{Layout, LayoutSpec, NUpPreset, Placement, PosterPreset, Rect, compute_layout};
pub use options::*;
pub use preview::generate_preview;
pub use raster::RasterPage;
pub use render::{build_pdf, build_pdf_from_pages, build_pdf_with_sizes};
pub use stats::calculate_statistics;
pub use types::*;
