//! Page I/O operations
//!
//! Source pages arrive as rasters: either page images decoded with the
//! `image` crate, or (with the `pdfium` feature) PDF pages rendered by
//! pdfium. Output documents are written with lopdf.

use crate::raster::RasterPage;
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load a single page image.
///
/// `scale` is the pixels-per-point the image was produced at; it fixes the
/// page's size in points.
pub async fn load_page(
    path: impl AsRef<Path>,
    source_index: usize,
    scale: f32,
) -> Result<RasterPage> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
    RasterPage::from_image(image.to_rgba8(), source_index, scale)
}

/// Load page images in order, numbering them from 1
pub async fn load_pages(paths: &[impl AsRef<Path>], scale: f32) -> Result<Vec<RasterPage>> {
    let mut pages = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        log::debug!("Loading page {} from {}", i + 1, path.as_ref().display());
        pages.push(load_page(path, i + 1, scale).await?);
    }
    Ok(pages)
}

/// Whether a path names a PDF rather than a page image
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Load every input in order: PDFs are rasterized at `scale`, images are
/// taken to have been scanned at `scale`. Pages are renumbered from 1
/// across all inputs.
pub async fn load_inputs(paths: &[impl AsRef<Path>], scale: f32) -> Result<Vec<RasterPage>> {
    let mut pages: Vec<RasterPage> = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if is_pdf(path) {
            let rendered = load_pdf_pages(path, scale).await?;
            log::info!("Rasterized {} pages from {}", rendered.len(), path.display());
            pages.extend(rendered);
        } else {
            pages.push(load_page(path, 0, scale).await?);
        }
    }

    for (i, page) in pages.iter_mut().enumerate() {
        page.source_index = i + 1;
    }
    Ok(pages)
}

#[cfg(feature = "pdfium")]
async fn load_pdf_pages(path: &Path, scale: f32) -> Result<Vec<RasterPage>> {
    rasterize_pdf(path, scale).await
}

#[cfg(not(feature = "pdfium"))]
async fn load_pdf_pages(path: &Path, _scale: f32) -> Result<Vec<RasterPage>> {
    Err(RasterError::Config(format!(
        "{}: PDF input requires the `pdfium` feature",
        path.display()
    )))
}

/// Save a finished document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, RasterError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Save sheets as numbered PNG files: `<stem>-001.png`, `<stem>-002.png`, ...
pub async fn save_pngs(
    sheets: Vec<image::RgbaImage>,
    dir: impl AsRef<Path>,
    stem: &str,
) -> Result<Vec<std::path::PathBuf>> {
    let dir = dir.as_ref().to_owned();
    let stem = stem.to_owned();
    tokio::fs::create_dir_all(&dir).await?;

    tokio::task::spawn_blocking(move || {
        sheets
            .iter()
            .enumerate()
            .map(|(i, sheet)| -> Result<std::path::PathBuf> {
                let path = dir.join(format!("{}-{:03}.png", stem, i + 1));
                sheet.save(&path)?;
                Ok(path)
            })
            .collect::<Result<Vec<_>>>()
    })
    .await?
}

/// Initialize Pdfium, trying the vendored library first, then falling back to system
#[cfg(feature = "pdfium")]
fn init_pdfium() -> std::result::Result<
    pdfium_render::prelude::Pdfium,
    pdfium_render::prelude::PdfiumError,
> {
    use pdfium_render::prelude::*;

    // When running from cargo, the working directory is the workspace root
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Render every page of a PDF at `scale` pixels per point.
///
/// Pages are rendered one after another on a blocking thread.
#[cfg(feature = "pdfium")]
pub async fn rasterize_pdf(path: impl AsRef<Path>, scale: f32) -> Result<Vec<RasterPage>> {
    use pdfium_render::prelude::*;

    let path = path.as_ref().to_owned();
    tokio::task::spawn_blocking(move || {
        let pdfium = init_pdfium()?;
        let document = pdfium.load_pdf_from_file(&path, None)?;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale);

        let mut pages = Vec::new();
        for (i, page) in document.pages().iter().enumerate() {
            let bitmap = page.render_with_config(&config)?;
            let width = bitmap.width() as u32;
            let height = bitmap.height() as u32;
            let rgba = bitmap.as_rgba_bytes().to_vec();
            log::debug!("Rasterized page {} at {}x{}px", i + 1, width, height);
            pages.push(RasterPage::new(width, height, rgba, i + 1, scale)?);
        }
        Ok(pages)
    })
    .await?
}
