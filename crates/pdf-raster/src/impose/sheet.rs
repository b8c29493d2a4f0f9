//! Sheet compositing for imposition

use crate::layout::{Layout, Placement};
use crate::raster::RasterPage;
use crate::types::*;
use image::{Rgba, RgbaImage, imageops};

/// Pixel size of a sheet rendered at `render_scale`
pub(crate) fn sheet_pixels(size: Size, render_scale: f32) -> (u32, u32) {
    (
        ((size.width * render_scale).round() as u32).max(1),
        ((size.height * render_scale).round() as u32).max(1),
    )
}

/// Composite one output sheet.
///
/// `pages` are looked up by their 1-based `source_index` position, so
/// `pages[0]` must be source page 1. Blank placements, and placements whose
/// page is missing, leave the background showing.
pub fn render_sheet(
    layout: &Layout,
    sheet_index: usize,
    pages: &[RasterPage],
    render_scale: f32,
    background: [u8; 4],
) -> Result<RgbaImage> {
    if sheet_index >= layout.sheet_count {
        return Err(RasterError::Config(format!(
            "Sheet {} out of range, layout has {}",
            sheet_index, layout.sheet_count
        )));
    }

    let (width, height) = sheet_pixels(layout.sheet_size, render_scale);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(background));

    for placement in layout.placements_for_sheet(sheet_index) {
        let Some(page_number) = placement.source_page else {
            continue;
        };
        let Some(page) = page_number.checked_sub(1).and_then(|i| pages.get(i)) else {
            log::warn!(
                "Sheet {}: source page {} not supplied, leaving slot blank",
                sheet_index,
                page_number
            );
            continue;
        };
        draw_placement(&mut canvas, page, placement, layout.source_size, render_scale);
    }

    log::debug!(
        "Rendered sheet {} ({}x{}px)",
        sheet_index + 1,
        width,
        height
    );
    Ok(canvas)
}

/// Crop the placement's source region, scale it to the destination and draw it.
///
/// The region and destination are refitted to the page's own size, so pages
/// that differ from the layout's nominal size keep their aspect ratio.
fn draw_placement(
    canvas: &mut RgbaImage,
    page: &RasterPage,
    placement: &Placement,
    nominal: Size,
    render_scale: f32,
) {
    let (source_rect, dest) = placement.fit_page(nominal, page.size_pt());
    let region = page.crop_pt(&source_rect);

    let target_w = ((dest.width * render_scale).round() as u32).max(1);
    let target_h = ((dest.height * render_scale).round() as u32).max(1);

    let scaled = if region.dimensions() == (target_w, target_h) {
        region
    } else {
        imageops::resize(&region, target_w, target_h, imageops::FilterType::Triangle)
    };

    let x = (dest.x * render_scale).round() as i64;
    let y = (dest.y * render_scale).round() as i64;
    imageops::overlay(canvas, &scaled, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WHITE;
    use crate::layout::{LayoutSpec, compute_layout};
    use crate::options::ToolOptions;

    #[test]
    fn test_blank_slots_stay_background() {
        let options = ToolOptions::default();
        let page = RasterPage::filled(612, 792, [0, 0, 0, 255], 1, 1.0);
        let layout = compute_layout(
            1,
            &LayoutSpec::NUp { cols: 2, rows: 1 },
            page.size_pt(),
            &options,
        )
        .unwrap();

        let sheet = render_sheet(&layout, 0, &[page], 0.5, WHITE).unwrap();
        let (w, h) = sheet.dimensions();
        assert_eq!((w, h), (306, 396));

        // Left cell holds the black page, right cell is blank
        assert_eq!(sheet.get_pixel(w / 4, h / 2).0, [0, 0, 0, 255]);
        assert_eq!(sheet.get_pixel(3 * w / 4, h / 2).0, WHITE);
    }

    #[test]
    fn test_out_of_range_sheet() {
        let options = ToolOptions::default();
        let page = RasterPage::filled(10, 10, WHITE, 1, 1.0);
        let layout = compute_layout(1, &LayoutSpec::Booklet, page.size_pt(), &options).unwrap();
        assert!(render_sheet(&layout, 5, &[page], 1.0, WHITE).is_err());
    }
}
