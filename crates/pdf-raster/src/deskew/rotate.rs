//! Page rotation for applying a skew correction
//!
//! Rotates about the page center and keeps the canvas size, so corrected
//! pages stay the same size as their neighbors. Areas uncovered by the
//! rotation are filled with the background color.

use crate::raster::RasterPage;

/// Rotate `page` by `angle_degrees`.
///
/// Positive angles turn the +x axis toward +y in raster coordinates, the
/// same convention `SkewEstimate::angle_degrees` uses.
pub fn rotate_page(page: &RasterPage, angle_degrees: f32, background: [u8; 4]) -> RasterPage {
    let (width, height) = (page.width(), page.height());
    if angle_degrees == 0.0 || width == 0 || height == 0 {
        return page.clone();
    }

    let (sin, cos) = (angle_degrees as f64).to_radians().sin_cos();
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;

    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            // Map back to the source position
            let sx = dx * cos + dy * sin + cx;
            let sy = -dx * sin + dy * cos + cy;
            pixels.extend_from_slice(&sample_bilinear(page, sx, sy).unwrap_or(background));
        }
    }

    RasterPage::from_raw_parts(width, height, pixels, page.source_index, page.scale)
}

/// Bilinear sample at a fractional position, None outside the page
fn sample_bilinear(page: &RasterPage, x: f64, y: f64) -> Option<[u8; 4]> {
    const EPS: f64 = 1e-6;
    let max_x = page.width() as f64 - 1.0;
    let max_y = page.height() as f64 - 1.0;
    if x < -EPS || y < -EPS || x > max_x + EPS || y > max_y + EPS {
        return None;
    }
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(page.width() - 1);
    let y1 = (y0 + 1).min(page.height() - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = page.pixel(x0, y0);
    let p10 = page.pixel(x1, y0);
    let p01 = page.pixel(x0, y1);
    let p11 = page.pixel(x1, y1);

    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let v = p00[i] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[i] as f64 * fx * (1.0 - fy)
            + p01[i] as f64 * (1.0 - fx) * fy
            + p11[i] as f64 * fx * fy;
        *channel = v.round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WHITE;

    #[test]
    fn test_zero_angle_is_identity() {
        let page = RasterPage::filled(8, 6, [10, 20, 30, 255], 3, 1.0);
        assert_eq!(rotate_page(&page, 0.0, WHITE), page);
    }

    #[test]
    fn test_keeps_canvas_and_metadata() {
        let page = RasterPage::filled(40, 30, [0, 0, 0, 255], 7, 2.0);
        let rotated = rotate_page(&page, 10.0, WHITE);

        assert_eq!(rotated.width(), 40);
        assert_eq!(rotated.height(), 30);
        assert_eq!(rotated.source_index, 7);
        assert_eq!(rotated.scale, 2.0);
        // Corners swing outside the source and get the background
        assert_eq!(rotated.pixel(0, 0), WHITE);
        // The center stays put
        assert_eq!(rotated.pixel(20, 15), [0, 0, 0, 255]);
    }

    #[test]
    fn test_quarter_turn_direction() {
        // Mark a pixel right of center; +90° turns +x toward +y, so it ends up below center
        let mut pixels = vec![255u8; 5 * 5 * 4];
        let i = (2 * 5 + 4) * 4;
        pixels[i..i + 4].copy_from_slice(&[0, 0, 0, 255]);
        let page = RasterPage::new(5, 5, pixels, 1, 1.0).unwrap();

        let rotated = rotate_page(&page, 90.0, WHITE);
        assert_eq!(rotated.pixel(2, 4), [0, 0, 0, 255]);
        assert_eq!(rotated.pixel(4, 2), WHITE);
    }
}
