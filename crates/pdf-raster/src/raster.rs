//! Rasterized source pages
//!
//! A `RasterPage` is one source page rendered to RGBA pixels at a known
//! scale. Layout works in points; `scale` converts between the two.

use image::{ImageBuffer, Rgba, RgbaImage, imageops};

use crate::layout::Rect;
use crate::types::{RasterError, Result, Size};

/// One source page rendered to pixels
#[derive(Debug, Clone, PartialEq)]
pub struct RasterPage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    /// Page number in the source document, 1-based
    pub source_index: usize,
    /// Pixels per point the page was rendered at
    pub scale: f32,
}

impl RasterPage {
    /// Wrap an RGBA buffer.
    ///
    /// # Errors
    /// `InvalidRaster` when the buffer is not exactly `width * height * 4`
    /// bytes, or the scale is not positive.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        source_index: usize,
        scale: f32,
    ) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RasterError::InvalidRaster(format!(
                "page {source_index}: expected {expected} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RasterError::InvalidRaster(format!(
                "page {source_index}: scale must be positive, got {scale}"
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            source_index,
            scale,
        })
    }

    /// Wrap a buffer whose length the caller has already guaranteed
    pub(crate) fn from_raw_parts(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        source_index: usize,
        scale: f32,
    ) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            pixels,
            source_index,
            scale,
        }
    }

    /// Build from a decoded image
    pub fn from_image(image: RgbaImage, source_index: usize, scale: f32) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw(), source_index, scale)
    }

    /// A page filled with one color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4], source_index: usize, scale: f32) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::from_raw_parts(width, height, pixels, source_index, scale)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y)
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Unweighted mean of R, G and B at (x, y)
    #[inline]
    pub fn luminance(&self, x: u32, y: u32) -> f32 {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        (self.pixels[i] as f32 + self.pixels[i + 1] as f32 + self.pixels[i + 2] as f32) / 3.0
    }

    /// Native page size in points
    pub fn size_pt(&self) -> Size {
        Size::new(
            self.width as f32 / self.scale,
            self.height as f32 / self.scale,
        )
    }

    /// Copy into an `image` buffer
    pub fn to_image(&self) -> RgbaImage {
        // Length is checked on construction
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Cut out a region given in source points.
    ///
    /// The region is converted to pixels with this page's scale and clamped
    /// to the raster bounds.
    pub fn crop_pt(&self, region: &Rect) -> RgbaImage {
        let (x, y, w, h) = pixel_region(region, self.scale, self.width, self.height);
        match ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(self.width, self.height, self.pixels.clone()) {
            Some(view) => imageops::crop_imm(&view, x, y, w, h).to_image(),
            None => RgbaImage::new(w, h),
        }
    }
}

/// Convert a point rectangle to a clamped (x, y, w, h) pixel region, at least 1×1
pub(crate) fn pixel_region(region: &Rect, scale: f32, max_w: u32, max_h: u32) -> (u32, u32, u32, u32) {
    let x0 = (region.x * scale).round().clamp(0.0, max_w as f32) as u32;
    let y0 = (region.y * scale).round().clamp(0.0, max_h as f32) as u32;
    let x1 = (region.right() * scale).round().clamp(0.0, max_w as f32) as u32;
    let y1 = (region.bottom() * scale).round().clamp(0.0, max_h as f32) as u32;

    let x = x0.min(max_w.saturating_sub(1));
    let y = y0.min(max_h.saturating_sub(1));
    (x, y, x1.saturating_sub(x).max(1), y1.saturating_sub(y).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_buffer() {
        let result = RasterPage::new(10, 10, vec![0; 399], 1, 1.0);
        assert!(matches!(result, Err(RasterError::InvalidRaster(_))));
    }

    #[test]
    fn test_size_in_points() {
        let page = RasterPage::filled(1224, 1584, [255; 4], 1, 2.0);
        assert_eq!(page.size_pt(), Size::new(612.0, 792.0));
    }

    #[test]
    fn test_luminance_is_unweighted_mean() {
        let page = RasterPage::new(1, 1, vec![30, 60, 90, 255], 1, 1.0).unwrap();
        assert!((page.luminance(0, 0) - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_crop_uses_scale() {
        let page = RasterPage::filled(200, 100, [0, 0, 0, 255], 1, 2.0);
        let tile = page.crop_pt(&Rect::new(50.0, 0.0, 50.0, 25.0));
        assert_eq!(tile.dimensions(), (100, 50));
    }
}
