//! Image XObject creation
//!
//! Each composited sheet is JPEG-encoded and embedded as an Image XObject,
//! which the page's content stream then draws across the full page.

use crate::types::{RasterError, Result};
use image::RgbImage;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

// =============================================================================
// XObject Creation
// =============================================================================

/// Encode a sheet as JPEG at `quality` (1-100).
///
/// JPEG has no alpha channel, so the sheet is flattened to RGB first.
pub fn encode_jpeg(sheet: &image::RgbaImage, quality: u8) -> Result<Vec<u8>> {
    if quality == 0 || quality > 100 {
        return Err(RasterError::Config(format!(
            "JPEG quality must be between 1 and 100, got {quality}"
        )));
    }

    let rgb: RgbImage = sheet.convert();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
    Ok(bytes)
}

/// Add a sheet image to `output` as a DCT-encoded Image XObject.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `sheet` - Composited sheet pixels
/// * `quality` - JPEG quality (1-100)
pub fn create_image_xobject(
    output: &mut Document,
    sheet: &image::RgbaImage,
    quality: u8,
) -> Result<ObjectId> {
    let jpeg = encode_jpeg(sheet, quality)?;
    let (width, height) = sheet.dimensions();

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    // Already compressed; keep lopdf from deflating it again
    let stream = Stream::new(dict, jpeg).with_compression(false);
    Ok(output.add_object(stream))
}
