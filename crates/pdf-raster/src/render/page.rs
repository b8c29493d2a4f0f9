//! Output page assembly
//!
//! Builds the output PDF: one page per composited sheet, each page a
//! single full-bleed image sized to the sheet in points.

use crate::raster::RasterPage;
use crate::types::{RasterError, Result, Size};
use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::create_image_xobject;

// =============================================================================
// Public API
// =============================================================================

/// Build a document from composited sheets.
///
/// # Arguments
/// * `sheets` - Sheet images, in output order
/// * `sheet_size` - Page size in points, shared by every sheet
/// * `jpeg_quality` - JPEG quality for the embedded images (1-100)
pub fn build_pdf(sheets: &[RgbaImage], sheet_size: Size, jpeg_quality: u8) -> Result<Document> {
    assemble(sheets.iter().map(|s| (s, sheet_size)), jpeg_quality)
}

/// Build a document whose pages each have their own size.
///
/// Used where pages are corrected in place rather than imposed, so they
/// keep whatever size they came in with.
pub fn build_pdf_with_sizes(
    sheets: &[RgbaImage],
    sizes: &[Size],
    jpeg_quality: u8,
) -> Result<Document> {
    if sheets.len() != sizes.len() {
        return Err(RasterError::Config(format!(
            "{} sheets but {} page sizes",
            sheets.len(),
            sizes.len()
        )));
    }
    assemble(sheets.iter().zip(sizes.iter().copied()), jpeg_quality)
}

/// Build a document from pages that keep their own size in points.
pub fn build_pdf_from_pages(pages: &[RasterPage], jpeg_quality: u8) -> Result<Document> {
    let images: Vec<RgbaImage> = pages.iter().map(RasterPage::to_image).collect();
    let sizes: Vec<Size> = pages.iter().map(RasterPage::size_pt).collect();
    build_pdf_with_sizes(&images, &sizes, jpeg_quality)
}

/// Add one page showing `sheet` across its whole MediaBox.
pub fn render_image_page(
    output: &mut Document,
    sheet: &RgbaImage,
    sheet_size: Size,
    parent_pages_id: ObjectId,
    jpeg_quality: u8,
) -> Result<ObjectId> {
    let image_id = create_image_xobject(output, sheet, jpeg_quality)?;

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(sheet_size.width),
            Object::Real(sheet_size.height),
        ]),
    );

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = image_placement_command("Im0", sheet_size);
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

// =============================================================================
// Helper Functions
// =============================================================================

fn assemble<'a>(
    pages: impl ExactSizeIterator<Item = (&'a RgbaImage, Size)>,
    jpeg_quality: u8,
) -> Result<Document> {
    if pages.len() == 0 {
        return Err(RasterError::NoPages);
    }

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut page_refs = Vec::with_capacity(pages.len());

    for (sheet, size) in pages {
        let page_id = render_image_page(&mut output, sheet, size, pages_tree_id, jpeg_quality)?;
        page_refs.push(Object::Reference(page_id));
    }

    // Create pages tree
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);

    Ok(output)
}

/// Image XObjects occupy the unit square, so scale it up to the page.
fn image_placement_command(xobject_name: &str, size: Size) -> String {
    format!(
        "q {} 0 0 {} 0 0 cm /{} Do Q\n",
        size.width, size.height, xobject_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_command() {
        let cmd = image_placement_command("Im0", Size::new(612.0, 792.0));
        assert_eq!(cmd, "q 612 0 0 792 0 0 cm /Im0 Do Q\n");
    }

    #[test]
    fn test_empty_sheets_rejected() {
        let result = build_pdf(&[], Size::new(612.0, 792.0), 92);
        assert!(matches!(result, Err(RasterError::NoPages)));
    }

    #[test]
    fn test_pages_keep_their_own_size() {
        let sheets = vec![
            RgbaImage::from_pixel(20, 40, image::Rgba([255; 4])),
            RgbaImage::from_pixel(30, 30, image::Rgba([255; 4])),
        ];
        let sizes = [Size::new(10.0, 20.0), Size::new(30.0, 30.0)];
        let doc = build_pdf_with_sizes(&sheets, &sizes, 90).unwrap();
        let ids = doc.get_pages();

        let second = doc.get_dictionary(ids[&2]).unwrap();
        let media_box = second.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 30.0);
        assert_eq!(media_box[3].as_float().unwrap(), 30.0);
    }

    #[test]
    fn test_size_count_must_match() {
        let sheets = vec![RgbaImage::new(2, 2)];
        assert!(build_pdf_with_sizes(&sheets, &[], 90).is_err());
    }
}
