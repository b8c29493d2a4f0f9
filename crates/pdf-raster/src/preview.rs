use crate::impose::{ImposedDocument, Imposition};
use crate::layout::LayoutSpec;
use crate::options::ToolOptions;
use crate::raster::RasterPage;
use crate::types::*;

/// Generate a preview of the imposition
///
/// The full layout is computed, but only the first `max_sheets` sheets
/// are composited.
pub async fn generate_preview(
    pages: Vec<RasterPage>,
    spec: &LayoutSpec,
    options: &ToolOptions,
    max_sheets: usize,
) -> Result<ImposedDocument> {
    if max_sheets == 0 {
        return Err(RasterError::Config(
            "Preview needs at least one sheet".to_string(),
        ));
    }

    let imposition = Imposition::new(pages, spec, options)?;
    tokio::task::spawn_blocking(move || imposition.render_first(max_sheets)).await?
}
