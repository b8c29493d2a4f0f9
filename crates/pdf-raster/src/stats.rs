use crate::constants::*;
use crate::layout::{LayoutSpec, compute_layout};
use crate::options::ToolOptions;
use crate::types::*;

/// Calculate statistics for a layout without touching any pixels.
///
/// Sheet and slot counts do not depend on page geometry, so a Letter-sized
/// source and default options stand in for the real ones.
pub fn calculate_statistics(page_count: usize, spec: &LayoutSpec) -> Result<LayoutStatistics> {
    let source_size = Size::new(DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);
    let layout = compute_layout(page_count, spec, source_size, &ToolOptions::default())?;

    Ok(LayoutStatistics {
        source_pages: page_count,
        pages_used: layout.pages_used().len(),
        output_sheets: layout.sheet_count,
        pages_per_sheet: spec.pages_per_sheet(),
        placements: layout.placements.len(),
        blank_slots: layout.blank_count(),
    })
}
