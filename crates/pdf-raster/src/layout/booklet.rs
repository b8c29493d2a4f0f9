//! Booklet page ordering
//!
//! A booklet is a single saddle-stitched signature: every physical sheet
//! holds four pages, two on each side, and the stack is folded once at the
//! spine. For an 8-page booklet:
//!
//! ```text
//! Sheet 0  front: [8 | 1]   back: [2 | 7]
//! Sheet 1  front: [6 | 3]   back: [4 | 5]
//! ```
//!
//! Printing double-sided, nesting sheet 1 inside sheet 0 and folding
//! yields pages 1..8 in reading order.

use crate::types::Size;

use super::{Placement, Rect, fit_and_center};

/// Which physical side of the printed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSide {
    /// Front of the sheet (printed first in duplex)
    Front,
    /// Back of the sheet (printed second in duplex)
    Back,
}

/// The four page numbers printed on one physical sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookletSheet {
    pub front_right: usize,
    pub front_left: usize,
    pub back_left: usize,
    pub back_right: usize,
}

impl BookletSheet {
    /// Page numbers in output order: `[front_right, front_left, back_left, back_right]`
    pub fn order(&self) -> [usize; 4] {
        [
            self.front_right,
            self.front_left,
            self.back_left,
            self.back_right,
        ]
    }

    /// (left, right) page numbers as they appear on one side, left to right
    pub fn side(&self, side: SheetSide) -> (usize, usize) {
        match side {
            SheetSide::Front => (self.front_right, self.front_left),
            SheetSide::Back => (self.back_left, self.back_right),
        }
    }
}

/// Page count rounded up to the next multiple of four
pub fn padded_page_count(page_count: usize) -> usize {
    page_count.div_ceil(4) * 4
}

/// Calculate the page numbers printed on each physical sheet.
///
/// Numbers greater than `page_count` are padding and render blank.
pub fn booklet_sheets(page_count: usize) -> Vec<BookletSheet> {
    let padded = padded_page_count(page_count);

    (0..padded / 4)
        .map(|sheet| BookletSheet {
            front_right: padded - sheet * 2,
            front_left: sheet * 2 + 1,
            back_left: sheet * 2 + 2,
            back_right: padded - sheet * 2 - 1,
        })
        .collect()
}

/// Flattened output order across all sheets, blanks as `None`
pub fn booklet_page_order(page_count: usize) -> Vec<Option<usize>> {
    booklet_sheets(page_count)
        .iter()
        .flat_map(|sheet| sheet.order())
        .map(|page| (page <= page_count).then_some(page))
        .collect()
}

/// Spread size for one side of a booklet sheet: two source pages side by side
pub fn booklet_sheet_size(source_size: Size) -> Size {
    Size::new(source_size.width * 2.0, source_size.height)
}

/// Calculate all placements for a booklet.
///
/// Each physical sheet produces two output pages (front side, then back side),
/// each holding a left and a right half the size of a source page.
pub fn booklet_placements(page_count: usize, source_size: Size) -> Vec<Placement> {
    let left_half = Rect::new(0.0, 0.0, source_size.width, source_size.height);
    let right_half = Rect::new(source_size.width, 0.0, source_size.width, source_size.height);

    let mut placements = Vec::new();
    for (sheet_no, sheet) in booklet_sheets(page_count).iter().enumerate() {
        for (side_no, side) in [SheetSide::Front, SheetSide::Back].into_iter().enumerate() {
            let sheet_index = sheet_no * 2 + side_no;
            let (left, right) = sheet.side(side);

            for (page, half) in [(left, &left_half), (right, &right_half)] {
                let (dest, scale) = fit_and_center(source_size, half, 1.0);
                placements.push(Placement {
                    sheet_index,
                    source_page: (page <= page_count).then_some(page),
                    source_rect: Rect::from_size(source_size),
                    dest,
                    scale,
                    cell: *half,
                    margin_factor: 1.0,
                    rotation_degrees: 0.0,
                });
            }
        }
    }
    placements
}

// =============================================================================
// Tests
// =============================================================================
