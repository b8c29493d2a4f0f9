//! Layout data types for imposition
//!
//! These types represent the intermediate layout calculations between
//! the requested layout scheme and raster compositing. All coordinates are
//! in points with the origin at the top-left corner of the sheet, matching
//! the raster the sheet is eventually composited into.

use crate::types::{Orientation, Size};

/// Requested imposition scheme
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum LayoutSpec {
    /// Several source pages per sheet, laid out in a grid
    NUp { cols: usize, rows: usize },
    /// Saddle-stitch booklet: two pages per side, padded to a multiple of 4
    Booklet,
    /// Enlarge the first source page across grid × grid sheets
    Poster { grid: usize },
    /// Split every source page into rows × cols separate pages
    Tile { rows: usize, cols: usize },
    /// Fit every source page onto a page of the given size (points)
    Resize { target_width: f32, target_height: f32 },
}

impl LayoutSpec {
    /// Short name used in logs and statistics output
    pub fn name(&self) -> &'static str {
        match self {
            LayoutSpec::NUp { .. } => "n-up",
            LayoutSpec::Booklet => "booklet",
            LayoutSpec::Poster { .. } => "poster",
            LayoutSpec::Tile { .. } => "tile",
            LayoutSpec::Resize { .. } => "resize",
        }
    }

    /// Scale source pages should be rasterized at, given the base scale.
    ///
    /// Posters enlarge a single page, so it is rasterized `grid` times finer
    /// to keep the full poster at full resolution.
    pub fn raster_scale(&self, base_scale: f32) -> f32 {
        match *self {
            LayoutSpec::Poster { grid } => base_scale * grid as f32,
            _ => base_scale,
        }
    }

    /// Source page slots per output sheet, if the scheme has a fixed count
    pub fn pages_per_sheet(&self) -> Option<usize> {
        match *self {
            LayoutSpec::NUp { cols, rows } => Some(cols * rows),
            LayoutSpec::Booklet => Some(2),
            LayoutSpec::Resize { .. } => Some(1),
            LayoutSpec::Poster { .. } | LayoutSpec::Tile { .. } => None,
        }
    }
}

/// The N-Up choices offered by the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NUpPreset {
    Two,
    Four,
    Six,
    Nine,
}

impl NUpPreset {
    pub fn from_pages(pages: usize) -> Option<Self> {
        match pages {
            2 => Some(NUpPreset::Two),
            4 => Some(NUpPreset::Four),
            6 => Some(NUpPreset::Six),
            9 => Some(NUpPreset::Nine),
            _ => None,
        }
    }

    /// Grid as (cols, rows)
    pub fn grid(self) -> (usize, usize) {
        match self {
            NUpPreset::Two => (2, 1),
            NUpPreset::Four => (2, 2),
            NUpPreset::Six => (2, 3),
            NUpPreset::Nine => (3, 3),
        }
    }

    /// Sheet orientation that keeps portrait cells portrait
    pub fn orientation(self) -> Orientation {
        match self {
            NUpPreset::Two => Orientation::Landscape,
            _ => Orientation::Portrait,
        }
    }

    pub fn spec(self) -> LayoutSpec {
        let (cols, rows) = self.grid();
        LayoutSpec::NUp { cols, rows }
    }
}

/// The poster sizes offered by the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PosterPreset {
    TwoByTwo,
    ThreeByThree,
    FourByFour,
}

impl PosterPreset {
    pub fn from_grid(grid: usize) -> Option<Self> {
        match grid {
            2 => Some(PosterPreset::TwoByTwo),
            3 => Some(PosterPreset::ThreeByThree),
            4 => Some(PosterPreset::FourByFour),
            _ => None,
        }
    }

    pub fn grid(self) -> usize {
        match self {
            PosterPreset::TwoByTwo => 2,
            PosterPreset::ThreeByThree => 3,
            PosterPreset::FourByFour => 4,
        }
    }

    pub fn spec(self) -> LayoutSpec {
        LayoutSpec::Poster { grid: self.grid() }
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major position of slot `index` in a grid `cols` wide
    pub fn from_index(index: usize, cols: usize) -> Self {
        Self {
            row: index / cols,
            col: index % cols,
        }
    }
}

/// A rectangular area in points, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `size`
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `other` lies inside this rectangle, allowing for float error
    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// Final placement of a source page region on an output sheet
///
/// This is the result of all layout calculations and contains
/// everything the compositor needs to draw the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Output sheet this placement belongs to (0-based, output order)
    pub sheet_index: usize,
    /// Source page number, 1-based (None = blank slot)
    pub source_page: Option<usize>,
    /// Region of the source page to draw, in source points
    pub source_rect: Rect,
    /// Destination on the sheet, in sheet points
    pub dest: Rect,
    /// Sheet points per source point
    pub scale: f32,
    /// Area on the sheet the page is fitted into
    pub cell: Rect,
    /// Fraction of the cell the fitted page may fill
    pub margin_factor: f32,
    /// Always 0: imposition reorders and scales pages but never turns them
    pub rotation_degrees: f32,
}

impl Placement {
    pub fn is_blank(&self) -> bool {
        self.source_page.is_none()
    }
}

/// Complete layout for a document
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// The scheme this layout was computed for
    pub spec: LayoutSpec,
    /// Page size the placements were computed for
    pub source_size: Size,
    /// Size of every output sheet in points
    pub sheet_size: Size,
    /// Number of output sheets
    pub sheet_count: usize,
    /// All placements, ordered by sheet then slot
    pub placements: Vec<Placement>,
}

impl Layout {
    /// Placements belonging to one output sheet
    pub fn placements_for_sheet(&self, sheet_index: usize) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |p| p.sheet_index == sheet_index)
    }

    /// Scale the caller should rasterize source pages at, given its base scale
    pub fn raster_scale(&self, base_scale: f32) -> f32 {
        self.spec.raster_scale(base_scale)
    }

    /// Number of slots with no source page
    pub fn blank_count(&self) -> usize {
        self.placements.iter().filter(|p| p.is_blank()).count()
    }

    /// Distinct source pages that appear in the output, in first-use order
    pub fn pages_used(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for page in self.placements.iter().filter_map(|p| p.source_page) {
            if !seen.contains(&page) {
                seen.push(page);
            }
        }
        seen
    }
}
