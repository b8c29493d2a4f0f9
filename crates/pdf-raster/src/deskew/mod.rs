//! Skew estimation and correction for scanned pages
//!
//! The estimator is a coarse heuristic:
//! 1. Collect dark pixels with a strong horizontal luminance gradient
//! 2. Give up (angle 0) when there are too few of them
//! 3. For each candidate angle in ±15° at 0.5° steps, bin the points by
//!    their rotated row and score the fullest bin
//! 4. The best-scoring angle is the skew; the correction is its negation
//!
//! Accuracy is limited to the step size. Estimation never fails: a weak
//! signal simply yields no correction.

mod edges;
mod rotate;
mod voting;

pub use edges::{EdgePoint, extract_edge_points};
pub use rotate::rotate_page;
pub use voting::{Vote, candidate_angles, score_angle, vote};

use crate::constants::*;
use crate::raster::RasterPage;
use crate::types::{DeskewSummary, RasterError, Result};

/// Tunables for the skew estimator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeskewOptions {
    /// Minimum |right - left| luminance difference for an edge pixel
    pub edge_threshold: f32,
    /// Edge pixels must be darker than this
    pub dark_threshold: f32,
    /// Fewer edge points than this means no correction
    pub min_edge_points: usize,
    /// Largest skew considered, degrees
    pub max_angle: f32,
    /// Candidate spacing, degrees
    pub angle_step: f32,
    /// Only rotate when the correction exceeds this, degrees
    pub apply_threshold: f32,
    /// Fill for areas uncovered by rotation
    pub background: [u8; 4],
}

impl Default for DeskewOptions {
    fn default() -> Self {
        Self {
            edge_threshold: EDGE_THRESHOLD,
            dark_threshold: DARK_THRESHOLD,
            min_edge_points: MIN_EDGE_POINTS,
            max_angle: MAX_SKEW_DEGREES,
            angle_step: SKEW_STEP_DEGREES,
            apply_threshold: APPLY_THRESHOLD_DEGREES,
            background: WHITE,
        }
    }
}

impl DeskewOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.angle_step.is_finite() && self.angle_step > 0.0) {
            return Err(RasterError::Config(format!(
                "Deskew angle step must be positive, got {}",
                self.angle_step
            )));
        }
        if !(self.max_angle.is_finite() && self.max_angle >= 0.0 && self.max_angle < 90.0) {
            return Err(RasterError::Config(format!(
                "Deskew max angle must be in [0, 90), got {}",
                self.max_angle
            )));
        }
        if !(self.apply_threshold.is_finite() && self.apply_threshold >= 0.0) {
            return Err(RasterError::Config(format!(
                "Deskew apply threshold must not be negative, got {}",
                self.apply_threshold
            )));
        }
        Ok(())
    }
}

/// Result of estimating one page's skew
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkewEstimate {
    /// Rotation to apply, degrees; positive turns +x toward +y in raster coordinates
    pub angle_degrees: f32,
    /// Population of the winning bin
    pub confidence: u32,
    /// Edge points found on the page
    pub edge_points: usize,
    /// Whether the correction was actually applied
    pub applied: bool,
}

impl SkewEstimate {
    /// Too few edge points were found to estimate anything
    pub fn is_insufficient_signal(&self, options: &DeskewOptions) -> bool {
        self.edge_points < options.min_edge_points
    }

    /// Whether the correction is large enough to be worth applying
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.angle_degrees.abs() > threshold
    }
}

/// Estimate the correction angle for one page.
///
/// Never fails: options that [`DeskewOptions::validate`] rejects yield a
/// zero estimate.
pub fn estimate_skew(page: &RasterPage, options: &DeskewOptions) -> SkewEstimate {
    if let Err(e) = options.validate() {
        log::warn!("Page {}: {}, skew not estimated", page.source_index, e);
        return SkewEstimate::default();
    }

    let points = extract_edge_points(page, options.edge_threshold, options.dark_threshold);

    if points.len() < options.min_edge_points {
        log::debug!(
            "Page {}: {} edge points, not enough to estimate skew",
            page.source_index,
            points.len()
        );
        return SkewEstimate {
            edge_points: points.len(),
            ..Default::default()
        };
    }

    let angles = candidate_angles(options.max_angle, options.angle_step);
    let best = vote(&points, &angles, page.width(), page.height());

    log::debug!(
        "Page {}: skew {:.1}° (score {}, {} edge points)",
        page.source_index,
        best.angle_degrees,
        best.score,
        points.len()
    );

    SkewEstimate {
        // Avoid reporting -0.0 for an upright page
        angle_degrees: if best.angle_degrees == 0.0 {
            0.0
        } else {
            -best.angle_degrees
        },
        confidence: best.score,
        edge_points: points.len(),
        applied: false,
    }
}

/// Estimate and, when the correction exceeds the threshold, rotate one page.
///
/// Pages below the threshold are returned unmodified.
pub fn deskew_page(page: RasterPage, options: &DeskewOptions) -> (RasterPage, SkewEstimate) {
    let mut estimate = estimate_skew(&page, options);
    if !estimate.exceeds(options.apply_threshold) {
        return (page, estimate);
    }

    let rotated = rotate_page(&page, estimate.angle_degrees, options.background);
    estimate.applied = true;
    (rotated, estimate)
}

/// Deskew every page in order, collecting a summary.
pub fn deskew_pages(
    pages: Vec<RasterPage>,
    options: &DeskewOptions,
) -> Result<(Vec<RasterPage>, DeskewSummary)> {
    options.validate()?;
    if pages.is_empty() {
        return Err(RasterError::NoPages);
    }

    let mut summary = DeskewSummary::for_pages(pages.len());

    let corrected = pages
        .into_iter()
        .map(|page| {
            let (page, estimate) = deskew_page(page, options);
            summary.record(estimate, options);
            page
        })
        .collect();

    log::info!(
        "Deskew: corrected {} of {} pages",
        summary.pages_corrected,
        summary.total_pages
    );
    Ok((corrected, summary))
}

impl DeskewSummary {
    /// Empty summary for a run over `total_pages` pages
    pub fn for_pages(total_pages: usize) -> Self {
        Self {
            total_pages,
            ..Default::default()
        }
    }

    /// Add one page's estimate to the summary
    pub fn record(&mut self, estimate: SkewEstimate, options: &DeskewOptions) {
        if estimate.applied {
            self.pages_corrected += 1;
        }
        if estimate.is_insufficient_signal(options) {
            log::warn!(
                "Page {}: too few edges to estimate skew, left as is",
                self.estimates.len() + 1
            );
            self.low_signal_pages += 1;
        }
        self.estimates.push(estimate);
    }
}
