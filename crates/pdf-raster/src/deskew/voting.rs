//! Discretized angle voting
//!
//! A Hough-style pass restricted to near-horizontal lines: for each
//! candidate angle the edge points are projected onto the rotated y axis
//! and binned by integer row. At the page's actual skew, points from the
//! same text line collapse into one bin.

use super::edges::EdgePoint;

/// Winning candidate of a voting pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vote {
    /// Detected skew angle in degrees
    pub angle_degrees: f32,
    /// Population of the fullest bin at that angle
    pub score: u32,
}

/// Candidate angles from `-max_degrees` to `+max_degrees` in `step_degrees` increments.
///
/// A non-positive or non-finite step, or a bad range, leaves only 0°.
pub fn candidate_angles(max_degrees: f32, step_degrees: f32) -> Vec<f32> {
    let usable = step_degrees.is_finite()
        && step_degrees > 0.0
        && max_degrees.is_finite()
        && max_degrees >= 0.0
        && max_degrees < 90.0;
    if !usable {
        return vec![0.0];
    }
    let steps = (2.0 * max_degrees / step_degrees).round() as i64;
    (0..=steps)
        .map(|i| -max_degrees + i as f32 * step_degrees)
        .collect()
}

/// Fullest bin when `points` are projected onto the y axis rotated by `angle_degrees`.
///
/// `width` and `height` bound the coordinates so the bins fit in a flat vector.
pub fn score_angle(points: &[EdgePoint], angle_degrees: f32, width: u32, height: u32) -> u32 {
    let theta = (angle_degrees as f64).to_radians();
    let (sin, cos) = theta.sin_cos();

    // |x * sin| never exceeds the width, so offsetting by it keeps every bin non-negative
    let offset = width as i64 + 1;
    let mut bins = vec![0u32; (height as i64 + 2 * offset + 1) as usize];

    let mut best = 0;
    for point in points {
        let projected = (point.y as f64 * cos - point.x as f64 * sin).round() as i64;
        let Some(bin) = usize::try_from(projected + offset)
            .ok()
            .and_then(|i| bins.get_mut(i))
        else {
            continue;
        };
        *bin += 1;
        best = best.max(*bin);
    }
    best
}

/// Score every candidate angle and keep the best.
///
/// Ties keep the earlier (more negative) candidate.
pub fn vote(points: &[EdgePoint], angles: &[f32], width: u32, height: u32) -> Vote {
    let mut best = Vote {
        angle_degrees: 0.0,
        score: 0,
    };

    for &angle in angles {
        let score = score_angle(points, angle, width, height);
        if score > best.score {
            best = Vote {
                angle_degrees: angle,
                score,
            };
        }
    }
    best
}
