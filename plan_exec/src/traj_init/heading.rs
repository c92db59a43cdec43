//! Heading estimation from raw path positions

use crate::path::Path;

use super::{HeadedPath, PathPose, TrajInitError};

/// Estimate the heading of the path at each of its points using finite differences.
///
/// The first point uses the forward difference, the last the backward difference and all others
/// the central difference. Headings are in [-pi, pi].
///
/// Every coordinate of the path must be finite.
pub fn estimate_headings(path: &Path) -> Result<HeadedPath, TrajInitError> {
    let points = &path.points_m;
    let n = points.len();

    if n < 2 {
        return Err(TrajInitError::InsufficientData(n));
    }

    if let Some(i) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(TrajInitError::NonFinitePoint(i));
    }

    let poses = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let diff = match i {
                0 => points[1] - points[0],
                i if i == n - 1 => points[n - 1] - points[n - 2],
                i => points[i + 1] - points[i - 1],
            };

            PathPose {
                position_m: *p,
                heading_rad: diff.y.atan2(diff.x),
            }
        })
        .collect();

    Ok(HeadedPath { poses })
}
