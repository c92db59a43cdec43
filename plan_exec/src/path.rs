//! # Path
//!
//! This module defines the reference path handed to the planner by a path source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An ordered sequence of 2D positions describing the reference path of the vehicle.
///
/// The order of the points is the order in which the path is traversed.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Path {
    pub points_m: Vec<Vector2<f64>>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("The point separation must be strictly positive, got {0}")]
    InvalidSeparation(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new empty path
    pub fn new_empty() -> Self {
        Path {
            points_m: Vec::new(),
        }
    }

    /// Create a path from the given points.
    pub fn from_points(points_m: Vec<Vector2<f64>>) -> Self {
        Path { points_m }
    }

    /// Produces a direct path between the two position vectors, with each point in the path having
    /// at most the given separation.
    ///
    /// Both `from` and `to` are included in the path.
    pub fn direct(
        from: Vector2<f64>,
        to: Vector2<f64>,
        point_sep_m: f64,
    ) -> Result<Self, PathError> {
        if !(point_sep_m > 0.0) {
            return Err(PathError::InvalidSeparation(point_sep_m));
        }

        let diff_vec = to - from;
        let dist = diff_vec.norm();

        // If the points are closer than the separation just produce a new path with the from and
        // to being the only points.
        if dist <= point_sep_m {
            return Ok(Path {
                points_m: vec![from, to],
            });
        }

        // Number of full separations that fit between the points, the final step to `to` may be
        // shorter than the separation.
        let num_steps = (dist / point_sep_m).floor() as usize;

        // The difference vector but of length point_sep_m.
        let delta = point_sep_m / dist * diff_vec;

        let mut points_m: Vec<Vector2<f64>> =
            (0..=num_steps).map(|i| from + delta * i as f64).collect();

        // Add the target if it isn't already the last point
        if (points_m[num_steps] - to).norm() > std::f64::EPSILON * dist.max(1.0) {
            points_m.push(to);
        } else {
            points_m[num_steps] = to;
        }

        Ok(Path { points_m })
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_direct() {
        let path = Path::direct(Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), 0.3).unwrap();

        assert_eq!(path.get_num_points(), 5);
        assert_relative_eq!(path.points_m[1], Vector2::new(0.3, 0.0));
        assert_eq!(path.points_m[4], Vector2::new(1.0, 0.0));

        // Exact multiple of the separation doesn't duplicate the end point
        let path = Path::direct(Vector2::new(0.0, 0.0), Vector2::new(0.0, 2.0), 0.5).unwrap();
        assert_eq!(path.get_num_points(), 5);
        assert_eq!(path.points_m[4], Vector2::new(0.0, 2.0));

        // Closer than the separation
        let path = Path::direct(Vector2::new(0.0, 0.0), Vector2::new(0.1, 0.1), 0.5).unwrap();
        assert_eq!(path.get_num_points(), 2);

        assert!(Path::direct(Vector2::zeros(), Vector2::new(1.0, 0.0), 0.0).is_err());
    }
}
