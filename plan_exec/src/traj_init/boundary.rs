//! Boundary states of the trajectory

use nalgebra::{Matrix2x3, Vector2, Vector3};
use serde::Serialize;

use super::{HeadedPath, PathPose, TrajInitError};

/// Position boundary state at one end of the trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BoundaryXy {
    pub position_m: Vector2<f64>,
    pub velocity_ms: Vector2<f64>,
    pub acceleration_ms2: Vector2<f64>,
}

/// Heading boundary state at one end of the trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BoundaryYaw {
    pub heading_rad: f64,
    pub rate_rads: f64,
    pub accel_rads2: f64,
}

impl BoundaryXy {
    /// Start and end position states of the path.
    ///
    /// The vehicle moves along the path heading at `sig_vel_ms` with no acceleration at both
    /// ends. If `end_position_m` is given it replaces the position of the last path point.
    pub fn synthesise(
        path: &HeadedPath,
        sig_vel_ms: f64,
        end_position_m: Option<Vector2<f64>>,
    ) -> Result<(Self, Self), TrajInitError> {
        let (first, last) = ends(path)?;

        let mut end = Self::at(last, sig_vel_ms);
        if let Some(p) = end_position_m {
            end.position_m = p;
        }

        Ok((Self::at(first, sig_vel_ms), end))
    }

    fn at(pose: &PathPose, sig_vel_ms: f64) -> Self {
        Self {
            position_m: pose.position_m,
            velocity_ms: sig_vel_ms * Vector2::new(pose.heading_rad.cos(), pose.heading_rad.sin()),
            acceleration_ms2: Vector2::zeros(),
        }
    }

    /// Columns are position, velocity and acceleration.
    pub fn into_matrix(self) -> Matrix2x3<f64> {
        Matrix2x3::from_columns(&[self.position_m, self.velocity_ms, self.acceleration_ms2])
    }
}

impl BoundaryYaw {
    /// Start and end heading states of the path, stationary in rotation.
    pub fn synthesise(path: &HeadedPath) -> Result<(Self, Self), TrajInitError> {
        let (first, last) = ends(path)?;

        Ok((Self::at(first), Self::at(last)))
    }

    fn at(pose: &PathPose) -> Self {
        Self {
            heading_rad: pose.heading_rad,
            rate_rads: 0.0,
            accel_rads2: 0.0,
        }
    }

    pub fn into_vector(self) -> Vector3<f64> {
        Vector3::new(self.heading_rad, self.rate_rads, self.accel_rads2)
    }
}

fn ends(path: &HeadedPath) -> Result<(&PathPose, &PathPose), TrajInitError> {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(TrajInitError::InsufficientData(path.len())),
    }
}
