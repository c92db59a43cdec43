//! # Trajectory initialisation
//!
//! Converts a reference path into the initial guess of the SE2 trajectory optimiser. The
//! optimiser works on two channels, position and heading, each of which needs:
//!
//! - A start and end boundary state (value plus first and second derivatives)
//! - A set of inner nodes the trajectory should initially pass through
//!
//! plus a total duration for the whole trajectory.
//!
//! Building the guess goes through the following stages:
//!
//! 1. [`estimate_headings`] - finite difference headings for every path point
//! 2. [`HeadedPath::unwrap_headings`] - remove artificial 2pi jumps between headings
//! 3. [`resample_positions`] and [`resample_headings`] - walk the path by arc length, emitting
//!    inner nodes at the position and the (finer) yaw resolution
//! 4. [`BoundaryXy`] and [`BoundaryYaw`] - boundary states from the path ends
//! 5. [`estimate_total_time`] - nominal duration from the path length

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod boundary;
mod duration;
mod heading;
mod params;
mod resample;
mod unwrap;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use nalgebra::{DVector, Matrix2x3, Matrix2xX, Vector2, Vector3};
use serde::Serialize;

use crate::path::Path;

pub use boundary::{BoundaryXy, BoundaryYaw};
pub use duration::estimate_total_time;
pub use heading::estimate_headings;
pub use params::TrajInitParams;
pub use resample::{resample_headings, resample_positions};

#[cfg(test)]
pub(crate) use params::test_params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point of the reference path together with the heading of the path at that point.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PathPose {
    pub position_m: Vector2<f64>,

    /// Heading of the path in radians. Before unwrapping this is in [-pi, pi], after unwrapping
    /// it may take any value.
    pub heading_rad: f64,
}

/// A reference path where each point has an associated heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadedPath {
    pub poses: Vec<PathPose>,
}

/// Initial guess and boundary conditions for the SE2 trajectory optimiser.
///
/// The guess is moved into the optimiser, one guess is built per planning cycle.
#[derive(Debug, Clone, Serialize)]
pub struct InitialGuess {
    /// Start position boundary, columns are position, velocity and acceleration
    pub start_xy: Matrix2x3<f64>,

    /// End position boundary, columns are position, velocity and acceleration
    pub end_xy: Matrix2x3<f64>,

    /// Inner position nodes, one column per node
    pub inner_xy: Matrix2xX<f64>,

    /// Start heading boundary, heading, angular velocity and angular acceleration
    pub start_yaw: Vector3<f64>,

    /// End heading boundary, heading, angular velocity and angular acceleration
    pub end_yaw: Vector3<f64>,

    /// Inner heading nodes
    pub inner_yaw: DVector<f64>,

    /// Total duration of the trajectory in seconds
    pub total_time_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while building the initial guess.
#[derive(Debug, thiserror::Error)]
pub enum TrajInitError {
    #[error("At least 2 path points are needed to estimate headings, got {0}")]
    InsufficientData(usize),

    #[error("Invalid trajectory initialisation configuration: {0}")]
    InvalidConfig(String),

    #[error("Path point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    #[error("Path segment {0} has a non-finite length")]
    NonFiniteSegment(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HeadedPath {
    /// Total length of the path in meters, using only the positions.
    pub fn length_m(&self) -> f64 {
        self.poses
            .windows(2)
            .map(|pair| (pair[1].position_m - pair[0].position_m).norm())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn first(&self) -> Option<&PathPose> {
        self.poses.first()
    }

    pub fn last(&self) -> Option<&PathPose> {
        self.poses.last()
    }
}

impl InitialGuess {
    /// Build the initial guess from the given reference path.
    ///
    /// The parameters are validated before any processing is done.
    pub fn build(path: &Path, params: &TrajInitParams) -> Result<Self, TrajInitError> {
        params.validate()?;

        let mut headed = estimate_headings(path)?;
        headed.unwrap_headings();

        let inner_xy = resample_positions(&headed, params.piece_len_m)?;
        let inner_yaw = resample_headings(&headed, params.yaw_piece_len_m())?;

        let (start_xy, end_xy) = BoundaryXy::synthesise(
            &headed,
            params.init_sig_vel_ms,
            params.end_position_override(),
        )?;
        let (start_yaw, end_yaw) = BoundaryYaw::synthesise(&headed)?;

        let total_time_s =
            estimate_total_time(&headed, params.mean_vel_ms, params.init_time_times)?;

        debug!(
            "Initial guess: {} points, {} position nodes, {} yaw nodes, {:.3} s",
            headed.len(),
            inner_xy.ncols(),
            inner_yaw.len(),
            total_time_s
        );

        Ok(Self {
            start_xy: start_xy.into_matrix(),
            end_xy: end_xy.into_matrix(),
            inner_xy,
            start_yaw: start_yaw.into_vector(),
            end_yaw: end_yaw.into_vector(),
            inner_yaw,
            total_time_s,
        })
    }

    /// Number of position pieces the guess describes (inner nodes + 1).
    pub fn num_xy_pieces(&self) -> usize {
        self.inner_xy.ncols() + 1
    }

    /// Number of heading pieces the guess describes (inner nodes + 1).
    pub fn num_yaw_pieces(&self) -> usize {
        self.inner_yaw.len() + 1
    }
}
