//! Trajectory initialisation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Deserialize;

use super::TrajInitError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for building the initial guess of the trajectory optimiser
#[derive(Deserialize, Debug, Clone)]
pub struct TrajInitParams {
    /// Arc length between the inner position nodes.
    pub piece_len_m: f64,

    /// Nominal mean velocity of the vehicle along the path.
    pub mean_vel_ms: f64,

    /// Multiplier applied to the nominal duration (length / mean velocity) to get the initial
    /// trajectory duration.
    pub init_time_times: f64,

    /// Number of yaw pieces per position piece. The yaw nodes are spaced
    /// `piece_len_m / yaw_piece_times` apart.
    pub yaw_piece_times: f64,

    /// Signed speed used for both the start and end boundary velocities.
    pub init_sig_vel_ms: f64,

    /// Fixed terminal position (e.g. a docking point) which replaces the last point of the
    /// reference path in the end boundary state. The end heading still comes from the path.
    #[serde(default)]
    pub end_position_override_m: Option<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajInitParams {
    /// Check the parameters describe a valid discretisation.
    pub fn validate(&self) -> Result<(), TrajInitError> {
        if !(self.piece_len_m > 0.0) {
            return Err(TrajInitError::InvalidConfig(format!(
                "piece_len_m must be strictly positive, got {}",
                self.piece_len_m
            )));
        }
        if !(self.mean_vel_ms > 0.0) {
            return Err(TrajInitError::InvalidConfig(format!(
                "mean_vel_ms must be strictly positive, got {}",
                self.mean_vel_ms
            )));
        }
        if !(self.yaw_piece_times >= 1.0) {
            return Err(TrajInitError::InvalidConfig(format!(
                "yaw_piece_times must be at least 1, got {}",
                self.yaw_piece_times
            )));
        }
        if !(self.init_time_times >= 0.0) {
            return Err(TrajInitError::InvalidConfig(format!(
                "init_time_times must not be negative, got {}",
                self.init_time_times
            )));
        }
        if !self.init_sig_vel_ms.is_finite() {
            return Err(TrajInitError::InvalidConfig(format!(
                "init_sig_vel_ms must be finite, got {}",
                self.init_sig_vel_ms
            )));
        }

        Ok(())
    }

    /// Arc length between the inner yaw nodes.
    pub fn yaw_piece_len_m(&self) -> f64 {
        self.piece_len_m / self.yaw_piece_times
    }

    pub fn end_position_override(&self) -> Option<Vector2<f64>> {
        self.end_position_override_m
            .map(|p| Vector2::new(p[0], p[1]))
    }
}

#[cfg(test)]
pub(crate) fn test_params() -> TrajInitParams {
    TrajInitParams {
        piece_len_m: 1.0,
        mean_vel_ms: 0.5,
        init_time_times: 1.5,
        yaw_piece_times: 2.0,
        init_sig_vel_ms: 0.1,
        end_position_override_m: None,
    }
}
