//! # Communications interface crate.
//!
//! Provides the message definitions exchanged between the planner and the rest of the vehicle
//! software (localisation, goal input and the trajectory tracking controller).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geometry messages: points, orientations and poses
pub mod geom;

/// Trajectory messages sent to the tracking controller
pub mod traj;
