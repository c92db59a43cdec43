//! # Planner library.
//!
//! Trajectory planning for a ground vehicle over uneven terrain. A reference path is turned into
//! the initial guess of an SE2 trajectory optimiser, the optimised trajectory is then published
//! to the tracking controller and archived.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation - planar poses of the vehicle
pub mod loc;

/// Reference paths produced by a path source
pub mod path;

/// Planning manager - runs one planning cycle per goal
pub mod plan_mgr;

/// SE2 trajectories and the optimiser interface
pub mod traj;

/// Trajectory initialisation - builds the optimiser's initial guess from a reference path
pub mod traj_init;
