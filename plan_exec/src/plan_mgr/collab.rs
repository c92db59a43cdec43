//! Collaborators of the planning manager
//!
//! The manager doesn't own a map, a global planner or any comms, it drives them through these
//! traits so that they can be swapped for simulated or recorded versions.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use comms_if::traj::SE2TrajMsg;
use nalgebra::Vector2;

use crate::{loc::Pose2, path::Path};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Reports whether the map needed for planning is available.
pub trait MapStatus: Send + Sync {
    fn map_ready(&self) -> bool;
}

/// Produces the reference path between two poses.
pub trait PathSource: Send + Sync {
    fn plan(&self, start: &Pose2, goal: &Pose2) -> Result<Path, PathSourceError>;
}

/// Publishes an optimised trajectory to the tracking controller.
pub trait TrajSink: Send + Sync {
    fn publish(&self, msg: SE2TrajMsg) -> Result<(), SinkError>;
}

/// Persists the sampled positions of an optimised trajectory.
pub trait ResultSink: Send + Sync {
    fn save(&self, points_m: &[Vector2<f64>]) -> Result<(), SinkError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A map status set from outside, for example by a map subscriber callback.
#[derive(Debug, Default)]
pub struct ReadyFlag {
    ready: AtomicBool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathSourceError {
    #[error("Couldn't read the reference path file {0:?}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Invalid reference path record on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Couldn't archive the result: {0}")]
    Archive(#[from] util::archive::ArchiveError),

    #[error("The sink is not accepting data: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ReadyFlag {
    pub fn new(ready: bool) -> Self {
        Self {
            ready: AtomicBool::new(ready),
        }
    }

    pub fn set(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }
}

impl MapStatus for ReadyFlag {
    fn map_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
