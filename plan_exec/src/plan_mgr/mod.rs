//! # Planning Manager
//!
//! Runs a planning cycle each time a new goal is received: get a reference path from the path
//! source, build the initial guess, optimise it into a trajectory, then publish and persist the
//! result.
//!
//! Only one cycle runs at a time. Goals arriving while a cycle is running, or before the map is
//! ready, are dropped rather than queued. The manager is shared between threads (goal and
//! odometry callbacks), so all of its methods take `&self`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod collab;
pub mod params;
pub mod ref_source;
pub mod sinks;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, PoisonError, RwLock,
};

use chrono::{DateTime, Utc};
use comms_if::{geom::Point, traj::SE2TrajMsg};
use log::{debug, info, warn};

use crate::{
    loc::Pose2,
    traj::{OptimiserError, SE2Trajectory, TrajOptimiser},
    traj_init::{InitialGuess, TrajInitError},
};

use self::collab::{MapStatus, PathSource, PathSourceError, ResultSink, SinkError, TrajSink};
pub use self::params::PlanMgrParams;

#[cfg(test)]
pub(crate) use self::params::test_params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The collaborators a planning cycle is run against.
#[derive(Clone)]
pub struct Collaborators {
    pub map: Arc<dyn MapStatus>,
    pub path_source: Arc<dyn PathSource>,
    pub optimiser: Arc<dyn TrajOptimiser>,
    pub traj_sink: Arc<dyn TrajSink>,
    pub result_sink: Arc<dyn ResultSink>,
}

pub struct PlanMgr {
    params: PlanMgrParams,

    collab: Collaborators,

    /// Set while a planning cycle is running
    planning: AtomicBool,

    /// Latest odometry pose, the start of the next planning cycle
    odom: RwLock<Pose2>,
}

/// Summary of a completed planning cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReport {
    pub start: Pose2,
    pub goal: Pose2,
    pub num_path_points: usize,
    pub num_pos_pieces: usize,
    pub num_yaw_pieces: usize,
    pub duration_s: f64,
    pub num_samples: usize,

    /// False if the sampled trajectory couldn't be saved
    pub persisted: bool,
}

/// Holds the planning flag for the lifetime of a cycle, clearing it when dropped.
struct PlanGuard<'a> {
    flag: &'a AtomicBool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum TriggerOutcome {
    /// The goal was ignored without starting a cycle
    Dropped(DropReason),

    /// The cycle was started but stopped early, nothing was published
    Aborted(PlanMgrError),

    /// A trajectory was published
    Completed(PlanReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MapNotReady,
    AlreadyPlanning,
}

#[derive(Debug, thiserror::Error)]
pub enum PlanMgrError {
    #[error("Invalid planning manager configuration: {0}")]
    InvalidConfig(String),

    #[error("Couldn't get the reference path: {0}")]
    PathSourceError(PathSourceError),

    #[error("The reference path contains no points")]
    EmptyPath,

    #[error("Couldn't build the initial guess: {0}")]
    TrajInitError(TrajInitError),

    #[error("Trajectory optimisation failed: {0}")]
    OptimiserError(OptimiserError),

    #[error("Couldn't publish the trajectory: {0}")]
    PublishError(SinkError),

    #[error("Sync primitive is poisoned")]
    PoisonError,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PlanMgr {
    /// Create a new manager, checking the parameters are usable.
    pub fn new(params: PlanMgrParams, collab: Collaborators) -> Result<Self, PlanMgrError> {
        params
            .traj_init
            .validate()
            .map_err(|e| PlanMgrError::InvalidConfig(e.to_string()))?;

        if !(params.result_sample_period_s > 0.0) {
            return Err(PlanMgrError::InvalidConfig(format!(
                "result_sample_period_s must be strictly positive, got {}",
                params.result_sample_period_s
            )));
        }

        Ok(Self {
            params,
            collab,
            planning: AtomicBool::new(false),
            odom: RwLock::new(Pose2::default()),
        })
    }

    /// Update the odometry pose used as the start of the next planning cycle.
    ///
    /// A cycle which is already running keeps the start pose it began with.
    pub fn set_odom(&self, pose: Pose2) -> Result<(), PlanMgrError> {
        *self.odom.write()? = pose;
        Ok(())
    }

    /// Returns true while a planning cycle is running.
    pub fn is_planning(&self) -> bool {
        self.planning.load(Ordering::Acquire)
    }

    /// Plan a trajectory to the given goal.
    ///
    /// Blocks until the cycle has finished. Never panics, any failure is logged and reported in
    /// the outcome.
    pub fn trigger(&self, goal: Pose2) -> TriggerOutcome {
        if !self.collab.map.map_ready() {
            info!("Map not ready, goal {:?} dropped", goal);
            return TriggerOutcome::Dropped(DropReason::MapNotReady);
        }

        let _guard = match PlanGuard::acquire(&self.planning) {
            Some(g) => g,
            None => {
                info!("Already planning, goal {:?} dropped", goal);
                return TriggerOutcome::Dropped(DropReason::AlreadyPlanning);
            }
        };

        match self.plan(goal) {
            Ok(report) => {
                info!(
                    "Planning complete: {} position pieces, {} yaw pieces, {:.3} s",
                    report.num_pos_pieces, report.num_yaw_pieces, report.duration_s
                );
                TriggerOutcome::Completed(report)
            }
            Err(e) => {
                warn!("Planning aborted: {}", e);
                TriggerOutcome::Aborted(e)
            }
        }
    }

    /// Run one planning cycle, the caller must hold the planning flag.
    fn plan(&self, goal: Pose2) -> Result<PlanReport, PlanMgrError> {
        let start = *self.odom.read()?;

        debug!("Planning from {:?} to {:?}", start, goal);

        let path = self.collab.path_source.plan(&start, &goal)?;
        if path.is_empty() {
            return Err(PlanMgrError::EmptyPath);
        }

        let guess = InitialGuess::build(&path, &self.params.traj_init)?;
        let num_pos_pieces = guess.num_xy_pieces();
        let num_yaw_pieces = guess.num_yaw_pieces();

        let traj = self.collab.optimiser.optimise(guess)?;

        self.collab
            .traj_sink
            .publish(build_traj_msg(&traj, Utc::now()))
            .map_err(PlanMgrError::PublishError)?;

        let samples = traj.sample_positions(self.params.result_sample_period_s);
        let persisted = match self.collab.result_sink.save(&samples) {
            Ok(()) => true,
            Err(e) => {
                warn!("Couldn't save the planned trajectory: {}", e);
                false
            }
        };

        Ok(PlanReport {
            start,
            goal,
            num_path_points: path.get_num_points(),
            num_pos_pieces,
            num_yaw_pieces,
            duration_s: traj.total_duration_s(),
            num_samples: samples.len(),
            persisted,
        })
    }
}

impl<'a> PlanGuard<'a> {
    /// Set the flag, or `None` if it is already set.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl<'a> Drop for PlanGuard<'a> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl From<PathSourceError> for PlanMgrError {
    fn from(e: PathSourceError) -> Self {
        Self::PathSourceError(e)
    }
}

impl From<TrajInitError> for PlanMgrError {
    fn from(e: TrajInitError) -> Self {
        Self::TrajInitError(e)
    }
}

impl From<OptimiserError> for PlanMgrError {
    fn from(e: OptimiserError) -> Self {
        Self::OptimiserError(e)
    }
}

impl<G> From<PoisonError<G>> for PlanMgrError {
    fn from(_: PoisonError<G>) -> Self {
        Self::PoisonError
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the message for the tracking controller.
///
/// Each channel lists the value at the start of every piece with the piece duration, then the
/// value at the end of the channel. Headings are stored in `x`.
pub fn build_traj_msg(traj: &SE2Trajectory, start_time: DateTime<Utc>) -> SE2TrajMsg {
    let mut msg = SE2TrajMsg::new(start_time);

    for piece in traj.pos_traj.pieces() {
        let p = piece.value(0.0);
        msg.pos_pts.push(Point::new(p.x, p.y, 0.0));
        msg.pos_t_pts.push(piece.duration_s());
    }
    if let Some(p) = traj.pos_traj.value(traj.pos_traj.total_duration_s()) {
        msg.pos_pts.push(Point::new(p.x, p.y, 0.0));
    }

    for piece in traj.yaw_traj.pieces() {
        msg.angle_pts.push(Point::scalar(piece.value(0.0)[0]));
        msg.angle_t_pts.push(piece.duration_s());
    }
    if let Some(y) = traj.yaw_traj.value(traj.yaw_traj.total_duration_s()) {
        msg.angle_pts.push(Point::scalar(y[0]));
    }

    msg
}
