//! Planner executable entry point.
//!
//! Runs a single planning cycle from the given start pose to the given goal using the recorded
//! reference path, publishing the trajectory into the session directory and writing the sampled
//! positions to the result file.
//!
//! The goal and start can be given as numbers on the command line or as JSON encoded goal pose
//! and odometry messages.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{error, info, warn};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use structopt::StructOpt;

// Internal
use comms_if::geom::{OdomMsg, StampedPoseMsg};
use plan_lib::{
    loc::{read_msg_file, Pose2},
    plan_mgr::{
        collab::ReadyFlag, ref_source::CsvRefSource, sinks::CsvResultSink,
        sinks::SessionTrajSink, Collaborators, PlanMgr, PlanMgrParams, TriggerOutcome,
    },
    traj::HermiteOptimiser,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "plan_exec", about = "Plan an SE2 trajectory along the reference path")]
struct Opts {
    /// The x-coordinate of the goal in the map frame.
    #[structopt(
        allow_hyphen_values = true,
        required_unless = "goal-msg",
        conflicts_with = "goal-msg"
    )]
    goal_x_m: Option<f64>,

    /// The y-coordinate of the goal in the map frame.
    #[structopt(allow_hyphen_values = true, required_unless = "goal-msg")]
    goal_y_m: Option<f64>,

    /// The heading of the goal in radians.
    #[structopt(default_value = "0.0", allow_hyphen_values = true)]
    goal_heading_rad: f64,

    /// JSON goal pose message file, used instead of the goal coordinates.
    #[structopt(long, parse(from_os_str))]
    goal_msg: Option<PathBuf>,

    /// Start pose of the vehicle as `x y heading`, defaults to the map origin.
    #[structopt(long, number_of_values = 3, allow_hyphen_values = true)]
    start: Option<Vec<f64>>,

    /// JSON odometry message file giving the start pose.
    #[structopt(long, parse(from_os_str), conflicts_with = "start")]
    odom_msg: Option<PathBuf>,

    /// Parameter file, relative to the params directory.
    #[structopt(long, default_value = "plan_mgr.toml")]
    params: String,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new("plan_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Uneven Terrain Planner Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: PlanMgrParams =
        util::params::load(&opts.params).wrap_err("Could not load planning manager params")?;

    let sw_root = host::get_sw_root().wrap_err("Software root is not set")?;
    let ref_path_file = resolve(&sw_root, &params.ref_path_file);
    let result_file = resolve(&session.session_root, &params.result_file);

    info!("Reference path: {:?}", ref_path_file);
    info!("Result file: {:?}", result_file);

    // ---- INITIALISE PLANNER ----

    let collab = Collaborators {
        // The recorded path needs no map
        map: Arc::new(ReadyFlag::new(true)),
        path_source: Arc::new(CsvRefSource::new(ref_path_file, params.mirror_ref_path)),
        optimiser: Arc::new(HermiteOptimiser),
        traj_sink: Arc::new(SessionTrajSink),
        result_sink: Arc::new(CsvResultSink::new(result_file)),
    };

    let plan_mgr = PlanMgr::new(params, collab).wrap_err("Failed to create the planning manager")?;

    if let Some(start) = &opts.start {
        plan_mgr.set_odom(Pose2::new(start[0], start[1], start[2]))?;
    }

    if let Some(file) = &opts.odom_msg {
        let msg: OdomMsg = read_msg_file(file).wrap_err("Could not read the odometry message")?;
        info!("Odometry valid at {}", msg.timestamp);
        plan_mgr.set_odom(Pose2::from_odom_msg(&msg))?;
    }

    // ---- PLAN ----

    let goal = match (&opts.goal_msg, opts.goal_x_m, opts.goal_y_m) {
        (Some(file), _, _) => {
            let msg: StampedPoseMsg =
                read_msg_file(file).wrap_err("Could not read the goal message")?;
            info!("Goal set at {}", msg.timestamp);
            Pose2::from_stamped_pose_msg(&msg)
        }
        (None, Some(x_m), Some(y_m)) => Pose2::new(x_m, y_m, opts.goal_heading_rad),
        _ => return Err(eyre!("A goal message or both goal coordinates must be given")),
    };

    info!("Goal: {:?}", goal);

    match plan_mgr.trigger(goal) {
        TriggerOutcome::Completed(report) => {
            info!(
                "Trajectory of {:.3} s planned along {} path points",
                report.duration_s, report.num_path_points
            );
            if !report.persisted {
                warn!("The trajectory was published but not saved to the result file");
            }
        }
        TriggerOutcome::Dropped(reason) => warn!("Goal dropped: {:?}", reason),
        TriggerOutcome::Aborted(e) => error!("Planning failed: {}", e),
    }

    // ---- SHUTDOWN ----

    session.exit();

    Ok(())
}

/// Join `path` onto `root` unless it is already absolute.
fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
