//! Parameters for the planning manager

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use serde::Deserialize;

use crate::traj_init::TrajInitParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct PlanMgrParams {
    /// Initial guess construction
    pub traj_init: TrajInitParams,

    /// Recorded reference path, relative to the software root if not absolute
    pub ref_path_file: PathBuf,

    /// Negate both coordinates of the recorded path, defaults to true as recorded paths are
    /// mirrored with respect to the map frame
    #[serde(default = "default_mirror_ref_path")]
    pub mirror_ref_path: bool,

    /// Where the sampled trajectory positions are written, relative to the session root if not
    /// absolute
    pub result_file: PathBuf,

    /// Time between samples of the persisted trajectory
    pub result_sample_period_s: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn default_mirror_ref_path() -> bool {
    true
}

#[cfg(test)]
pub(crate) fn test_params() -> PlanMgrParams {
    PlanMgrParams {
        traj_init: crate::traj_init::test_params(),
        ref_path_file: PathBuf::from("ref_path.csv"),
        mirror_ref_path: false,
        result_file: PathBuf::from("result.csv"),
        result_sample_period_s: 0.03,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_toml() {
        let params: PlanMgrParams = util::params::from_toml_str(
            "ref_path_file = \"data/ref_path.csv\"\n\
             mirror_ref_path = false\n\
             result_file = \"se2_result.csv\"\n\
             result_sample_period_s = 0.03\n\
             \n\
             [traj_init]\n\
             piece_len_m = 0.3\n\
             mean_vel_ms = 1.0\n\
             init_time_times = 1.2\n\
             yaw_piece_times = 2.0\n\
             init_sig_vel_ms = 0.1\n",
        )
        .unwrap();

        assert!(!params.mirror_ref_path);
        assert_eq!(params.ref_path_file, PathBuf::from("data/ref_path.csv"));
        assert_eq!(params.traj_init.piece_len_m, 0.3);
        assert!(params.traj_init.end_position_override_m.is_none());
    }

    #[test]
    fn test_mirror_on_by_default() {
        let params: PlanMgrParams = util::params::from_toml_str(
            "ref_path_file = \"data/ref_path.csv\"\n\
             result_file = \"se2_result.csv\"\n\
             result_sample_period_s = 0.03\n\
             \n\
             [traj_init]\n\
             piece_len_m = 0.3\n\
             mean_vel_ms = 1.0\n\
             init_time_times = 1.2\n\
             yaw_piece_times = 2.0\n\
             init_sig_vel_ms = 0.1\n",
        )
        .unwrap();

        assert!(params.mirror_ref_path);
    }
}
