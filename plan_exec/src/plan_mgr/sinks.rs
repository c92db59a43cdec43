//! Sinks for the products of a planning cycle

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use comms_if::traj::SE2TrajMsg;
use nalgebra::Vector2;
use util::{archive, session};

use super::collab::{ResultSink, SinkError, TrajSink};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Session relative path published trajectories are saved to
const TRAJ_SAVE_PATH: &str = "se2_traj/se2_traj.json";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Writes the sampled trajectory positions to a CSV file, replacing the previous result.
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    pub file_path: PathBuf,
}

/// Publishes trajectories into the session directory, one timestamped JSON file per trajectory.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionTrajSink;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CsvResultSink {
    pub fn new<P: Into<PathBuf>>(file_path: P) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl ResultSink for CsvResultSink {
    fn save(&self, points_m: &[Vector2<f64>]) -> Result<(), SinkError> {
        archive::write_points_csv(&self.file_path, points_m)?;
        Ok(())
    }
}

impl TrajSink for SessionTrajSink {
    fn publish(&self, msg: SE2TrajMsg) -> Result<(), SinkError> {
        // The epoch is only set once a session has been started
        if session::get_elapsed_seconds().is_nan() {
            return Err(SinkError::Unavailable(
                "no session has been started".to_string(),
            ));
        }

        session::save_with_timestamp(TRAJ_SAVE_PATH, msg);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_csv_result_sink() {
        let path = std::env::temp_dir().join(format!(
            "plan_exec_result_sink_{}.csv",
            std::process::id()
        ));
        let sink = CsvResultSink::new(&path);

        sink.save(&[Vector2::new(0.0, 0.0), Vector2::new(1.5, -2.0)])
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0,0\n1.5,-2\n");

        // Results are replaced, not appended
        sink.save(&[Vector2::new(3.0, 4.0)]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3,4\n");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_csv_result_sink_bad_dir() {
        let sink = CsvResultSink::new("/this/dir/does/not/exist/result.csv");
        assert!(matches!(
            sink.save(&[Vector2::zeros()]),
            Err(SinkError::Archive(archive::ArchiveError::Open(_, _)))
        ));
    }

    #[test]
    fn test_session_sink_without_session() {
        let msg = SE2TrajMsg::new(chrono::Utc::now());
        assert!(matches!(
            SessionTrajSink.publish(msg),
            Err(SinkError::Unavailable(_))
        ));
    }
}
