//! # Localisation module
//!
//! Planar poses of the vehicle, as used for the start and goal of a planning cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use comms_if::geom::{OdomMsg, PoseMsg, StampedPoseMsg};
use nalgebra::{Quaternion, UnitQuaternion, Vector2};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The planar pose (position and heading in the map frame) of the vehicle.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Pose2 {
    /// The position in the map frame
    pub position_m: Vector2<f64>,

    /// The heading of the vehicle, angle to the +ve map X axis.
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MsgFileError {
    #[error("Couldn't read the message file {0:?}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Couldn't parse the message file {0:?}: {1}")]
    Json(PathBuf, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose2 {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    /// Project a 3D pose message onto the map plane.
    ///
    /// The heading is the yaw of the orientation, in the range [-pi, pi].
    pub fn from_pose_msg(msg: &PoseMsg) -> Self {
        let q = UnitQuaternion::from_quaternion(Quaternion::new(
            msg.orientation.w,
            msg.orientation.x,
            msg.orientation.y,
            msg.orientation.z,
        ));

        Self {
            position_m: Vector2::new(msg.position.x, msg.position.y),
            heading_rad: q.euler_angles().2,
        }
    }

    /// Extract the planar pose from an odometry estimate.
    pub fn from_odom_msg(msg: &OdomMsg) -> Self {
        Self::from_pose_msg(&msg.pose)
    }

    /// Planar pose of a goal or start pose message, the timestamp is dropped.
    pub fn from_stamped_pose_msg(msg: &StampedPoseMsg) -> Self {
        Self::from_pose_msg(&msg.pose)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Read a single JSON encoded message from a file.
pub fn read_msg_file<T: DeserializeOwned>(path: &Path) -> Result<T, MsgFileError> {
    let json =
        std::fs::read_to_string(path).map_err(|e| MsgFileError::Io(path.to_path_buf(), e))?;

    serde_json::from_str(&json).map_err(|e| MsgFileError::Json(path.to_path_buf(), e))
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use comms_if::geom::{Point, Quaternion as QuatMsg};

    use super::*;

    fn write_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "plan_exec_loc_{}_{}.json",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_from_pose_msg() {
        let pose = Pose2::from_pose_msg(&PoseMsg {
            position: Point::new(1.0, -2.0, 0.3),
            orientation: QuatMsg::from_yaw(2.5),
        });

        assert_eq!(pose.position_m, Vector2::new(1.0, -2.0));
        assert_relative_eq!(pose.heading_rad, 2.5, epsilon = 1e-12);

        // Yaw beyond pi is wrapped
        let pose = Pose2::from_pose_msg(&PoseMsg {
            position: Point::default(),
            orientation: QuatMsg::from_yaw(4.0),
        });
        assert_relative_eq!(pose.heading_rad, 4.0 - std::f64::consts::TAU, epsilon = 1e-12);
    }

    #[test]
    fn test_unnormalised_quaternion() {
        // Scaled quaternions still describe the same rotation
        let pose = Pose2::from_pose_msg(&PoseMsg {
            position: Point::default(),
            orientation: QuatMsg {
                x: 0.0,
                y: 0.0,
                z: 2.0 * (0.25f64).sin(),
                w: 2.0 * (0.25f64).cos(),
            },
        });

        assert_relative_eq!(pose.heading_rad, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_goal_msg_file() {
        let path = write_file(
            "goal",
            r#"{
                "timestamp": 1600000000000,
                "pose": {
                    "position": {"x": -19.495, "y": 0.444386, "z": 0.0},
                    "orientation": {"x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0}
                }
            }"#,
        );

        let msg: StampedPoseMsg = read_msg_file(&path).unwrap();
        assert_eq!(msg.timestamp, Utc.timestamp_millis_opt(1600000000000).unwrap());

        let goal = Pose2::from_stamped_pose_msg(&msg);
        assert_eq!(goal, Pose2::new(-19.495, 0.444386, 0.0));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_odom_msg_file() {
        let msg = OdomMsg {
            timestamp: Utc.timestamp_millis_opt(1600000000000).unwrap(),
            pose: PoseMsg {
                position: Point::new(2.0, 3.0, -0.5),
                orientation: QuatMsg::from_yaw(-1.2),
            },
            linear_vel: Point::scalar(0.4),
            angular_vel: Point::default(),
        };
        let path = write_file("odom", &serde_json::to_string(&msg).unwrap());

        let pose = Pose2::from_odom_msg(&read_msg_file(&path).unwrap());
        assert_eq!(pose.position_m, Vector2::new(2.0, 3.0));
        assert_relative_eq!(pose.heading_rad, -1.2, epsilon = 1e-12);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_bad_msg_file() {
        let path = write_file("bad", "{\"timestamp\": 0}");
        assert!(matches!(
            read_msg_file::<StampedPoseMsg>(&path),
            Err(MsgFileError::Json(_, _))
        ));
        std::fs::remove_file(path).ok();

        assert!(matches!(
            read_msg_file::<OdomMsg>(Path::new("/this/path/does/not/exist.json")),
            Err(MsgFileError::Io(_, _))
        ));
    }
}
