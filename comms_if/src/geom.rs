//! # Geometry Messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A point (or vector) in 3D space.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// An orientation quaternion, not guaranteed to be normalised.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// A position and orientation in the map frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseMsg {
    pub position: Point,
    pub orientation: Quaternion,
}

/// A pose produced by the localisation system, or picked by an operator as a goal or starting
/// pose.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedPoseMsg {
    /// UTC timestamp at which the pose was valid
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    pub pose: PoseMsg,
}

/// Odometry estimate of the vehicle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdomMsg {
    /// UTC timestamp at which the estimate was valid
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    pub pose: PoseMsg,

    /// Linear velocity in the body frame
    pub linear_vel: Point,

    /// Angular velocity in the body frame
    pub angular_vel: Point,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A point with only the `x` component set, used to carry scalar values.
    pub fn scalar(x: f64) -> Self {
        Self { x, y: 0.0, z: 0.0 }
    }
}

impl Quaternion {
    /// A quaternion representing a rotation of `yaw_rad` about the +Z axis.
    pub fn from_yaw(yaw_rad: f64) -> Self {
        let half = 0.5 * yaw_rad;
        Self {
            x: 0.0,
            y: 0.0,
            z: half.sin(),
            w: half.cos(),
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_pose_json() {
        let msg = StampedPoseMsg {
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            pose: PoseMsg {
                position: Point::new(1.0, 2.0, 0.0),
                orientation: Quaternion::from_yaw(0.0),
            },
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"timestamp\":1700000000123"));

        let parsed: StampedPoseMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }
}
