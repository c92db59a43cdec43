//! # Trajectory Messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geom::Point;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An SE2 trajectory as consumed by the tracking controller.
///
/// The trajectory is made of two independent piecewise channels, position and heading. Each
/// channel lists the value at the start of every piece alongside that piece's duration, followed
/// by one extra value evaluated at the end of the last piece. So for `n` pieces there are `n + 1`
/// points and `n` durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SE2TrajMsg {
    /// UTC time at which the trajectory starts
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,

    /// Initial velocity of the vehicle
    pub init_v: Point,

    /// Initial acceleration of the vehicle
    pub init_a: Point,

    /// Position control points, `z` unused
    pub pos_pts: Vec<Point>,

    /// Duration of each position piece in seconds
    pub pos_t_pts: Vec<f64>,

    /// Heading control points, heading in radians stored in `x`
    pub angle_pts: Vec<Point>,

    /// Duration of each heading piece in seconds
    pub angle_t_pts: Vec<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SE2TrajMsg {
    /// Create an empty message starting at the given time, with zero initial velocity and
    /// acceleration.
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            init_v: Point::default(),
            init_a: Point::default(),
            pos_pts: Vec::new(),
            pos_t_pts: Vec::new(),
            angle_pts: Vec::new(),
            angle_t_pts: Vec::new(),
        }
    }

    /// Returns true if both channels hold one more point than durations.
    pub fn is_well_formed(&self) -> bool {
        !self.pos_t_pts.is_empty()
            && !self.angle_t_pts.is_empty()
            && self.pos_pts.len() == self.pos_t_pts.len() + 1
            && self.angle_pts.len() == self.angle_t_pts.len() + 1
    }

    /// Total duration of the position channel in seconds.
    pub fn pos_duration_s(&self) -> f64 {
        self.pos_t_pts.iter().sum()
    }

    /// Total duration of the heading channel in seconds.
    pub fn angle_duration_s(&self) -> f64 {
        self.angle_t_pts.iter().sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_well_formed() {
        let mut msg = SE2TrajMsg::new(Utc::now());
        assert!(!msg.is_well_formed());

        msg.pos_pts = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)];
        msg.pos_t_pts = vec![2.0];
        msg.angle_pts = vec![Point::scalar(0.0), Point::scalar(0.1), Point::scalar(0.2)];
        msg.angle_t_pts = vec![1.0, 1.0];
        assert!(msg.is_well_formed());
        assert_eq!(msg.pos_duration_s(), 2.0);
        assert_eq!(msg.angle_duration_s(), 2.0);

        msg.angle_pts.pop();
        assert!(!msg.is_well_formed());
    }

    #[test]
    fn test_json_round_trip() {
        let mut msg = SE2TrajMsg::new(Utc::now());
        msg.pos_pts = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 2.0, 0.0)];
        msg.pos_t_pts = vec![1.5];
        msg.angle_pts = vec![Point::scalar(0.0), Point::scalar(0.5)];
        msg.angle_t_pts = vec![1.5];

        let parsed: SE2TrajMsg = serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();

        // Timestamps only survive at millisecond resolution
        assert_eq!(
            parsed.start_time.timestamp_millis(),
            msg.start_time.timestamp_millis()
        );
        assert_eq!(parsed.pos_pts, msg.pos_pts);
        assert_eq!(parsed.angle_t_pts, msg.angle_t_pts);
    }
}
