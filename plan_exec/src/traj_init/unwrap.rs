//! Heading unwrapping
//!
//! `atan2` headings jump by 2pi when the path direction crosses the -ve X axis. The optimiser
//! interpolates headings directly so these jumps would make the vehicle spin on the spot.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::HeadedPath;

impl HeadedPath {
    /// Shift headings by multiples of 2pi so that consecutive headings are closer than pi/2.
    ///
    /// Shifts are cumulative: each heading is compared against the already corrected heading
    /// before it. Positions are not modified. Two consecutive raw headings differing by more than
    /// pi/2 after wrapping (a sharp corner) are left as they are.
    pub fn unwrap_headings(&mut self) {
        for i in 1..self.poses.len() {
            let prev = self.poses[i - 1].heading_rad;
            let curr = &mut self.poses[i].heading_rad;

            // Non-finite headings would never leave the loops below
            if !prev.is_finite() || !curr.is_finite() {
                continue;
            }

            while *curr - prev >= FRAC_PI_2 {
                *curr -= TAU;
            }
            while *curr - prev <= -FRAC_PI_2 {
                *curr += TAU;
            }
        }
    }
}
