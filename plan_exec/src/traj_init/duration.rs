//! Nominal trajectory duration

use super::{HeadedPath, TrajInitError};

/// Initial duration of the trajectory, the time taken to traverse the path at `mean_vel_ms`
/// multiplied by `time_times`.
pub fn estimate_total_time(
    path: &HeadedPath,
    mean_vel_ms: f64,
    time_times: f64,
) -> Result<f64, TrajInitError> {
    if !(mean_vel_ms > 0.0) {
        return Err(TrajInitError::InvalidConfig(format!(
            "mean_vel_ms must be strictly positive, got {}",
            mean_vel_ms
        )));
    }

    Ok(path.length_m() / mean_vel_ms * time_times)
}
