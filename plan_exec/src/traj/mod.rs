//! # SE2 trajectories
//!
//! A trajectory is made of two independent piecewise polynomial channels, the 2D position and the
//! heading of the vehicle. Each piece is a quintic in its own local time, starting at zero.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod hermite;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{SVector, Vector2};

use crate::traj_init::InitialGuess;

pub use hermite::HermiteOptimiser;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of coefficients of a quintic polynomial
const NUM_COEFFS: usize = 6;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Turns an initial guess into a smooth trajectory.
///
/// The guess is consumed, a new one is built for every planning cycle.
pub trait TrajOptimiser: Send + Sync {
    fn optimise(&self, guess: InitialGuess) -> Result<SE2Trajectory, OptimiserError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Value and first two derivatives at one end of a piece.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KinState<const D: usize> {
    pub pos: SVector<f64, D>,
    pub vel: SVector<f64, D>,
    pub acc: SVector<f64, D>,
}

/// A single polynomial piece of a trajectory channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece<const D: usize> {
    /// Coefficients in ascending power of the local time
    coeffs: [SVector<f64, D>; NUM_COEFFS],

    duration_s: f64,
}

/// An ordered sequence of pieces, each starting where the previous one ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Piecewise<const D: usize> {
    pieces: Vec<Piece<D>>,
}

/// Position and heading trajectory of the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct SE2Trajectory {
    pub pos_traj: Piecewise<2>,
    pub yaw_traj: Piecewise<1>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OptimiserError {
    #[error("Trajectory optimisation did not converge: {0}")]
    NotConverged(String),

    #[error("A piece must have a strictly positive duration, got {0} s")]
    InvalidDuration(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<const D: usize> KinState<D> {
    /// A state at the given value with no motion.
    pub fn at_rest(pos: SVector<f64, D>) -> Self {
        Self {
            pos,
            vel: SVector::zeros(),
            acc: SVector::zeros(),
        }
    }
}

impl<const D: usize> Piece<D> {
    pub fn new(coeffs: [SVector<f64, D>; NUM_COEFFS], duration_s: f64) -> Self {
        Self { coeffs, duration_s }
    }

    /// The unique quintic joining the `start` and `end` states over `duration_s`.
    pub fn quintic(
        start: &KinState<D>,
        end: &KinState<D>,
        duration_s: f64,
    ) -> Result<Self, OptimiserError> {
        if !(duration_s > 0.0) || !duration_s.is_finite() {
            return Err(OptimiserError::InvalidDuration(duration_s));
        }

        let t = duration_s;
        let t2 = t * t;
        let t3 = t2 * t;
        let dp = end.pos - start.pos;

        let c3 = (dp * 20.0
            - (end.vel * 8.0 + start.vel * 12.0) * t
            - (start.acc * 3.0 - end.acc) * t2)
            / (2.0 * t3);
        let c4 = (dp * -30.0
            + (end.vel * 14.0 + start.vel * 16.0) * t
            + (start.acc * 3.0 - end.acc * 2.0) * t2)
            / (2.0 * t3 * t);
        let c5 = (dp * 12.0 - (end.vel + start.vel) * 6.0 * t - (start.acc - end.acc) * t2)
            / (2.0 * t3 * t2);

        Ok(Self {
            coeffs: [start.pos, start.vel, start.acc * 0.5, c3, c4, c5],
            duration_s,
        })
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn coeffs(&self) -> &[SVector<f64, D>; NUM_COEFFS] {
        &self.coeffs
    }

    /// Value at local time `t_s`. `t_s` is not clamped to the piece.
    pub fn value(&self, t_s: f64) -> SVector<f64, D> {
        self.coeffs
            .iter()
            .rev()
            .fold(SVector::zeros(), |acc, c| acc * t_s + c)
    }

    /// First derivative at local time `t_s`.
    pub fn velocity(&self, t_s: f64) -> SVector<f64, D> {
        self.coeffs
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(SVector::zeros(), |acc, (i, c)| acc * t_s + c * i as f64)
    }
}

impl<const D: usize> Piecewise<D> {
    pub fn new(pieces: Vec<Piece<D>>) -> Self {
        Self { pieces }
    }

    pub fn piece_num(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece(&self, index: usize) -> Option<&Piece<D>> {
        self.pieces.get(index)
    }

    pub fn pieces(&self) -> &[Piece<D>] {
        &self.pieces
    }

    pub fn total_duration_s(&self) -> f64 {
        self.pieces.iter().map(|p| p.duration_s).sum()
    }

    /// Value at time `t_s` from the start of the first piece, clamped to the duration of the
    /// trajectory. `None` if there are no pieces.
    pub fn value(&self, t_s: f64) -> Option<SVector<f64, D>> {
        let (piece, local_t_s) = self.locate(t_s)?;
        Some(piece.value(local_t_s))
    }

    /// Piece containing time `t_s` and the local time within it.
    fn locate(&self, t_s: f64) -> Option<(&Piece<D>, f64)> {
        let last = self.pieces.last()?;

        let mut remaining_s = t_s.max(0.0);
        for piece in self.pieces.iter() {
            if remaining_s <= piece.duration_s {
                return Some((piece, remaining_s));
            }
            remaining_s -= piece.duration_s;
        }

        Some((last, last.duration_s))
    }
}

impl SE2Trajectory {
    pub fn pos(&self, t_s: f64) -> Option<Vector2<f64>> {
        self.pos_traj.value(t_s)
    }

    pub fn yaw(&self, t_s: f64) -> Option<f64> {
        self.yaw_traj.value(t_s).map(|y| y[0])
    }

    /// Duration of the position channel, which the heading channel matches.
    pub fn total_duration_s(&self) -> f64 {
        self.pos_traj.total_duration_s()
    }

    /// Positions along the trajectory every `period_s` over `[0, total)`.
    pub fn sample_positions(&self, period_s: f64) -> Vec<Vector2<f64>> {
        util::maths::step_range(0.0, self.total_duration_s(), period_s)
            .into_iter()
            .filter_map(|t| self.pos(t))
            .collect()
    }
}
