//! Quintic Hermite trajectory through the initial guess
//!
//! Threads one quintic per piece through the boundary and inner nodes of each channel. Time is
//! shared out equally between the pieces of a channel, interior node velocities come from central
//! differences of the neighbouring nodes and interior accelerations are zero.

use log::trace;
use nalgebra::{SVector, Vector1};

use crate::traj_init::InitialGuess;

use super::{KinState, OptimiserError, Piece, Piecewise, SE2Trajectory, TrajOptimiser};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Builds the trajectory directly from the guess without any cost minimisation.
#[derive(Debug, Default, Clone, Copy)]
pub struct HermiteOptimiser;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajOptimiser for HermiteOptimiser {
    fn optimise(&self, guess: InitialGuess) -> Result<SE2Trajectory, OptimiserError> {
        let total_time_s = guess.total_time_s;
        if !(total_time_s > 0.0) {
            return Err(OptimiserError::NotConverged(format!(
                "total time must be strictly positive, got {} s",
                total_time_s
            )));
        }

        let start_xy = KinState {
            pos: guess.start_xy.column(0).into_owned(),
            vel: guess.start_xy.column(1).into_owned(),
            acc: guess.start_xy.column(2).into_owned(),
        };
        let end_xy = KinState {
            pos: guess.end_xy.column(0).into_owned(),
            vel: guess.end_xy.column(1).into_owned(),
            acc: guess.end_xy.column(2).into_owned(),
        };
        let inner_xy: Vec<_> = guess
            .inner_xy
            .column_iter()
            .map(|c| c.into_owned())
            .collect();

        let yaw_state = |v: &nalgebra::Vector3<f64>| KinState {
            pos: Vector1::new(v[0]),
            vel: Vector1::new(v[1]),
            acc: Vector1::new(v[2]),
        };
        let inner_yaw: Vec<_> = guess.inner_yaw.iter().map(|y| Vector1::new(*y)).collect();

        let pos_traj = thread_nodes(&start_xy, &end_xy, &inner_xy, total_time_s)?;
        let yaw_traj = thread_nodes(
            &yaw_state(&guess.start_yaw),
            &yaw_state(&guess.end_yaw),
            &inner_yaw,
            total_time_s,
        )?;

        trace!(
            "Hermite trajectory: {} position pieces, {} yaw pieces over {:.3} s",
            pos_traj.piece_num(),
            yaw_traj.piece_num(),
            total_time_s
        );

        Ok(SE2Trajectory { pos_traj, yaw_traj })
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn thread_nodes<const D: usize>(
    start: &KinState<D>,
    end: &KinState<D>,
    inner: &[SVector<f64, D>],
    total_time_s: f64,
) -> Result<Piecewise<D>, OptimiserError> {
    let num_pieces = inner.len() + 1;
    let piece_time_s = total_time_s / num_pieces as f64;

    let mut states = Vec::with_capacity(num_pieces + 1);
    states.push(*start);
    for (i, node) in inner.iter().enumerate() {
        let prev = if i == 0 { start.pos } else { inner[i - 1] };
        let next = inner.get(i + 1).copied().unwrap_or(end.pos);

        states.push(KinState {
            pos: *node,
            vel: (next - prev) / (2.0 * piece_time_s),
            acc: SVector::zeros(),
        });
    }
    states.push(*end);

    let pieces = states
        .windows(2)
        .map(|pair| Piece::quintic(&pair[0], &pair[1], piece_time_s))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Piecewise::new(pieces))
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    use super::*;
    use crate::{path::Path, traj_init::test_params};

    fn guess() -> InitialGuess {
        let path = Path::from_points(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(2.0, 0.5),
            Vector2::new(3.0, 1.5),
            Vector2::new(3.5, 3.0),
        ]);
        InitialGuess::build(&path, &test_params()).unwrap()
    }

    #[test]
    fn test_passes_through_nodes() {
        let guess = guess();
        let traj = HermiteOptimiser.optimise(guess.clone()).unwrap();

        assert_eq!(traj.pos_traj.piece_num(), guess.num_xy_pieces());
        assert_eq!(traj.yaw_traj.piece_num(), guess.num_yaw_pieces());
        assert_relative_eq!(traj.total_duration_s(), guess.total_time_s, epsilon = 1e-9);
        assert_relative_eq!(
            traj.yaw_traj.total_duration_s(),
            guess.total_time_s,
            epsilon = 1e-9
        );

        let dt = guess.total_time_s / guess.num_xy_pieces() as f64;
        for (i, node) in guess.inner_xy.column_iter().enumerate() {
            assert_relative_eq!(
                traj.pos((i + 1) as f64 * dt).unwrap(),
                node.into_owned(),
                epsilon = 1e-9
            );
        }

        assert_relative_eq!(
            traj.pos(0.0).unwrap(),
            guess.start_xy.column(0).into_owned()
        );
        assert_relative_eq!(
            traj.pos(guess.total_time_s).unwrap(),
            guess.end_xy.column(0).into_owned(),
            epsilon = 1e-9
        );
        assert_relative_eq!(traj.yaw(0.0).unwrap(), guess.start_yaw[0]);
        assert_relative_eq!(
            traj.yaw(guess.total_time_s).unwrap(),
            guess.end_yaw[0],
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_velocity_continuity() {
        let traj = HermiteOptimiser.optimise(guess()).unwrap();
        let pieces = traj.pos_traj.pieces();

        assert_relative_eq!(pieces[0].velocity(0.0), Vector2::new(0.1, 0.0));
        for pair in pieces.windows(2) {
            assert_relative_eq!(
                pair[0].velocity(pair[0].duration_s()),
                pair[1].velocity(0.0),
                epsilon = 1e-9
            );
            assert_relative_eq!(
                pair[0].value(pair[0].duration_s()),
                pair[1].value(0.0),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_no_inner_nodes() {
        let path = Path::from_points(vec![Vector2::new(0.0, 0.0), Vector2::new(0.4, 0.0)]);
        let guess = InitialGuess::build(&path, &test_params()).unwrap();
        assert_eq!(guess.inner_xy.ncols(), 0);

        let traj = HermiteOptimiser.optimise(guess).unwrap();
        assert_eq!(traj.pos_traj.piece_num(), 1);
        assert_relative_eq!(traj.pos(1e6).unwrap(), Vector2::new(0.4, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_not_converged() {
        let mut guess = guess();
        guess.total_time_s = 0.0;
        assert!(matches!(
            HermiteOptimiser.optimise(guess.clone()),
            Err(OptimiserError::NotConverged(_))
        ));

        guess.total_time_s = std::f64::NAN;
        assert!(matches!(
            HermiteOptimiser.optimise(guess),
            Err(OptimiserError::NotConverged(_))
        ));
    }
}
