//! Arc length resampling of the headed path
//!
//! Positions and headings are resampled independently, at different resolutions, but both
//! passes share the same walk along the path.

use nalgebra::{DVector, Matrix2xX, Vector2};

use util::maths::lerp;

use super::{HeadedPath, TrajInitError};

/// Inner position nodes spaced `resolution_m` apart along the path, one column per node.
///
/// Neither end of the path is included.
pub fn resample_positions(
    path: &HeadedPath,
    resolution_m: f64,
) -> Result<Matrix2xX<f64>, TrajInitError> {
    let mut nodes: Vec<Vector2<f64>> = Vec::new();

    walk(path, resolution_m, |k, t| {
        let p0 = path.poses[k].position_m;
        let p1 = path.poses[k + 1].position_m;
        nodes.push(Vector2::new(lerp(p0.x, p1.x, t), lerp(p0.y, p1.y, t)));
    })?;

    Ok(Matrix2xX::from_columns(&nodes))
}

/// Inner heading nodes spaced `resolution_m` apart along the path.
///
/// Headings are interpolated linearly so the path should be unwrapped first.
pub fn resample_headings(
    path: &HeadedPath,
    resolution_m: f64,
) -> Result<DVector<f64>, TrajInitError> {
    let mut nodes: Vec<f64> = Vec::new();

    walk(path, resolution_m, |k, t| {
        nodes.push(lerp(
            path.poses[k].heading_rad,
            path.poses[k + 1].heading_rad,
            t,
        ));
    })?;

    Ok(DVector::from_vec(nodes))
}

/// Walk along the path calling `emit(k, t)` every `resolution_m` of travelled distance, where the
/// node lies at fraction `t` of the segment from point `k` to point `k + 1`.
///
/// Fails on a segment of non-finite length, which would never be walked to its end.
fn walk<F>(path: &HeadedPath, resolution_m: f64, mut emit: F) -> Result<(), TrajInitError>
where
    F: FnMut(usize, f64),
{
    if !(resolution_m > 0.0) {
        return Err(TrajInitError::InvalidConfig(format!(
            "resampling resolution must be strictly positive, got {}",
            resolution_m
        )));
    }

    let mut acc_m = 0.0;

    for (k, pair) in path.poses.windows(2).enumerate() {
        let seg_len_m = (pair[1].position_m - pair[0].position_m).norm();
        if !seg_len_m.is_finite() {
            return Err(TrajInitError::NonFiniteSegment(k));
        }
        acc_m += seg_len_m;

        // acc_m <= resolution_m on entry to every segment, so a zero length segment never gets
        // here
        while acc_m > resolution_m {
            emit(k, 1.0 - (acc_m - resolution_m) / seg_len_m);
            acc_m -= resolution_m;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::super::PathPose;
    use super::*;

    fn headed(points: &[(f64, f64, f64)]) -> HeadedPath {
        HeadedPath {
            poses: points
                .iter()
                .map(|(x, y, h)| PathPose {
                    position_m: Vector2::new(*x, *y),
                    heading_rad: *h,
                })
                .collect(),
        }
    }

    fn straight(len_m: f64, num_points: usize) -> HeadedPath {
        let step = len_m / (num_points - 1) as f64;
        headed(
            &(0..num_points)
                .map(|i| (i as f64 * step, 0.0, 0.0))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_straight_scenario() {
        let path = headed(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (2.0, 0.0, 0.0), (3.0, 0.0, 0.0)]);

        let xy = resample_positions(&path, 1.0).unwrap();
        assert_eq!(xy.ncols(), 2);
        assert_eq!(xy.column(0).into_owned(), Vector2::new(1.0, 0.0));
        assert_eq!(xy.column(1).into_owned(), Vector2::new(2.0, 0.0));

        let yaw = resample_headings(&path, 0.5).unwrap();
        assert_eq!(yaw.len(), 5);
        assert!(yaw.iter().all(|y| *y == 0.0));

        let x_at_yaw = resample_positions(&path, 0.5).unwrap();
        for (i, x) in [0.5, 1.0, 1.5, 2.0, 2.5].iter().enumerate() {
            assert_relative_eq!(x_at_yaw[(0, i)], *x);
        }
    }

    #[test]
    fn test_node_count() {
        // floor(L / r) nodes when r doesn't divide L
        for (len_m, res_m, expected) in [(3.2, 1.0, 3), (2.9, 1.0, 2), (1.0, 0.3, 3), (0.5, 1.0, 0)]
            .iter()
        {
            let path = straight(*len_m, 7);
            assert_eq!(
                resample_positions(&path, *res_m).unwrap().ncols(),
                *expected,
                "L = {}, r = {}",
                len_m,
                res_m
            );
            assert_eq!(resample_headings(&path, *res_m).unwrap().len(), *expected);
        }
    }

    #[test]
    fn test_finer_covers_coarser() {
        let path = headed(&[
            (0.0, 0.0, 0.0),
            (1.3, 0.4, 0.3),
            (2.0, 1.9, 1.1),
            (1.1, 3.0, 2.4),
            (0.2, 3.1, 3.0),
        ]);

        let paths = [path, straight(3.2, 7), straight(2.0, 3)];

        for path in paths.iter() {
            for res_m in [0.3, 0.7, 1.1].iter() {
                let coarse = resample_positions(path, *res_m).unwrap();
                let fine = resample_positions(path, res_m / 2.0).unwrap();

                // Halving the resolution never loses a node
                assert!(
                    fine.ncols() >= coarse.ncols(),
                    "r = {}: {} fine nodes, {} coarse nodes",
                    res_m,
                    fine.ncols(),
                    coarse.ncols()
                );

                for c in coarse.column_iter() {
                    let c = c.into_owned();
                    let closest = fine
                        .column_iter()
                        .map(|f| (f.into_owned() - c).norm())
                        .fold(std::f64::INFINITY, f64::min);
                    assert!(closest <= res_m / 2.0 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_headings_interpolated() {
        let path = headed(&[(0.0, 0.0, 3.0), (1.0, 0.0, 3.28), (2.0, 0.0, 3.5)]);

        let yaw = resample_headings(&path, 0.5).unwrap();
        assert_eq!(yaw.len(), 3);
        assert_relative_eq!(yaw[0], 3.14, epsilon = 1e-12);
        assert_relative_eq!(yaw[1], 3.28, epsilon = 1e-12);
        assert_relative_eq!(yaw[2], 3.39, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_length_segments() {
        let path = headed(&[
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            (2.0, 0.0, 0.0),
            (2.0, 0.0, 0.0),
            (3.0, 0.0, 0.0),
        ]);

        let xy = resample_positions(&path, 1.0).unwrap();
        assert_eq!(xy.ncols(), 2);
        assert!(xy.iter().all(|v| v.is_finite()));

        // Coincident points only
        let path = headed(&[(1.0, 1.0, 0.0), (1.0, 1.0, 0.0)]);
        assert_eq!(resample_positions(&path, 1.0).unwrap().ncols(), 0);
    }

    #[test]
    fn test_non_finite_segments() {
        // Finite points far enough apart that the segment length overflows
        let path = headed(&[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (-1e308, 0.0, 0.0),
            (1e308, 0.0, 0.0),
        ]);
        assert!(matches!(
            resample_positions(&path, 1.0),
            Err(TrajInitError::NonFiniteSegment(2))
        ));
        assert!(matches!(
            resample_headings(&path, 1.0),
            Err(TrajInitError::NonFiniteSegment(2))
        ));

        let path = headed(&[(0.0, 0.0, 0.0), (std::f64::INFINITY, 0.0, 0.0)]);
        assert!(matches!(
            resample_positions(&path, 1.0),
            Err(TrajInitError::NonFiniteSegment(0))
        ));

        let path = headed(&[(0.0, 0.0, 0.0), (std::f64::NAN, 0.0, 0.0)]);
        assert!(matches!(
            resample_headings(&path, 1.0),
            Err(TrajInitError::NonFiniteSegment(0))
        ));
    }

    #[test]
    fn test_invalid_resolution() {
        let path = straight(3.0, 4);
        for res_m in [0.0, -1.0, std::f64::NAN].iter() {
            assert!(matches!(
                resample_positions(&path, *res_m),
                Err(TrajInitError::InvalidConfig(_))
            ));
            assert!(matches!(
                resample_headings(&path, *res_m),
                Err(TrajInitError::InvalidConfig(_))
            ));
        }
    }
}
