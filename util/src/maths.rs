//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Linearly interpolate between `a` and `b`, with `t = 0` giving `a` and `t = 1` giving `b`.
///
/// `t` is not clamped, values outside [0, 1] extrapolate.
pub fn lerp<T>(a: T, b: T, t: T) -> T
where
    T: Float,
{
    a + (b - a) * t
}

/// Produce the values `start, start + step, ...` strictly less than `end`.
///
/// Values are computed by multiplication rather than accumulation so that long ranges don't
/// drift. An empty vector is returned if `step` is not strictly positive.
pub fn step_range<T>(start: T, end: T, step: T) -> Vec<T>
where
    T: Float,
{
    let mut values = Vec::new();

    if !(step > T::zero()) {
        return values;
    }

    let mut i = T::zero();
    loop {
        let value = start + i * step;
        if value >= end {
            break;
        }
        values.push(value);
        i = i + T::one();
    }

    values
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(1f64, 3f64, 0.0), 1.0);
        assert_eq!(lerp(1f64, 3f64, 0.5), 2.0);
        assert_eq!(lerp(1f64, 3f64, 1.0), 3.0);
        assert_eq!(lerp(3f64, -1f64, 0.25), 2.0);
    }

    #[test]
    fn test_step_range() {
        assert_eq!(step_range(0f64, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(step_range(0f64, 0.0, 0.25), Vec::<f64>::new());
        assert_eq!(step_range(0f64, 1.0, 0.0), Vec::<f64>::new());
        assert_eq!(step_range(0f64, 1.0, -0.1), Vec::<f64>::new());

        // 0.03 may not divide 0.3 exactly in floating point, the last value must still be
        // below the end
        let values = step_range(0f64, 0.3, 0.03);
        assert!(values.iter().all(|v| *v < 0.3));
        assert!(values.len() >= 10);
    }
}
