//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Limit a value to the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range `[-pi, pi)`.
pub fn wrap_angle<T>(angle: T) -> T
where
    T: Float,
{
    let pi = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau = pi + pi;

    rem_euclid(angle + pi, tau) - pi
}

/// Sign of a value, with zero mapping to zero rather than to one.
pub fn signum_or_zero<T>(value: T) -> T
where
    T: Float,
{
    if value == T::zero() {
        T::zero()
    } else {
        value.signum()
    }
}

/// Apply a deadband to a normalised input.
///
/// Values with a magnitude below `band` become zero, the rest are rescaled so
/// the output still covers the full `[-1, 1]` range.
pub fn deadband<T>(value: T, band: T) -> T
where
    T: Float,
{
    if value.abs() < band {
        return T::zero();
    }

    let magn = lin_map((band, T::one()), (T::zero(), T::one()), value.abs());

    magn * value.signum()
}

/// `sin(x) / x`, using the taylor expansion close to zero.
pub fn sinc<T>(x: T) -> T
where
    T: Float,
{
    let small = T::from(1e-9).unwrap_or_else(T::epsilon);

    if x.abs() < small {
        let six = T::from(6.0).unwrap_or_else(T::one);
        T::one() - x * x / six
    } else {
        x.sin() / x
    }
}
