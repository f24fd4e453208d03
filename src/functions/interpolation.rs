//! Interpolation and extrapolation shared by every storage variant.
//!
//! A storage provides four hooks through [`Interpolation`]; [`evaluate`]
//! combines them into the evaluation rule:
//!
//! - below the left bound: continue the first segment
//! - above the right bound: continue the last segment
//! - exactly on a sample: return that sample's y unchanged
//! - otherwise: interpolate linearly inside the interval found by
//!   [`floor_index_of_x`](Interpolation::floor_index_of_x)

use log::trace;

use super::TabulatedFunction;

/// Storage-specific hooks of the evaluation algorithm.
///
/// # Floor index convention
/// `floor_index_of_x` returns `0` below the left bound, `count()` above the
/// right bound and otherwise the greatest `i` with `x[i] <= x`, clamped to
/// `count() - 2` so that `[i, i + 1]` is always a valid interval.
pub trait Interpolation: TabulatedFunction {
    fn floor_index_of_x(&self, x: f64) -> usize;

    fn extrapolate_left(&self, x: f64) -> f64;

    fn extrapolate_right(&self, x: f64) -> f64;

    /// Interpolates inside the interval starting at `floor_index`.
    fn interpolate_at(&self, x: f64, floor_index: usize) -> f64;

    /// The y-value at an index already known to be valid.
    fn y_at(&self, index: usize) -> f64;
}

/// Linear interpolation through `(left_x, left_y)` and `(right_x, right_y)`.
///
/// Also used for extrapolation, with `x` outside `[left_x, right_x]`.
pub fn interpolate(x: f64, left_x: f64, right_x: f64, left_y: f64, right_y: f64) -> f64 {
    left_y + (right_y - left_y) * (x - left_x) / (right_x - left_x)
}

/// Evaluates a table at `x`.
pub fn evaluate<T: Interpolation + ?Sized>(table: &T, x: f64) -> f64 {
    if x < table.left_bound() {
        trace!("extrapolating left at x = {}", x);
        return table.extrapolate_left(x);
    }

    if x > table.right_bound() {
        trace!("extrapolating right at x = {}", x);
        return table.extrapolate_right(x);
    }

    if let Some(index) = table.index_of_x(x) {
        return table.y_at(index);
    }

    let floor_index = table.floor_index_of_x(x);
    trace!("interpolating at x = {} in interval {}", x, floor_index);
    table.interpolate_at(x, floor_index)
}
