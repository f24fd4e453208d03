//! Closed-form functions used as sampling sources and composition blocks.

use std::fmt;

use super::MathFunction;

/// `f(x) = x`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IdentityFunction;

impl MathFunction for IdentityFunction {
    fn apply(&self, x: f64) -> f64 {
        x
    }
}

/// `f(x) = x^2`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SqrFunction;

impl MathFunction for SqrFunction {
    fn apply(&self, x: f64) -> f64 {
        x * x
    }
}

/// A function returning the same value for every argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantFunction {
    constant: f64,
}

impl ConstantFunction {
    pub fn new(constant: f64) -> Self {
        ConstantFunction { constant }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl MathFunction for ConstantFunction {
    fn apply(&self, _x: f64) -> f64 {
        self.constant
    }
}

/// `f(x) = 0`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZeroFunction;

impl MathFunction for ZeroFunction {
    fn apply(&self, _x: f64) -> f64 {
        0.0
    }
}

/// `f(x) = 1`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitFunction;

impl MathFunction for UnitFunction {
    fn apply(&self, _x: f64) -> f64 {
        1.0
    }
}

/// Adapts a closure to [`MathFunction`].
#[derive(Clone, Copy)]
pub struct FnFunction<F> {
    function: F,
}

impl<F> fmt::Debug for FnFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnFunction")
    }
}

impl<F: Fn(f64) -> f64> MathFunction for FnFunction<F> {
    fn apply(&self, x: f64) -> f64 {
        (self.function)(x)
    }
}

/// Wraps a closure as a [`MathFunction`].
///
/// # Examples
/// ```rust
/// use tabfn::functions::{MathFunction, from_fn};
///
/// let cube = from_fn(|x| x * x * x);
/// assert_eq!(cube.apply(2.0), 8.0);
/// ```
pub fn from_fn<F: Fn(f64) -> f64>(function: F) -> FnFunction<F> {
    FnFunction { function }
}
