use std::fmt;

use serde::{Deserialize, Serialize};

use super::DifferentialOperator;
use crate::functions::{FunctionError, MathFunction, validation};

/// Finite-difference scheme of a stepping operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteppingScheme {
    /// `(f(x) - f(x - h)) / h`
    Left,
    /// `(f(x + h) - f(x)) / h`
    Right,
    /// `(f(x + h) - f(x - h)) / 2h`
    Middle,
}

impl fmt::Display for SteppingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SteppingScheme::Left => write!(f, "left"),
            SteppingScheme::Right => write!(f, "right"),
            SteppingScheme::Middle => write!(f, "middle"),
        }
    }
}

/// Differentiates any function numerically with a fixed positive step.
///
/// The step is checked on construction and on every [`set_step`]: it must
/// be positive and finite.
///
/// [`set_step`]: SteppingDifferentialOperator::set_step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteppingDifferentialOperator {
    step: f64,
    scheme: SteppingScheme,
}

impl SteppingDifferentialOperator {
    pub fn new(scheme: SteppingScheme, step: f64) -> Result<Self, FunctionError> {
        validation::validate_step(step)?;
        Ok(SteppingDifferentialOperator { step, scheme })
    }

    pub fn left(step: f64) -> Result<Self, FunctionError> {
        Self::new(SteppingScheme::Left, step)
    }

    pub fn right(step: f64) -> Result<Self, FunctionError> {
        Self::new(SteppingScheme::Right, step)
    }

    pub fn middle(step: f64) -> Result<Self, FunctionError> {
        Self::new(SteppingScheme::Middle, step)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Replaces the step; derivatives created earlier keep their own.
    pub fn set_step(&mut self, step: f64) -> Result<(), FunctionError> {
        validation::validate_step(step)?;
        self.step = step;
        Ok(())
    }

    pub fn scheme(&self) -> SteppingScheme {
        self.scheme
    }
}

impl<F: MathFunction> DifferentialOperator<F> for SteppingDifferentialOperator {
    type Output = SteppingDerivative<F>;

    fn derive(&self, function: F) -> SteppingDerivative<F> {
        SteppingDerivative {
            function,
            step: self.step,
            scheme: self.scheme,
        }
    }
}

/// Numerical derivative produced by a [`SteppingDifferentialOperator`].
#[derive(Debug, Clone)]
pub struct SteppingDerivative<F> {
    function: F,
    step: f64,
    scheme: SteppingScheme,
}

impl<F> SteppingDerivative<F> {
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn scheme(&self) -> SteppingScheme {
        self.scheme
    }

    pub fn into_inner(self) -> F {
        self.function
    }
}

impl<F: MathFunction> MathFunction for SteppingDerivative<F> {
    fn apply(&self, x: f64) -> f64 {
        let f = &self.function;
        let h = self.step;
        match self.scheme {
            SteppingScheme::Left => (f.apply(x) - f.apply(x - h)) / h,
            SteppingScheme::Right => (f.apply(x + h) - f.apply(x)) / h,
            SteppingScheme::Middle => (f.apply(x + h) - f.apply(x - h)) / (2.0 * h),
        }
    }
}
