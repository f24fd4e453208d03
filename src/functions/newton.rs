//! Damped Newton root finder.

use log::{debug, trace};

use super::{FunctionError, MathFunction};

pub const DEFAULT_TOLERANCE_X: f64 = 1e-10;
pub const DEFAULT_TOLERANCE_F: f64 = 1e-12;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_MIN_DERIVATIVE: f64 = 1e-15;

const MAX_DAMPING_STEPS: usize = 10;

/// Finds a root of `function` by Newton iteration from an initial guess.
///
/// As a [`MathFunction`] the argument is the initial guess and the result is
/// the root found, or NaN when the derivative vanishes.
///
/// # Construction
/// Use [`NewtonMethod::new`] then the optional `with_*` setters.
///
/// # Examples
/// ```rust
/// use tabfn::functions::{NewtonMethod, from_fn};
///
/// let newton = NewtonMethod::new(from_fn(|x| x * x - 4.0), from_fn(|x| 2.0 * x));
/// let root = newton.solve(3.0).unwrap();
/// assert!((root - 2.0).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonMethod<F, D> {
    function: F,
    derivative: D,
    tolerance_x: f64,
    tolerance_f: f64,
    max_iterations: usize,
    min_derivative: f64,
}

impl<F: MathFunction, D: MathFunction> NewtonMethod<F, D> {
    pub fn new(function: F, derivative: D) -> Self {
        NewtonMethod {
            function,
            derivative,
            tolerance_x: DEFAULT_TOLERANCE_X,
            tolerance_f: DEFAULT_TOLERANCE_F,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_derivative: DEFAULT_MIN_DERIVATIVE,
        }
    }

    /// Stop once successive iterates differ by less than this.
    pub fn with_tolerance_x(mut self, tolerance_x: f64) -> Self {
        self.tolerance_x = tolerance_x;
        self
    }

    /// Stop once `|f(x)|` falls below this.
    pub fn with_tolerance_f(mut self, tolerance_f: f64) -> Self {
        self.tolerance_f = tolerance_f;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Smallest `|f'(x)|` the iteration divides by.
    pub fn with_min_derivative(mut self, min_derivative: f64) -> Self {
        self.min_derivative = min_derivative;
        self
    }

    pub fn tolerance_x(&self) -> f64 {
        self.tolerance_x
    }

    pub fn tolerance_f(&self) -> f64 {
        self.tolerance_f
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn min_derivative(&self) -> f64 {
        self.min_derivative
    }

    /// Runs the iteration from `initial_guess`.
    ///
    /// Returns early with the best point seen so far (smallest `|f|`) when
    /// `f` or `f'` stops being finite, and returns that point too when the
    /// iteration budget runs out.
    ///
    /// # Errors
    /// `DerivativeTooSmall` when `|f'(x)|` drops below the minimum.
    pub fn solve(&self, initial_guess: f64) -> Result<f64, FunctionError> {
        let mut current = initial_guess;
        let mut best = initial_guess;
        let mut best_value = self.function.apply(initial_guess).abs();

        for iteration in 0..self.max_iterations {
            let value = self.function.apply(current);
            let slope = self.derivative.apply(current);
            if !value.is_finite() || !slope.is_finite() {
                debug!("Newton iteration left the domain at x = {}", current);
                return Ok(best);
            }

            // NaN at the guess never compares less, so any finite value wins
            if value.abs() < best_value || best_value.is_nan() {
                best_value = value.abs();
                best = current;
            }

            if value.abs() < self.tolerance_f {
                return Ok(current);
            }

            if slope.abs() < self.min_derivative {
                return Err(FunctionError::DerivativeTooSmall { x: current });
            }

            let step = value / slope;
            let mut next = current - step;
            let next_value = self.function.apply(next);
            if !next_value.is_finite() {
                return Ok(best);
            }

            if next_value.abs() > value.abs() {
                next = self.damp(current, step, value.abs());
            }

            if !next.is_finite() {
                return Ok(best);
            }

            trace!("Newton iteration {}: x = {}", iteration, next);
            if (next - current).abs() < self.tolerance_x {
                return Ok(next);
            }
            current = next;
        }

        debug!(
            "Newton iteration did not converge in {} steps",
            self.max_iterations
        );
        Ok(best)
    }

    /// Halves the step until `|f|` no longer grows, or the damping budget
    /// or the function's domain runs out; returns the last candidate tried.
    fn damp(&self, current: f64, step: f64, current_value: f64) -> f64 {
        let mut factor = 0.5;
        let mut next = current - factor * step;
        for _ in 0..MAX_DAMPING_STEPS {
            next = current - factor * step;
            let value = self.function.apply(next);
            if !value.is_finite() || value.abs() <= current_value {
                break;
            }
            factor *= 0.5;
        }
        next
    }
}

impl<F: MathFunction, D: MathFunction> MathFunction for NewtonMethod<F, D> {
    fn apply(&self, initial_guess: f64) -> f64 {
        self.solve(initial_guess).unwrap_or(f64::NAN)
    }
}
