use std::{
    fmt,
    hash::{Hash, Hasher},
};

use log::debug;

use super::{
    FunctionError, MathFunction, Point, StorageKind, TabulatedFunction,
    interpolation::{self, Interpolation},
    tabulated, validation,
};

/// Tabulated function stored in two contiguous vectors.
///
/// Index access is O(1) and interval lookup is a binary search.
///
/// # Examples
///
/// ```rust
/// use tabfn::functions::{ArrayTabulatedFunction, MathFunction, TabulatedFunction};
///
/// let mut table = ArrayTabulatedFunction::new(&[0.0, 1.0, 3.0], &[0.0, 2.0, 2.0]).unwrap();
/// assert_eq!(table.apply(0.25), 0.5);
///
/// table.set_y(2, 6.0).unwrap();
/// assert_eq!(table.apply(2.0), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTabulatedFunction {
    x_values: Vec<f64>,
    y_values: Vec<f64>,
}

impl ArrayTabulatedFunction {
    /// Creates a table from copies of the coordinate arrays.
    ///
    /// # Errors
    /// - `DifferentLength` if the arrays differ in length.
    /// - `TooFewPoints` if fewer than two samples are given.
    /// - `NotStrictlyIncreasing` if the x-values are not strictly increasing.
    pub fn new(x_values: &[f64], y_values: &[f64]) -> Result<Self, FunctionError> {
        validation::validate_table(x_values, y_values)?;
        debug!(
            "ArrayTabulatedFunction created with {} points",
            x_values.len()
        );

        Ok(ArrayTabulatedFunction {
            x_values: x_values.to_vec(),
            y_values: y_values.to_vec(),
        })
    }

    /// Samples `source` at `count` evenly spaced points over `[x_from, x_to]`.
    ///
    /// Reversed bounds are swapped. A single sample is allowed and yields a
    /// constant table.
    ///
    /// # Errors
    /// Fails when `count` is zero, a bound is not finite, or the interval is
    /// degenerate while more than one sample is requested.
    pub fn from_function<F: MathFunction + ?Sized>(
        source: &F,
        x_from: f64,
        x_to: f64,
        count: usize,
    ) -> Result<Self, FunctionError> {
        let (from, to) = validation::validate_sampling(x_from, x_to, count)?;

        let step = if count > 1 {
            (to - from) / (count - 1) as f64
        } else {
            0.0
        };
        let x_values: Vec<f64> = (0..count).map(|i| from + i as f64 * step).collect();
        validation::validate_order(&x_values)?;
        let y_values = x_values.iter().map(|&x| source.apply(x)).collect();

        debug!(
            "ArrayTabulatedFunction sampled over [{}, {}] with {} points",
            from, to, count
        );

        Ok(ArrayTabulatedFunction { x_values, y_values })
    }

    /// Iterates over the samples in index order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.x_values
            .iter()
            .zip(&self.y_values)
            .map(|(&x, &y)| Point::new(x, y))
    }

    fn last(&self) -> usize {
        self.x_values.len() - 1
    }
}

impl MathFunction for ArrayTabulatedFunction {
    fn apply(&self, x: f64) -> f64 {
        interpolation::evaluate(self, x)
    }
}

impl TabulatedFunction for ArrayTabulatedFunction {
    fn kind(&self) -> StorageKind {
        StorageKind::Array
    }

    fn count(&self) -> usize {
        self.x_values.len()
    }

    fn get_x(&self, index: usize) -> Result<f64, FunctionError> {
        validation::validate_index(index, self.count())?;
        Ok(self.x_values[index])
    }

    fn get_y(&self, index: usize) -> Result<f64, FunctionError> {
        validation::validate_index(index, self.count())?;
        Ok(self.y_values[index])
    }

    fn set_y(&mut self, index: usize, value: f64) -> Result<(), FunctionError> {
        validation::validate_index(index, self.count())?;
        self.y_values[index] = value;
        Ok(())
    }

    fn index_of_x(&self, x: f64) -> Option<usize> {
        self.x_values.iter().position(|&v| v == x)
    }

    fn index_of_y(&self, y: f64) -> Option<usize> {
        self.y_values.iter().position(|&v| v == y)
    }

    fn left_bound(&self) -> f64 {
        self.x_values[0]
    }

    fn right_bound(&self) -> f64 {
        self.x_values[self.last()]
    }

    fn points(&self) -> Vec<Point> {
        self.iter().collect()
    }

    fn x_values(&self) -> Vec<f64> {
        self.x_values.clone()
    }

    fn y_values(&self) -> Vec<f64> {
        self.y_values.clone()
    }
}

impl Interpolation for ArrayTabulatedFunction {
    fn floor_index_of_x(&self, x: f64) -> usize {
        if x < self.left_bound() {
            return 0;
        }
        if x > self.right_bound() {
            return self.count();
        }

        // Number of samples with x-value <= x; zero only for NaN.
        let not_greater = self.x_values.partition_point(|&v| v <= x);
        not_greater
            .saturating_sub(1)
            .min(self.count().saturating_sub(2))
    }

    fn extrapolate_left(&self, x: f64) -> f64 {
        if self.count() == 1 {
            return self.y_values[0];
        }
        interpolation::interpolate(
            x,
            self.x_values[0],
            self.x_values[1],
            self.y_values[0],
            self.y_values[1],
        )
    }

    fn extrapolate_right(&self, x: f64) -> f64 {
        let last = self.last();
        if last == 0 {
            return self.y_values[0];
        }
        interpolation::interpolate(
            x,
            self.x_values[last - 1],
            self.x_values[last],
            self.y_values[last - 1],
            self.y_values[last],
        )
    }

    fn interpolate_at(&self, x: f64, floor_index: usize) -> f64 {
        if self.count() == 1 {
            return self.y_values[0];
        }
        let i = floor_index.min(self.count() - 2);
        interpolation::interpolate(
            x,
            self.x_values[i],
            self.x_values[i + 1],
            self.y_values[i],
            self.y_values[i + 1],
        )
    }

    fn y_at(&self, index: usize) -> f64 {
        self.y_values[index]
    }
}

impl Hash for ArrayTabulatedFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.count().hash(state);
        tabulated::hash_points(self.iter(), state);
    }
}

impl fmt::Display for ArrayTabulatedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        tabulated::fmt_table(self, f)
    }
}
