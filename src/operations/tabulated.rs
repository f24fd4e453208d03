use log::debug;

use super::DifferentialOperator;
use crate::{
    concurrent::SynchronizedTabulatedFunction,
    functions::{
        ArrayTabulatedFunctionFactory, FunctionError, Point, TabulatedFunction,
        TabulatedFunctionFactory, validation,
    },
};

/// Differentiates tabulated functions from their samples.
///
/// The derivative keeps the x-grid of its input. Its y-values are the
/// forward difference at the first sample, the backward difference at the
/// last one and the central difference everywhere else. The result is built
/// by the operator's factory, so its storage does not depend on the input's.
#[derive(Debug)]
pub struct TabulatedDifferentialOperator {
    factory: Box<dyn TabulatedFunctionFactory>,
}

impl Default for TabulatedDifferentialOperator {
    fn default() -> Self {
        Self::with_factory(ArrayTabulatedFunctionFactory)
    }
}

impl TabulatedDifferentialOperator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(factory: impl TabulatedFunctionFactory + 'static) -> Self {
        TabulatedDifferentialOperator {
            factory: Box::new(factory),
        }
    }

    pub fn factory(&self) -> &dyn TabulatedFunctionFactory {
        self.factory.as_ref()
    }

    pub fn set_factory(&mut self, factory: impl TabulatedFunctionFactory + 'static) {
        self.factory = Box::new(factory);
    }

    /// Differentiates the table behind a synchronized decorator as one
    /// atomic operation: no writer can interleave with the pass.
    pub fn derive_synchronously<T: TabulatedFunction>(
        &self,
        function: &SynchronizedTabulatedFunction<T>,
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        function.do_synchronously(|table| self.derive(&*table))
    }

    /// Wraps a plain table in a decorator and differentiates it under the
    /// decorator's lock. The decorator is returned alongside the result so
    /// the table stays usable and can be shared afterwards.
    pub fn derive_synchronously_owned<T: TabulatedFunction>(
        &self,
        function: T,
    ) -> (
        SynchronizedTabulatedFunction<T>,
        Result<Box<dyn TabulatedFunction>, FunctionError>,
    ) {
        let synchronized = SynchronizedTabulatedFunction::new(function);
        let derivative = self.derive_synchronously(&synchronized);
        (synchronized, derivative)
    }
}

impl<T: TabulatedFunction + ?Sized> DifferentialOperator<&T> for TabulatedDifferentialOperator {
    type Output = Result<Box<dyn TabulatedFunction>, FunctionError>;

    fn derive(&self, function: &T) -> Self::Output {
        let points = function.points();
        let (x_values, y_values) = finite_differences(&points)?;

        debug!(
            "derived {} table of {} points into {} storage",
            function.kind(),
            points.len(),
            self.factory.kind()
        );
        self.factory.create(&x_values, &y_values)
    }
}

fn finite_differences(points: &[Point]) -> Result<(Vec<f64>, Vec<f64>), FunctionError> {
    let count = points.len();
    if count < validation::MIN_TABLE_LEN {
        return Err(FunctionError::TooFewPoints {
            required: validation::MIN_TABLE_LEN,
            found: count,
        });
    }

    let slope = |a: &Point, b: &Point| (b.y - a.y) / (b.x - a.x);
    let y_values = (0..count)
        .map(|i| match i {
            0 => slope(&points[0], &points[1]),
            i if i == count - 1 => slope(&points[i - 1], &points[i]),
            i => slope(&points[i - 1], &points[i + 1]),
        })
        .collect();

    Ok((points.iter().map(|p| p.x).collect(), y_values))
}
