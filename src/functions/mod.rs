//! # Functions
//!
//! Real functions of one real variable and their tabulated representations.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabfn::functions::{ArrayTabulatedFunction, MathFunction, SqrFunction, TabulatedFunction};
//!
//! // Sample x^2 at five evenly spaced points over [0, 4]
//! let table = ArrayTabulatedFunction::from_function(&SqrFunction, 0.0, 4.0, 5).unwrap();
//!
//! assert_eq!(table.count(), 5);
//! assert_eq!(table.apply(2.0), 4.0); // exact hit
//! assert_eq!(table.apply(2.5), 6.5); // linear interpolation between 4 and 9
//! assert_eq!(table.apply(5.0), 16.0 + 7.0); // continues the last segment
//! ```
//!
//! ## Storage
//!
//! - **Array**: contiguous sample vectors, binary-search interval lookup
//! - **Linked list**: circular doubly-linked ring of samples, walked from
//!   whichever end is nearer
//!
//! Both share the evaluation algorithm in [`interpolation`].

pub mod analytic;
pub mod array;
pub mod composite;
pub mod errors;
pub mod factory;
pub mod interpolation;
pub mod linked_list;
pub mod newton;
pub mod point;
pub mod spline;
pub mod tabulated;
pub mod validation;

use std::sync::Arc;

pub use analytic::{
    ConstantFunction, FnFunction, IdentityFunction, SqrFunction, UnitFunction, ZeroFunction,
    from_fn,
};
pub use array::ArrayTabulatedFunction;
pub use composite::CompositeFunction;
pub use errors::FunctionError;
pub use factory::{
    ArrayTabulatedFunctionFactory, LinkedListTabulatedFunctionFactory, TabulatedFunctionFactory,
};
pub use interpolation::Interpolation;
pub use linked_list::LinkedListTabulatedFunction;
pub use newton::NewtonMethod;
pub use point::Point;
pub use spline::DeBoorFunction;
pub use tabulated::{StorageKind, StorageKindParseError, TabulatedFunction};

/// A real function of one real variable.
pub trait MathFunction {
    /// Evaluates the function at `x`.
    fn apply(&self, x: f64) -> f64;

    /// Returns a function computing `after(self(x))`.
    ///
    /// # Examples
    /// ```rust
    /// use tabfn::functions::{ConstantFunction, MathFunction, SqrFunction};
    ///
    /// let f = SqrFunction.and_then(ConstantFunction::new(3.0));
    /// assert_eq!(f.apply(10.0), 3.0);
    /// ```
    fn and_then<G>(self, after: G) -> CompositeFunction<Self, G>
    where
        Self: Sized,
        G: MathFunction,
    {
        CompositeFunction::new(self, after)
    }
}

impl<T: MathFunction + ?Sized> MathFunction for &T {
    fn apply(&self, x: f64) -> f64 {
        (**self).apply(x)
    }
}

impl<T: MathFunction + ?Sized> MathFunction for Box<T> {
    fn apply(&self, x: f64) -> f64 {
        (**self).apply(x)
    }
}

impl<T: MathFunction + ?Sized> MathFunction for Arc<T> {
    fn apply(&self, x: f64) -> f64 {
        (**self).apply(x)
    }
}
