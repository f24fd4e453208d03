#![cfg(test)]

use crate::functions::{ArrayTabulatedFunction, LinkedListTabulatedFunction};

// Helper function to assert floating point equality with tolerance
pub fn assert_float_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Expected {} to be approximately equal to {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

/// The same samples in both storage variants.
pub fn both_storages(
    x_values: &[f64],
    y_values: &[f64],
) -> (ArrayTabulatedFunction, LinkedListTabulatedFunction) {
    (
        ArrayTabulatedFunction::new(x_values, y_values).unwrap(),
        LinkedListTabulatedFunction::new(x_values, y_values).unwrap(),
    )
}
