use itertools::Itertools;

use super::FunctionError;

/// Smallest table accepted from explicit coordinate arrays.
pub const MIN_TABLE_LEN: usize = 2;

pub fn validate_table(x_values: &[f64], y_values: &[f64]) -> Result<(), FunctionError> {
    validate_length(x_values, y_values.len())?;
    validate_min_len(x_values, MIN_TABLE_LEN)?;
    validate_order(x_values)
}

pub fn validate_length(points: &[f64], expected_len: usize) -> Result<(), FunctionError> {
    if points.len() != expected_len {
        return Err(FunctionError::DifferentLength {
            x_len: points.len(),
            y_len: expected_len,
        });
    }
    Ok(())
}

pub fn validate_min_len(points: &[f64], required: usize) -> Result<(), FunctionError> {
    if points.len() < required {
        return Err(FunctionError::TooFewPoints {
            required,
            found: points.len(),
        });
    }
    Ok(())
}

/// Checks that the points are strictly increasing. NaN never compares
/// greater, so it is rejected here too.
pub fn validate_order(points: &[f64]) -> Result<(), FunctionError> {
    match points
        .iter()
        .tuple_windows()
        .position(|(previous, current)| !(current > previous))
    {
        Some(i) => Err(FunctionError::NotStrictlyIncreasing {
            index: i + 1,
            previous: points[i],
            current: points[i + 1],
        }),
        None => Ok(()),
    }
}

pub fn validate_index(index: usize, count: usize) -> Result<(), FunctionError> {
    if index >= count {
        return Err(FunctionError::IndexOutOfRange { index, count });
    }
    Ok(())
}

pub fn validate_step(step: f64) -> Result<(), FunctionError> {
    if !(step > 0.0) || step.is_infinite() {
        return Err(FunctionError::InvalidStep(step));
    }
    Ok(())
}

/// Checks the arguments of the sampling constructors and returns the
/// bounds in ascending order.
pub fn validate_sampling(x_from: f64, x_to: f64, count: usize) -> Result<(f64, f64), FunctionError> {
    if count == 0 {
        return Err(FunctionError::TooFewPoints {
            required: 1,
            found: 0,
        });
    }
    if !x_from.is_finite() || !x_to.is_finite() {
        return Err(FunctionError::InvalidArgument(format!(
            "sampling bounds must be finite, got [{}, {}]",
            x_from, x_to
        )));
    }

    let (from, to) = if x_from > x_to {
        (x_to, x_from)
    } else {
        (x_from, x_to)
    };

    if from == to && count > 1 {
        return Err(FunctionError::InvalidArgument(format!(
            "cannot place {} distinct samples in the degenerate interval [{}, {}]",
            count, from, to
        )));
    }

    Ok((from, to))
}
