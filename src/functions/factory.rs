use std::fmt;

use super::{
    ArrayTabulatedFunction, FunctionError, LinkedListTabulatedFunction, StorageKind,
    TabulatedFunction,
};

/// Builds tabulated functions of one storage variant from coordinate arrays.
///
/// Operators that produce new tables hold a factory so callers can choose
/// the storage of their results.
pub trait TabulatedFunctionFactory: fmt::Debug + Send + Sync {
    /// Creates a table from the given samples.
    ///
    /// # Errors
    /// The same failures as the variant's own constructor.
    fn create(
        &self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError>;

    /// The storage variant this factory produces.
    fn kind(&self) -> StorageKind;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayTabulatedFunctionFactory;

impl TabulatedFunctionFactory for ArrayTabulatedFunctionFactory {
    fn create(
        &self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        Ok(Box::new(ArrayTabulatedFunction::new(x_values, y_values)?))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Array
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedListTabulatedFunctionFactory;

impl TabulatedFunctionFactory for LinkedListTabulatedFunctionFactory {
    fn create(
        &self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        Ok(Box::new(LinkedListTabulatedFunction::new(
            x_values, y_values,
        )?))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::LinkedList
    }
}

/// A storage kind picks its factory at runtime, e.g. from configuration.
impl TabulatedFunctionFactory for StorageKind {
    fn create(
        &self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        StorageKind::create(*self, x_values, y_values)
    }

    fn kind(&self) -> StorageKind {
        *self
    }
}
