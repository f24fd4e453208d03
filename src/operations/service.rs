use log::{debug, warn};

use crate::functions::{
    ArrayTabulatedFunctionFactory, FunctionError, Point, TabulatedFunction,
    TabulatedFunctionFactory,
};

/// Point-wise arithmetic between tabulated functions sharing an x-grid.
///
/// Both operands must have the same number of samples and bitwise-equal
/// x-values at every index. Results are built by the service's factory.
#[derive(Debug)]
pub struct TabulatedFunctionOperationService {
    factory: Box<dyn TabulatedFunctionFactory>,
}

impl Default for TabulatedFunctionOperationService {
    fn default() -> Self {
        Self::with_factory(ArrayTabulatedFunctionFactory)
    }
}

impl TabulatedFunctionOperationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(factory: impl TabulatedFunctionFactory + 'static) -> Self {
        TabulatedFunctionOperationService {
            factory: Box::new(factory),
        }
    }

    pub fn factory(&self) -> &dyn TabulatedFunctionFactory {
        self.factory.as_ref()
    }

    pub fn set_factory(&mut self, factory: impl TabulatedFunctionFactory + 'static) {
        self.factory = Box::new(factory);
    }

    /// Copies the samples of `function` in index order.
    pub fn as_points(function: &(impl TabulatedFunction + ?Sized)) -> Vec<Point> {
        function.points()
    }

    pub fn add(
        &self,
        a: &(impl TabulatedFunction + ?Sized),
        b: &(impl TabulatedFunction + ?Sized),
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        self.combine(a, b, |_, u, v| Ok(u + v))
    }

    pub fn subtract(
        &self,
        a: &(impl TabulatedFunction + ?Sized),
        b: &(impl TabulatedFunction + ?Sized),
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        self.combine(a, b, |_, u, v| Ok(u - v))
    }

    pub fn multiply(
        &self,
        a: &(impl TabulatedFunction + ?Sized),
        b: &(impl TabulatedFunction + ?Sized),
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        self.combine(a, b, |_, u, v| Ok(u * v))
    }

    /// # Errors
    /// `DivisionByZero` at the first index where `b` is zero, in addition to
    /// the grid checks shared by every operation.
    pub fn divide(
        &self,
        a: &(impl TabulatedFunction + ?Sized),
        b: &(impl TabulatedFunction + ?Sized),
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        self.combine(a, b, |index, u, v| {
            if v == 0.0 {
                warn!("division by zero at index {}", index);
                return Err(FunctionError::DivisionByZero { index });
            }
            Ok(u / v)
        })
    }

    fn combine<A, B>(
        &self,
        a: &A,
        b: &B,
        operation: impl Fn(usize, f64, f64) -> Result<f64, FunctionError>,
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError>
    where
        A: TabulatedFunction + ?Sized,
        B: TabulatedFunction + ?Sized,
    {
        let left = Self::as_points(a);
        let right = Self::as_points(b);
        if left.len() != right.len() {
            warn!(
                "operands have different sample counts: {} and {}",
                left.len(),
                right.len()
            );
            return Err(FunctionError::InconsistentFunctions(format!(
                "different number of points: {} and {}",
                left.len(),
                right.len()
            )));
        }

        let mut x_values = Vec::with_capacity(left.len());
        let mut y_values = Vec::with_capacity(left.len());
        for (index, (p, q)) in left.iter().zip(&right).enumerate() {
            if p.x.to_bits() != q.x.to_bits() {
                warn!("operands differ in x at index {}: {} != {}", index, p.x, q.x);
                return Err(FunctionError::InconsistentFunctions(format!(
                    "x-values differ at index {}: {} vs {}",
                    index, p.x, q.x
                )));
            }
            x_values.push(p.x);
            y_values.push(operation(index, p.y, q.y)?);
        }

        debug!("combined two tables of {} points", x_values.len());
        self.factory.create(&x_values, &y_values)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::functions::{
        ArrayTabulatedFunction, IdentityFunction, LinkedListTabulatedFunction,
        LinkedListTabulatedFunctionFactory, SqrFunction, StorageKind,
    };

    use super::*;

    fn operands() -> (ArrayTabulatedFunction, LinkedListTabulatedFunction) {
        let a = ArrayTabulatedFunction::new(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap();
        let b = LinkedListTabulatedFunction::new(&[0.0, 1.0, 2.0], &[4.0, 5.0, 6.0]).unwrap();
        (a, b)
    }

    #[test]
    fn test_arithmetic_across_storage() {
        let service = TabulatedFunctionOperationService::new();
        let (a, b) = operands();

        assert_eq!(service.add(&a, &b).unwrap().y_values(), vec![5.0, 7.0, 9.0]);
        assert_eq!(
            service.subtract(&a, &b).unwrap().y_values(),
            vec![-3.0, -3.0, -3.0]
        );
        assert_eq!(
            service.multiply(&a, &b).unwrap().y_values(),
            vec![4.0, 10.0, 18.0]
        );
        assert_eq!(
            service.divide(&b, &a).unwrap().y_values(),
            vec![4.0, 2.5, 2.0]
        );
    }

    #[test]
    fn test_result_keeps_grid_and_uses_factory() {
        let service = TabulatedFunctionOperationService::with_factory(LinkedListTabulatedFunctionFactory);
        let (a, b) = operands();
        let sum = service.add(&a, &b).unwrap();
        assert_eq!(sum.kind(), StorageKind::LinkedList);
        assert_eq!(sum.x_values(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_division_by_zero() {
        let service = TabulatedFunctionOperationService::new();
        let (a, _) = operands();
        let zeros = ArrayTabulatedFunction::new(&[0.0, 1.0, 2.0], &[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(
            service.divide(&a, &zeros).unwrap_err(),
            FunctionError::DivisionByZero { index: 1 }
        );
    }

    #[test]
    fn test_inconsistent_operands() {
        let service = TabulatedFunctionOperationService::new();
        let (a, _) = operands();

        let longer = ArrayTabulatedFunction::from_function(&SqrFunction, 0.0, 3.0, 4).unwrap();
        assert!(matches!(
            service.add(&a, &longer),
            Err(FunctionError::InconsistentFunctions(_))
        ));

        let shifted =
            ArrayTabulatedFunction::from_function(&IdentityFunction, 0.0, 2.5, 3).unwrap();
        assert!(matches!(
            service.multiply(&a, &shifted),
            Err(FunctionError::InconsistentFunctions(_))
        ));
    }

    #[test]
    fn test_as_points() {
        let (a, _) = operands();
        assert_eq!(
            TabulatedFunctionOperationService::as_points(&a),
            vec![
                Point::new(0.0, 1.0),
                Point::new(1.0, 2.0),
                Point::new(2.0, 3.0)
            ]
        );
    }
}
