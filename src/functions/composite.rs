use super::MathFunction;

/// Composition `second(first(x))`.
///
/// Holds both functions by value; use references or `Arc` to share them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeFunction<F, G> {
    first: F,
    second: G,
}

impl<F: MathFunction, G: MathFunction> CompositeFunction<F, G> {
    pub fn new(first: F, second: G) -> Self {
        CompositeFunction { first, second }
    }

    pub fn first(&self) -> &F {
        &self.first
    }

    pub fn second(&self) -> &G {
        &self.second
    }
}

impl<F: MathFunction, G: MathFunction> MathFunction for CompositeFunction<F, G> {
    fn apply(&self, x: f64) -> f64 {
        self.second.apply(self.first.apply(x))
    }
}

#[cfg(test)]
mod tests {
    use crate::functions::{
        ArrayTabulatedFunction, ConstantFunction, IdentityFunction, SqrFunction, from_fn,
    };

    use super::*;

    #[test]
    fn test_composition_order() {
        let plus_one = from_fn(|x| x + 1.0);
        // (x + 1)^2
        let f = CompositeFunction::new(plus_one, SqrFunction);
        assert_eq!(f.apply(2.0), 9.0);

        // x^2 + 1
        let g = SqrFunction.and_then(plus_one);
        assert_eq!(g.apply(2.0), 5.0);
    }

    #[test]
    fn test_chained_and_then() {
        let f = IdentityFunction
            .and_then(SqrFunction)
            .and_then(from_fn(|x| x * 10.0));
        assert_eq!(f.apply(3.0), 90.0);
    }

    #[test]
    fn test_composition_with_constant() {
        let f = SqrFunction.and_then(ConstantFunction::new(-1.0));
        assert_eq!(f.apply(42.0), -1.0);
    }

    #[test]
    fn test_composition_with_tabulated() {
        let table = ArrayTabulatedFunction::new(&[0.0, 1.0, 2.0], &[0.0, 2.0, 4.0]).unwrap();
        let f = (&table).and_then(SqrFunction);
        assert_eq!(f.apply(1.5), 9.0);

        let g = SqrFunction.and_then(&table);
        assert_eq!(g.apply(1.0), 2.0);
    }
}
