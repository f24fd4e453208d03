use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    ArrayTabulatedFunction, FunctionError, LinkedListTabulatedFunction, MathFunction, Point,
};

/// A function backed by an ordered table of `(x, y)` samples.
///
/// x-values are strictly increasing and fixed at construction; y-values may
/// be replaced in place with [`set_y`](TabulatedFunction::set_y). Samples are
/// addressed by a dense index `0..count()`.
///
/// Implementations carry no internal synchronisation. Wrap a table in
/// [`SynchronizedTabulatedFunction`](crate::concurrent::SynchronizedTabulatedFunction)
/// to share it between threads that mutate it.
pub trait TabulatedFunction: MathFunction + fmt::Debug + Send + Sync {
    /// The storage variant backing this table.
    fn kind(&self) -> StorageKind;

    /// Number of samples, always at least one.
    fn count(&self) -> usize;

    /// The x-value at `index`.
    fn get_x(&self, index: usize) -> Result<f64, FunctionError>;

    /// The y-value at `index`.
    fn get_y(&self, index: usize) -> Result<f64, FunctionError>;

    /// Replaces the y-value at `index`.
    fn set_y(&mut self, index: usize, value: f64) -> Result<(), FunctionError>;

    /// First index whose x-value equals `x` exactly.
    fn index_of_x(&self, x: f64) -> Option<usize>;

    /// First index whose y-value equals `y` exactly.
    fn index_of_y(&self, y: f64) -> Option<usize>;

    /// The smallest x-value.
    fn left_bound(&self) -> f64;

    /// The largest x-value.
    fn right_bound(&self) -> f64;

    /// Snapshot of all samples in index order.
    fn points(&self) -> Vec<Point>;

    /// Snapshot of all x-values in index order.
    fn x_values(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.x).collect()
    }

    /// Snapshot of all y-values in index order.
    fn y_values(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.y).collect()
    }
}

impl<T: TabulatedFunction + ?Sized> TabulatedFunction for Box<T> {
    fn kind(&self) -> StorageKind {
        (**self).kind()
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn get_x(&self, index: usize) -> Result<f64, FunctionError> {
        (**self).get_x(index)
    }

    fn get_y(&self, index: usize) -> Result<f64, FunctionError> {
        (**self).get_y(index)
    }

    fn set_y(&mut self, index: usize, value: f64) -> Result<(), FunctionError> {
        (**self).set_y(index, value)
    }

    fn index_of_x(&self, x: f64) -> Option<usize> {
        (**self).index_of_x(x)
    }

    fn index_of_y(&self, y: f64) -> Option<usize> {
        (**self).index_of_y(y)
    }

    fn left_bound(&self) -> f64 {
        (**self).left_bound()
    }

    fn right_bound(&self) -> f64 {
        (**self).right_bound()
    }

    fn points(&self) -> Vec<Point> {
        (**self).points()
    }
}

/// Storage variant of a tabulated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Contiguous sample vectors.
    #[default]
    Array,
    /// Circular doubly-linked ring of samples.
    LinkedList,
}

impl StorageKind {
    /// Builds a table of this storage variant from coordinate arrays.
    ///
    /// # Errors
    /// Fails when the arrays differ in length, hold fewer than two samples,
    /// or the x-values are not strictly increasing.
    pub fn create(
        self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> Result<Box<dyn TabulatedFunction>, FunctionError> {
        Ok(match self {
            StorageKind::Array => Box::new(ArrayTabulatedFunction::new(x_values, y_values)?),
            StorageKind::LinkedList => {
                Box::new(LinkedListTabulatedFunction::new(x_values, y_values)?)
            }
        })
    }

    /// Name used in the display header of a table.
    pub fn type_name(self) -> &'static str {
        match self {
            StorageKind::Array => "ArrayTabulatedFunction",
            StorageKind::LinkedList => "LinkedListTabulatedFunction",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Array => write!(f, "array"),
            StorageKind::LinkedList => write!(f, "linked_list"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageKindParseError {
    /// Error when parsing an unknown storage name.
    #[error("Invalid StorageKind: {0}")]
    InvalidValue(String),
}

impl FromStr for StorageKind {
    type Err = StorageKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "array" => Ok(StorageKind::Array),
            "linked_list" | "linkedlist" | "list" => Ok(StorageKind::LinkedList),
            _ => Err(StorageKindParseError::InvalidValue(s.to_string())),
        }
    }
}

impl fmt::Display for dyn TabulatedFunction + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_table(self, f)
    }
}

impl PartialEq for dyn TabulatedFunction + '_ {
    /// Tables are equal when they hold the same samples in the same order,
    /// whatever their storage.
    fn eq(&self, other: &Self) -> bool {
        self.points() == other.points()
    }
}

/// Writes the display form shared by every storage variant: a header line
/// followed by one `[x; y]` line per sample.
pub(crate) fn fmt_table(table: &dyn TabulatedFunction, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} size = {}", table.kind().type_name(), table.count())?;
    for point in table.points() {
        write!(f, "\n{}", point)?;
    }
    Ok(())
}

/// Hashes the bit patterns of every sample, so tables equal under
/// `PartialEq` hash equally unless they hold signed zeros or NaNs.
pub(crate) fn hash_points<H: Hasher>(points: impl Iterator<Item = Point>, state: &mut H) {
    for point in points {
        point.x.to_bits().hash(state);
        point.y.to_bits().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kind() {
        assert_eq!(StorageKind::default(), StorageKind::Array);
    }

    #[test]
    fn test_kind_display_and_parse() {
        for kind in [StorageKind::Array, StorageKind::LinkedList] {
            assert_eq!(kind.to_string().parse::<StorageKind>().unwrap(), kind);
        }
        assert_eq!("LIST".parse::<StorageKind>().unwrap(), StorageKind::LinkedList);
        assert!("tree".parse::<StorageKind>().is_err());
    }

    #[test]
    fn test_kind_create() {
        let table = StorageKind::LinkedList
            .create(&[0.0, 1.0], &[3.0, 4.0])
            .unwrap();
        assert_eq!(table.kind(), StorageKind::LinkedList);
        assert_eq!(table.count(), 2);
        assert_eq!(table.apply(0.5), 3.5);

        assert!(StorageKind::Array.create(&[1.0, 0.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&StorageKind::LinkedList).unwrap(),
            "\"linked_list\""
        );
        let kind: StorageKind = serde_json::from_str("\"array\"").unwrap();
        assert_eq!(kind, StorageKind::Array);
    }

    #[test]
    fn test_display_form() {
        let table = StorageKind::Array
            .create(&[0.0, 1.5], &[2.0, -1.0])
            .unwrap();
        assert_eq!(
            format!("{}", table),
            "ArrayTabulatedFunction size = 2\n[0; 2]\n[1.5; -1]"
        );
    }
}
