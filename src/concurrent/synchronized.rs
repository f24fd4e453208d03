use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr,
    sync::{Arc, Mutex, PoisonError},
};

use log::trace;

use crate::functions::{FunctionError, MathFunction, Point, StorageKind, TabulatedFunction};

/// Thread-safe decorator around a tabulated function.
///
/// Every call locks the decorator's mutex, forwards to the wrapped table and
/// releases the lock, so calls made through one decorator never interleave.
/// Several decorators can additionally be coordinated through one shared
/// lock, see [`with_mutex`](Self::with_mutex): the shared lock is always
/// taken before the decorator's own.
///
/// The shared lock is not reentrant. An operation passed to
/// [`do_synchronously`](Self::do_synchronously) must not call into another
/// decorator holding the same shared lock.
///
/// # Examples
/// ```rust
/// use std::{sync::Arc, thread};
///
/// use tabfn::{
///     concurrent::SynchronizedTabulatedFunction,
///     functions::{ArrayTabulatedFunction, TabulatedFunction},
/// };
///
/// let table = ArrayTabulatedFunction::new(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
/// let shared = Arc::new(SynchronizedTabulatedFunction::new(table));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let shared = Arc::clone(&shared);
///         thread::spawn(move || {
///             shared.do_synchronously(|t| {
///                 let y = t.get_y(0)?;
///                 t.set_y(0, y + 1.0)
///             })
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap().unwrap();
/// }
///
/// assert_eq!(shared.get_y(0).unwrap(), 5.0);
/// ```
#[derive(Debug)]
pub struct SynchronizedTabulatedFunction<T> {
    delegate: Mutex<T>,
    shared: Option<Arc<Mutex<()>>>,
}

impl<T: TabulatedFunction> SynchronizedTabulatedFunction<T> {
    /// Wraps `delegate` behind its own lock.
    pub fn new(delegate: T) -> Self {
        SynchronizedTabulatedFunction {
            delegate: Mutex::new(delegate),
            shared: None,
        }
    }

    /// Wraps `delegate` and additionally serialises every call on `mutex`,
    /// which may be shared with other decorators.
    pub fn with_mutex(delegate: T, mutex: Arc<Mutex<()>>) -> Self {
        SynchronizedTabulatedFunction {
            delegate: Mutex::new(delegate),
            shared: Some(mutex),
        }
    }

    /// The shared lock supplied at construction, if any.
    pub fn mutex(&self) -> Option<&Arc<Mutex<()>>> {
        self.shared.as_ref()
    }

    /// Runs `operation` on the wrapped table under a single lock
    /// acquisition, making a multi-step read-modify-write atomic.
    pub fn do_synchronously<R>(&self, operation: impl FnOnce(&mut T) -> R) -> R {
        // Poisoning is ignored: every mutation of a table is a single store.
        let _shared = self
            .shared
            .as_ref()
            .map(|mutex| mutex.lock().unwrap_or_else(PoisonError::into_inner));
        let mut delegate = self
            .delegate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        operation(&mut delegate)
    }

    /// Replaces the y-value at `index` through a shared reference.
    pub fn set_y(&self, index: usize, value: f64) -> Result<(), FunctionError> {
        self.do_synchronously(|table| table.set_y(index, value))
    }

    /// Returns an iterator over a snapshot of the samples taken now.
    ///
    /// Later writes through the decorator are not visible to the iterator.
    pub fn iter(&self) -> SnapshotIter {
        let points = self.points();
        trace!("captured snapshot of {} points", points.len());
        SnapshotIter::new(points)
    }

    /// Unwraps the decorator, returning the table.
    pub fn into_inner(self) -> T {
        self.delegate
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: TabulatedFunction> MathFunction for SynchronizedTabulatedFunction<T> {
    fn apply(&self, x: f64) -> f64 {
        self.do_synchronously(|table| table.apply(x))
    }
}

impl<T: TabulatedFunction> TabulatedFunction for SynchronizedTabulatedFunction<T> {
    fn kind(&self) -> StorageKind {
        self.do_synchronously(|table| table.kind())
    }

    fn count(&self) -> usize {
        self.do_synchronously(|table| table.count())
    }

    fn get_x(&self, index: usize) -> Result<f64, FunctionError> {
        self.do_synchronously(|table| table.get_x(index))
    }

    fn get_y(&self, index: usize) -> Result<f64, FunctionError> {
        self.do_synchronously(|table| table.get_y(index))
    }

    fn set_y(&mut self, index: usize, value: f64) -> Result<(), FunctionError> {
        self.do_synchronously(|table| table.set_y(index, value))
    }

    fn index_of_x(&self, x: f64) -> Option<usize> {
        self.do_synchronously(|table| table.index_of_x(x))
    }

    fn index_of_y(&self, y: f64) -> Option<usize> {
        self.do_synchronously(|table| table.index_of_y(y))
    }

    fn left_bound(&self) -> f64 {
        self.do_synchronously(|table| table.left_bound())
    }

    fn right_bound(&self) -> f64 {
        self.do_synchronously(|table| table.right_bound())
    }

    fn points(&self) -> Vec<Point> {
        self.do_synchronously(|table| table.points())
    }
}

impl<T: TabulatedFunction> PartialEq for SynchronizedTabulatedFunction<T> {
    fn eq(&self, other: &Self) -> bool {
        if ptr::eq(self, other) {
            return true;
        }
        // Snapshot first so the two locks are never held together.
        let theirs = other.points();
        self.do_synchronously(|table| table.points() == theirs)
    }
}

impl<T: TabulatedFunction + Hash> Hash for SynchronizedTabulatedFunction<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.do_synchronously(|table| table.hash(state));
    }
}

impl<T: TabulatedFunction + fmt::Display> fmt::Display for SynchronizedTabulatedFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.do_synchronously(|table| fmt::Display::fmt(&*table, f))
    }
}

impl<'a, T: TabulatedFunction> IntoIterator for &'a SynchronizedTabulatedFunction<T> {
    type Item = Point;
    type IntoIter = SnapshotIter;

    fn into_iter(self) -> SnapshotIter {
        self.iter()
    }
}

/// Iterator over a point snapshot captured by
/// [`SynchronizedTabulatedFunction::iter`].
///
/// Finite and not restartable. It never locks: the snapshot is owned and
/// immutable.
#[derive(Debug, Clone)]
pub struct SnapshotIter {
    points: Vec<Point>,
    position: usize,
}

impl SnapshotIter {
    fn new(points: Vec<Point>) -> Self {
        SnapshotIter {
            points,
            position: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.position < self.points.len()
    }

    /// Like [`Iterator::next`] but reports exhaustion as an error.
    pub fn try_next(&mut self) -> Result<Point, FunctionError> {
        let point = self
            .points
            .get(self.position)
            .copied()
            .ok_or(FunctionError::ExhaustedIterator)?;
        self.position += 1;
        Ok(point)
    }

    /// Samples cannot be removed from a tabulated function.
    pub fn remove(&mut self) -> Result<(), FunctionError> {
        Err(FunctionError::UnsupportedOperation(
            "removing points through a snapshot iterator",
        ))
    }
}

impl Iterator for SnapshotIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        self.try_next().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SnapshotIter {}
