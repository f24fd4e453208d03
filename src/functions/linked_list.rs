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

#[derive(Debug, Clone)]
struct Node {
    x: f64,
    y: f64,
    prev: usize,
    next: usize,
}

/// Tabulated function stored as a circular doubly-linked ring of samples.
///
/// Nodes live in an arena and link to each other by slot; the head is the
/// sample with the smallest x and its predecessor is the last sample. Index
/// lookup walks from whichever end is nearer, and interval lookup walks
/// from the head.
#[derive(Debug, Clone)]
pub struct LinkedListTabulatedFunction {
    nodes: Vec<Node>,
    head: usize,
}

impl LinkedListTabulatedFunction {
    /// Creates a table from the coordinate arrays, appending one node per
    /// sample.
    ///
    /// # Errors
    /// - `DifferentLength` if the arrays differ in length.
    /// - `TooFewPoints` if fewer than two samples are given.
    /// - `NotStrictlyIncreasing` if the x-values are not strictly increasing.
    pub fn new(x_values: &[f64], y_values: &[f64]) -> Result<Self, FunctionError> {
        validation::validate_table(x_values, y_values)?;

        let mut table = Self::with_capacity(x_values.len());
        for (&x, &y) in x_values.iter().zip(y_values) {
            table.add_node(x, y);
        }

        debug!(
            "LinkedListTabulatedFunction created with {} points",
            table.count()
        );
        Ok(table)
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

        let mut table = Self::with_capacity(count);
        for x in x_values {
            table.add_node(x, source.apply(x));
        }

        debug!(
            "LinkedListTabulatedFunction sampled over [{}, {}] with {} points",
            from, to, count
        );
        Ok(table)
    }

    fn with_capacity(capacity: usize) -> Self {
        LinkedListTabulatedFunction {
            nodes: Vec::with_capacity(capacity),
            head: 0,
        }
    }

    /// Appends a node between the current tail and the head.
    fn add_node(&mut self, x: f64, y: f64) {
        let slot = self.nodes.len();
        if self.nodes.is_empty() {
            self.nodes.push(Node {
                x,
                y,
                prev: slot,
                next: slot,
            });
            self.head = slot;
            return;
        }

        let tail = self.nodes[self.head].prev;
        self.nodes.push(Node {
            x,
            y,
            prev: tail,
            next: self.head,
        });
        self.nodes[tail].next = slot;
        let head = self.head;
        self.nodes[head].prev = slot;
    }

    /// Arena slot of the node at `index`, walking from the nearer end.
    fn slot_of(&self, index: usize) -> usize {
        let count = self.count();
        if index < count / 2 {
            let mut slot = self.head;
            for _ in 0..index {
                slot = self.nodes[slot].next;
            }
            slot
        } else {
            let mut slot = self.tail();
            for _ in index..count - 1 {
                slot = self.nodes[slot].prev;
            }
            slot
        }
    }

    fn node(&self, index: usize) -> Result<&Node, FunctionError> {
        validation::validate_index(index, self.count())?;
        Ok(&self.nodes[self.slot_of(index)])
    }

    fn tail(&self) -> usize {
        self.nodes[self.head].prev
    }

    /// Iterates over the samples from the head around the ring.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            slot: self.head,
            remaining: self.count(),
        }
    }

    /// Walks the ring from the head, yielding `(index, node)` pairs.
    fn walk(&self) -> impl Iterator<Item = (usize, &Node)> + '_ {
        let mut slot = self.head;
        (0..self.count()).map(move |i| {
            let node = &self.nodes[slot];
            slot = node.next;
            (i, node)
        })
    }

    fn segment(&self, left_slot: usize) -> (&Node, &Node) {
        let left = &self.nodes[left_slot];
        (left, &self.nodes[left.next])
    }
}

/// Iterator over the samples of a [`LinkedListTabulatedFunction`].
pub struct Iter<'a> {
    table: &'a LinkedListTabulatedFunction,
    slot: usize,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.table.nodes[self.slot];
        self.slot = node.next;
        self.remaining -= 1;
        Some(Point::new(node.x, node.y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl MathFunction for LinkedListTabulatedFunction {
    fn apply(&self, x: f64) -> f64 {
        interpolation::evaluate(self, x)
    }
}

impl TabulatedFunction for LinkedListTabulatedFunction {
    fn kind(&self) -> StorageKind {
        StorageKind::LinkedList
    }

    fn count(&self) -> usize {
        self.nodes.len()
    }

    fn get_x(&self, index: usize) -> Result<f64, FunctionError> {
        Ok(self.node(index)?.x)
    }

    fn get_y(&self, index: usize) -> Result<f64, FunctionError> {
        Ok(self.node(index)?.y)
    }

    fn set_y(&mut self, index: usize, value: f64) -> Result<(), FunctionError> {
        validation::validate_index(index, self.count())?;
        let slot = self.slot_of(index);
        self.nodes[slot].y = value;
        Ok(())
    }

    fn index_of_x(&self, x: f64) -> Option<usize> {
        self.walk().find(|(_, node)| node.x == x).map(|(i, _)| i)
    }

    fn index_of_y(&self, y: f64) -> Option<usize> {
        self.walk().find(|(_, node)| node.y == y).map(|(i, _)| i)
    }

    fn left_bound(&self) -> f64 {
        self.nodes[self.head].x
    }

    fn right_bound(&self) -> f64 {
        self.nodes[self.tail()].x
    }

    fn points(&self) -> Vec<Point> {
        self.iter().collect()
    }
}

impl Interpolation for LinkedListTabulatedFunction {
    fn floor_index_of_x(&self, x: f64) -> usize {
        let count = self.count();
        if x < self.left_bound() {
            return 0;
        }
        if x > self.right_bound() {
            return count;
        }

        let mut slot = self.head;
        for i in 0..count - 1 {
            let (left, right) = self.segment(slot);
            if left.x <= x && x < right.x {
                return i;
            }
            slot = left.next;
        }

        // x sits on the last sample
        count.saturating_sub(2)
    }

    fn extrapolate_left(&self, x: f64) -> f64 {
        let (first, second) = self.segment(self.head);
        if self.count() == 1 {
            return first.y;
        }
        interpolation::interpolate(x, first.x, second.x, first.y, second.y)
    }

    fn extrapolate_right(&self, x: f64) -> f64 {
        let last = &self.nodes[self.tail()];
        if self.count() == 1 {
            return last.y;
        }
        let before_last = &self.nodes[last.prev];
        interpolation::interpolate(x, before_last.x, last.x, before_last.y, last.y)
    }

    fn interpolate_at(&self, x: f64, floor_index: usize) -> f64 {
        if self.count() == 1 {
            return self.nodes[self.head].y;
        }
        let index = floor_index.min(self.count() - 2);
        let (left, right) = self.segment(self.slot_of(index));
        interpolation::interpolate(x, left.x, right.x, left.y, right.y)
    }

    fn y_at(&self, index: usize) -> f64 {
        self.nodes[self.slot_of(index)].y
    }
}

impl PartialEq for LinkedListTabulatedFunction {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count() && self.iter().eq(other.iter())
    }
}

impl Hash for LinkedListTabulatedFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.count().hash(state);
        tabulated::hash_points(self.iter(), state);
    }
}

impl fmt::Display for LinkedListTabulatedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        tabulated::fmt_table(self, f)
    }
}
