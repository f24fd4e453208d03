//! # Concurrency
//!
//! Tabulated functions carry no synchronisation of their own. Wrap one in a
//! [`SynchronizedTabulatedFunction`] and share it through an
//! [`Arc`](std::sync::Arc) to read and write it from several threads.

pub mod synchronized;
pub mod tasks;

pub use synchronized::{SnapshotIter, SynchronizedTabulatedFunction};
pub use tasks::{MultiplyingTask, ReadTask, Task, WriteTask, run_concurrently};
