//! Worker tasks that operate on a shared synchronized table.
//!
//! Each task holds an [`Arc`] to the decorator and can be moved into its own
//! thread, or several can be run side by side with [`run_concurrently`].

use std::{sync::Arc, thread};

use log::{debug, info};

use super::SynchronizedTabulatedFunction;
use crate::functions::{FunctionError, Point, TabulatedFunction};

/// A unit of work that can run on any thread.
pub trait Task: Send + Sync {
    type Output: Send;

    fn run(&self) -> Self::Output;
}

/// Runs every task on its own scoped thread and collects the outputs in
/// task order.
///
/// A panicking task is re-raised on the calling thread.
pub fn run_concurrently<K: Task>(tasks: &[K]) -> Vec<K::Output> {
    thread::scope(|scope| {
        let handles: Vec<_> = tasks
            .iter()
            .map(|task| scope.spawn(move || task.run()))
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(output) => output,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    })
}

/// Doubles every y-value of the shared table.
///
/// Each read-modify-write runs as one composite operation, so concurrent
/// multiplying tasks never lose an update.
#[derive(Debug)]
pub struct MultiplyingTask<T> {
    function: Arc<SynchronizedTabulatedFunction<T>>,
}

impl<T: TabulatedFunction> MultiplyingTask<T> {
    pub fn new(function: Arc<SynchronizedTabulatedFunction<T>>) -> Self {
        MultiplyingTask { function }
    }
}

impl<T: TabulatedFunction> Task for MultiplyingTask<T> {
    type Output = Result<(), FunctionError>;

    fn run(&self) -> Self::Output {
        let count = self.function.count();
        for index in 0..count {
            self.function.do_synchronously(|table| {
                let y = table.get_y(index)?;
                table.set_y(index, y * 2.0)
            })?;
        }
        info!(
            "{} finished multiplying {} points",
            thread_name(),
            count
        );
        Ok(())
    }
}

/// Sets every y-value of the shared table to a fixed value.
#[derive(Debug)]
pub struct WriteTask<T> {
    function: Arc<SynchronizedTabulatedFunction<T>>,
    value: f64,
}

impl<T: TabulatedFunction> WriteTask<T> {
    pub fn new(function: Arc<SynchronizedTabulatedFunction<T>>, value: f64) -> Self {
        WriteTask { function, value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl<T: TabulatedFunction> Task for WriteTask<T> {
    type Output = Result<(), FunctionError>;

    fn run(&self) -> Self::Output {
        for index in 0..self.function.count() {
            self.function.set_y(index, self.value)?;
            debug!("writing for index {} complete", index);
        }
        info!("{} finished writing {}", thread_name(), self.value);
        Ok(())
    }
}

/// Reads every sample of the shared table, one atomic read per index.
#[derive(Debug)]
pub struct ReadTask<T> {
    function: Arc<SynchronizedTabulatedFunction<T>>,
}

impl<T: TabulatedFunction> ReadTask<T> {
    pub fn new(function: Arc<SynchronizedTabulatedFunction<T>>) -> Self {
        ReadTask { function }
    }
}

impl<T: TabulatedFunction> Task for ReadTask<T> {
    type Output = Result<Vec<Point>, FunctionError>;

    fn run(&self) -> Self::Output {
        let count = self.function.count();
        let mut points = Vec::with_capacity(count);
        for index in 0..count {
            let point = self.function.do_synchronously(|table| {
                Ok::<_, FunctionError>(Point::new(table.get_x(index)?, table.get_y(index)?))
            })?;
            info!("after read: i = {}, x = {}, y = {}", index, point.x, point.y);
            points.push(point);
        }
        Ok(points)
    }
}

fn thread_name() -> String {
    let current = thread::current();
    current
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", current.id()))
}
