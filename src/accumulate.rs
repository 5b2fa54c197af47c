//! # Scoped accumulation
//!
//! Collect values out of procedural code that otherwise returns nothing.
//! The body receives a `Collector` whose only job is `push`; the pushed
//! values come back, in order, when the body returns.
//!
//! The collector is lent to the body for the duration of the call, so it
//! cannot be kept around afterwards:
//!
//! ```compile_fail
//! use flowkit::accumulate::{collect, Collector};
//!
//! let mut escaped: Option<&mut Collector<i32>> = None;
//! let _ = collect(|c| escaped = Some(c));
//! ```

use tracing::trace;

/// The push capability handed to an accumulation body
#[derive(Debug)]
pub struct Collector<T> {
    items: Vec<T>,
}

impl<T> Collector<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append `item` and hand it back, so a push can sit inside an expression
    pub fn push(&mut self, item: T) -> T
    where
        T: Clone,
    {
        self.items.push(item.clone());
        item
    }

    /// Number of items pushed so far
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Most recently pushed item
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

/// Run `body` and return everything it pushed, in push order
pub fn collect<T>(body: impl FnOnce(&mut Collector<T>)) -> Vec<T> {
    collect_with_capacity(0, body)
}

/// Like `collect`, with the buffer sized up front for `capacity` items
///
/// The buffer still grows past `capacity` as needed.
pub fn collect_with_capacity<T>(capacity: usize, body: impl FnOnce(&mut Collector<T>)) -> Vec<T> {
    let mut collector = Collector::with_capacity(capacity);
    body(&mut collector);
    trace!(count = collector.items.len(), capacity, "accumulation finished");
    collector.items
}

/// Like `collect`, building any container that can be filled from an iterator
pub fn collect_into<C, T>(body: impl FnOnce(&mut Collector<T>)) -> C
where
    C: FromIterator<T>,
{
    collect(body).into_iter().collect()
}
