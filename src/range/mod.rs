//! # Range iteration
//!
//! Directional numeric loops with step inference and nesting.
//!
//! A `Range` declares one loop variable. A `Nest` validates an ordered list
//! of ranges up front and then drives them as a classic nested loop: the
//! first range is the outermost, the last range completes fully for every
//! combination of outer values.
//!
//! ```
//! use flowkit::range::{Nest, Range};
//!
//! let nest = Nest::new(vec![
//!     Range::exclusive("i", 0, 2),
//!     Range::exclusive("j", 0, 2),
//! ])?;
//!
//! let mut seen = vec![];
//! nest.for_each(|p| seen.push((p["i"], p["j"])));
//! assert_eq!(seen, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
//! # Ok::<(), flowkit::UsageError>(())
//! ```

pub mod numeric;
pub mod stride;


use std::collections::HashSet;
use std::ops::{ControlFlow, Index};

use tracing::debug;

use crate::error::UsageError;
pub use numeric::Numeric;
pub use stride::{stride, Bound, Comparator, Direction, Stride};

/* ===================== Declarations ===================== */

/// One loop variable: bounds, optional explicit step, and endpoint handling
#[derive(Debug, Clone, PartialEq)]
pub struct Range<T> {
    pub name: String,
    pub from: T,
    pub to: T,
    pub step: Option<T>,
    pub bound: Bound,
}

impl<T: Numeric> Range<T> {
    /// Half-open range `[from, to)`
    pub fn exclusive(name: impl Into<String>, from: T, to: T) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            step: None,
            bound: Bound::Exclusive,
        }
    }

    /// Closed range `[from, to]`
    pub fn inclusive(name: impl Into<String>, from: T, to: T) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            step: None,
            bound: Bound::Inclusive,
        }
    }

    /// Set an explicit step; its sign fixes the direction
    pub fn step(mut self, step: T) -> Self {
        self.step = Some(step);
        self
    }

    /// All values this range visits, in order
    pub fn values(&self) -> Result<Vec<T>, UsageError> {
        Ok(Plan::new(self)?.walk().collect())
    }
}

/* ===================== Plans ===================== */

/// A validated range with its stride and comparator resolved
#[derive(Debug, Clone)]
struct Plan<T> {
    from: T,
    to: T,
    stride: Stride<T>,
    comparator: Comparator,
}

impl<T: Numeric> Plan<T> {
    fn new(range: &Range<T>) -> Result<Self, UsageError> {
        let finite = range.from.is_finite()
            && range.to.is_finite()
            && range.step.map_or(true, Numeric::is_finite);
        if !finite {
            return Err(UsageError::NonFinite {
                name: range.name.clone(),
            });
        }

        let (stride, comparator) = stride(range.from, range.to, range.step, range.bound)
            .ok_or_else(|| UsageError::ZeroStep {
                name: range.name.clone(),
            })?;

        Ok(Self {
            from: range.from,
            to: range.to,
            stride,
            comparator,
        })
    }

    fn walk(&self) -> Walk<T> {
        Walk {
            next: Some(self.from),
            to: self.to,
            stride: self.stride,
            comparator: self.comparator,
        }
    }
}

/// Iterator over the values of one plan
struct Walk<T> {
    next: Option<T>,
    to: T,
    stride: Stride<T>,
    comparator: Comparator,
}

impl<T: Numeric> Iterator for Walk<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.next.filter(|v| self.comparator.admits(*v, self.to))?;
        // Overflow means the next value would have passed `to` anyway. A float
        // step below the spacing at `current` makes no progress and ends it too.
        self.next = self.stride.advance(current).filter(|v| *v != current);
        Some(current)
    }
}

/* ===================== Nest ===================== */

/// A validated, ordered list of ranges iterated outer-to-inner
#[derive(Debug, Clone)]
pub struct Nest<T> {
    names: Vec<String>,
    plans: Vec<Plan<T>>,
}

impl<T: Numeric> Nest<T> {
    /// Validate every range before anything runs
    ///
    /// Fails on an empty list, a duplicated name, a zero step, or a
    /// non-finite float bound or step.
    pub fn new(ranges: Vec<Range<T>>) -> Result<Self, UsageError> {
        if ranges.is_empty() {
            return Err(UsageError::EmptyRangeList);
        }

        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(ranges.len());
        let mut plans = Vec::with_capacity(ranges.len());
        for range in &ranges {
            if !seen.insert(range.name.as_str()) {
                return Err(UsageError::DuplicateBinding {
                    name: range.name.clone(),
                });
            }
            plans.push(Plan::new(range)?);
            names.push(range.name.clone());
        }

        Ok(Self { names, plans })
    }

    /// Loop variable names, outermost first
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Run `body` once per combination of values
    pub fn for_each(&self, mut body: impl FnMut(&Point<'_, T>)) {
        let _ = self.try_for_each(|point| {
            body(point);
            ControlFlow::<()>::Continue(())
        });
    }

    /// Run `body` once per combination until it breaks
    ///
    /// A `ControlFlow::Break` from the body stops every level of the nest
    /// and is returned as is.
    pub fn try_for_each<B>(
        &self,
        mut body: impl FnMut(&Point<'_, T>) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        let depth = self.plans.len();
        debug!(depth, names = ?self.names, "iterating range nest");

        let mut walks: Vec<Walk<T>> = Vec::with_capacity(depth);
        let mut values: Vec<T> = Vec::with_capacity(depth);

        loop {
            // Descend, starting a fresh walk for each inner level
            let mut complete = true;
            while walks.len() < depth {
                let mut walk = self.plans[walks.len()].walk();
                match walk.next() {
                    Some(v) => {
                        values.push(v);
                        walks.push(walk);
                    }
                    None => {
                        complete = false;
                        break;
                    }
                }
            }

            if complete {
                let point = Point {
                    names: &self.names,
                    values: &values,
                };
                body(&point)?;
            }

            // Advance the innermost level that still has values
            loop {
                let Some(walk) = walks.last_mut() else {
                    return ControlFlow::Continue(());
                };
                match walk.next() {
                    Some(v) => {
                        let last = values.len() - 1;
                        values[last] = v;
                        break;
                    }
                    None => {
                        walks.pop();
                        values.pop();
                    }
                }
            }
        }
    }
}

/* ===================== Points ===================== */

/// The current value of every loop variable in a nest
#[derive(Debug, Clone, Copy)]
pub struct Point<'a, T> {
    names: &'a [String],
    values: &'a [T],
}

impl<'a, T: Copy> Point<'a, T> {
    /// Value of the named loop variable
    pub fn get(&self, name: &str) -> Option<T> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    /// Values in declaration order, outermost first
    pub fn values(&self) -> &'a [T] {
        self.values
    }

    pub fn names(&self) -> &'a [String] {
        self.names
    }
}

impl<'a, T> Index<usize> for Point<'a, T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.values[idx]
    }
}

impl<'a, T> Index<&str> for Point<'a, T> {
    type Output = T;

    /// Panics if `name` is not a loop variable of the nest
    fn index(&self, name: &str) -> &T {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => &self.values[idx],
            None => panic!("no loop variable named '{}'", name),
        }
    }
}

/* ===================== Shorthands ===================== */

/// `(name, from, to, optional step)`
pub type RangeDecl<'n, T> = (&'n str, T, T, Option<T>);

fn build<T: Numeric>(decls: &[RangeDecl<'_, T>], bound: Bound) -> Result<Nest<T>, UsageError> {
    let ranges = decls
        .iter()
        .map(|&(name, from, to, step)| Range {
            name: name.to_string(),
            from,
            to,
            step,
            bound,
        })
        .collect();
    Nest::new(ranges)
}

/// Nested half-open loops over `[from, to)`
pub fn each_exclusive<T: Numeric>(
    decls: &[RangeDecl<'_, T>],
    body: impl FnMut(&Point<'_, T>),
) -> Result<(), UsageError> {
    build(decls, Bound::Exclusive)?.for_each(body);
    Ok(())
}

/// Nested closed loops over `[from, to]`
pub fn each_inclusive<T: Numeric>(
    decls: &[RangeDecl<'_, T>],
    body: impl FnMut(&Point<'_, T>),
) -> Result<(), UsageError> {
    build(decls, Bound::Inclusive)?.for_each(body);
    Ok(())
}
