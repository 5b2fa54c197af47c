//! Direction inference and the termination test
//!
//! Exclusive and inclusive ranges share one pure function, `stride`, which
//! turns `(from, to, explicit step)` into a stride plus the comparator
//! that decides whether a value is still inside the range.

use super::numeric::Numeric;

/// Which way a range walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Whether the `to` endpoint is visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `[from, to)`
    Exclusive,
    /// `[from, to]`
    Inclusive,
}

/// How a walk moves from one value to the next
///
/// An explicit step is always added as given, sign included. Only an
/// inferred descending walk subtracts, so unsigned types can count down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stride<T> {
    Add(T),
    Sub(T),
}

/// Termination test for one range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparator {
    pub direction: Direction,
    pub bound: Bound,
}

impl Comparator {
    /// True while `value` has not reached (exclusive) or passed (inclusive) `to`
    pub fn admits<T: Numeric>(&self, value: T, to: T) -> bool {
        match (self.direction, self.bound) {
            (Direction::Ascending, Bound::Exclusive) => value < to,
            (Direction::Ascending, Bound::Inclusive) => value <= to,
            (Direction::Descending, Bound::Exclusive) => value > to,
            (Direction::Descending, Bound::Inclusive) => value >= to,
        }
    }
}

impl<T: Numeric> Stride<T> {
    pub fn direction(&self) -> Direction {
        match self {
            Stride::Add(step) if step.is_negative() => Direction::Descending,
            Stride::Add(_) => Direction::Ascending,
            Stride::Sub(_) => Direction::Descending,
        }
    }

    /// Next value in the walk, or `None` when the type would overflow
    pub fn advance(&self, value: T) -> Option<T> {
        match *self {
            Stride::Add(step) => value.checked_add(step),
            Stride::Sub(step) => value.checked_sub(step),
        }
    }
}

/// Infer the stride and comparator for a range
///
/// Returns `None` for a zero explicit step; callers turn that into a usage
/// error before any iteration starts.
///
/// With no explicit step, the direction follows `from`/`to` and equal bounds
/// count as ascending, which gives zero iterations for an exclusive range
/// and exactly one for an inclusive range.
pub fn stride<T: Numeric>(
    from: T,
    to: T,
    step: Option<T>,
    bound: Bound,
) -> Option<(Stride<T>, Comparator)> {
    let stride = match step {
        Some(step) if step.is_zero() => return None,
        Some(step) => Stride::Add(step),
        None if from > to => Stride::Sub(T::one()),
        None => Stride::Add(T::one()),
    };

    let comparator = Comparator {
        direction: stride.direction(),
        bound,
    };

    Some((stride, comparator))
}
