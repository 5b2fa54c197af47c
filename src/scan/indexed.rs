//! Forward scan over a window of an indexable sequence

use std::ops::ControlFlow;

use crate::error::UsageError;

/// A read-only walk over `[start, end)` of a slice
#[derive(Debug, Clone, Copy)]
pub struct Indexed<'s, T> {
    items: &'s [T],
    start: usize,
    end: Option<usize>,
}

impl<'s, T> Indexed<'s, T> {
    /// Scan the whole sequence by default
    pub fn new<S>(seq: &'s S) -> Self
    where
        S: AsRef<[T]> + ?Sized,
    {
        Self {
            items: seq.as_ref(),
            start: 0,
            end: None,
        }
    }

    /// First index visited
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// One past the last index visited
    pub fn end(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    fn bounds(&self) -> Result<(usize, usize), UsageError> {
        let len = self.items.len();
        let end = self.end.unwrap_or(len);
        if self.start > end || end > len {
            return Err(UsageError::BadBounds {
                start: self.start,
                end,
                len,
            });
        }
        Ok((self.start, end))
    }

    /// Run `body` with `(index, value)` for every position in the window
    pub fn each(&self, mut body: impl FnMut(usize, &'s T)) -> Result<(), UsageError> {
        self.try_each(|idx, value| {
            body(idx, value);
            ControlFlow::<()>::Continue(())
        })?;
        Ok(())
    }

    /// Run `body` until it breaks; the break value is returned
    pub fn try_each<B>(
        &self,
        mut body: impl FnMut(usize, &'s T) -> ControlFlow<B>,
    ) -> Result<Option<B>, UsageError> {
        let (start, end) = self.bounds()?;
        for (idx, value) in self.items[start..end].iter().enumerate() {
            if let ControlFlow::Break(b) = body(start + idx, value) {
                return Ok(Some(b));
            }
        }
        Ok(None)
    }
}
