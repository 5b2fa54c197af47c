//! # Short-circuit binding
//!
//! Evaluate an ordered list of `(name, initializer)` pairs left to right and
//! stop at the first initializer that yields `None`. The rest are never
//! evaluated, whichever visibility mode is used.
//!
//! ## Visibility
//!
//! - **Parallel**: every initializer sees only the scope the construct was
//!   entered with.
//! - **Sequential**: every initializer also sees the names bound before it in
//!   the same list.
//!
//! ## Forms
//!
//! - `when`: run the body with all names bound, or yield `None`.
//! - `if_else`: run `then` with all names bound, or run `otherwise` with the
//!   outer scope only. Names bound before the failure are not visible there.
//!
//! ```
//! use flowkit::binding::{Bindings, Env};
//!
//! let outer = Env::new();
//! let sum = Bindings::sequential()
//!     .bind("a", |_| Some(1))
//!     .bind("b", |env| env.get("a").map(|a| a + 1))
//!     .when(&outer, |env| env.get("a").unwrap() + env.get("b").unwrap())?;
//! assert_eq!(sum, Some(3));
//! # Ok::<(), flowkit::UsageError>(())
//! ```

pub mod env;
pub mod lookup;


use std::collections::HashSet;

use tracing::trace;

use crate::error::UsageError;
pub use env::Env;
pub use lookup::{if_found, if_found_in, when_found, when_found_in, LookupResult, Table};

/// Which names an initializer can see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Parallel,
    Sequential,
}

type Init<'f, V> = Box<dyn FnOnce(&Env<'_, V>) -> Option<V> + 'f>;

/// An ordered list of deferred bindings
pub struct Bindings<'f, V> {
    visibility: Visibility,
    entries: Vec<(String, Init<'f, V>)>,
}

impl<'f, V> Bindings<'f, V> {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            entries: Vec::new(),
        }
    }

    /// Initializers see only the enclosing scope
    pub fn parallel() -> Self {
        Self::new(Visibility::Parallel)
    }

    /// Initializers also see earlier names of the same list
    pub fn sequential() -> Self {
        Self::new(Visibility::Sequential)
    }

    /// Append a binding; `init` runs only if every earlier one succeeded
    pub fn bind(
        mut self,
        name: impl Into<String>,
        init: impl FnOnce(&Env<'_, V>) -> Option<V> + 'f,
    ) -> Self {
        self.entries.push((name.into(), Box::new(init)));
        self
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `body` with every name bound, or return `None` on short-circuit
    ///
    /// Fails without evaluating anything if a name appears twice.
    pub fn when<R>(
        self,
        outer: &Env<'_, V>,
        body: impl FnOnce(&Env<'_, V>) -> R,
    ) -> Result<Option<R>, UsageError> {
        Ok(self.establish(outer)?.map(|inner| body(&inner)))
    }

    /// Run `then` with every name bound, or `otherwise` with none of them
    pub fn if_else<R>(
        self,
        outer: &Env<'_, V>,
        then: impl FnOnce(&Env<'_, V>) -> R,
        otherwise: impl FnOnce(&Env<'_, V>) -> R,
    ) -> Result<R, UsageError> {
        match self.establish(outer)? {
            Some(inner) => Ok(then(&inner)),
            None => Ok(otherwise(outer)),
        }
    }

    fn validate(&self) -> Result<(), UsageError> {
        let mut seen = HashSet::new();
        for (name, _) in &self.entries {
            if !seen.insert(name.as_str()) {
                return Err(UsageError::DuplicateBinding { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Evaluate initializers in order, building the inner scope
    fn establish<'o>(self, outer: &'o Env<'_, V>) -> Result<Option<Env<'o, V>>, UsageError> {
        self.validate()?;
        if self.is_empty() {
            return Ok(Some(outer.child()));
        }

        trace!(count = self.len(), visibility = ?self.visibility(), "establishing bindings");
        let visibility = self.visibility;
        let mut inner = outer.child();
        for (idx, (name, init)) in self.entries.into_iter().enumerate() {
            let value = match visibility {
                Visibility::Parallel => init(outer),
                Visibility::Sequential => init(&inner),
            };
            match value {
                Some(v) => inner.insert(name, v),
                None => {
                    trace!(name = %name, position = idx, "binding short-circuited");
                    return Ok(None);
                }
            }
        }

        Ok(Some(inner))
    }
}

impl<V> std::fmt::Debug for Bindings<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.entries.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("Bindings")
            .field("visibility", &self.visibility)
            .field("names", &names)
            .finish()
    }
}
