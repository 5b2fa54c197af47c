//! Branching on an explicit found flag
//!
//! Lookups report `(value, found)`. Only `found` decides the branch, so a
//! stored `false`, `0` or empty string still takes the found path.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use super::env::Env;

/// Outcome of a lookup; a missing entry carries no value at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult<V> {
    Found(V),
    Missing,
}

impl<V> LookupResult<V> {
    pub fn found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    pub fn into_option(self) -> Option<V> {
        match self {
            LookupResult::Found(v) => Some(v),
            LookupResult::Missing => None,
        }
    }
}

/// `(value, found)`; the value is dropped unread when `found` is false
impl<V> From<(V, bool)> for LookupResult<V> {
    fn from((value, found): (V, bool)) -> Self {
        if found {
            LookupResult::Found(value)
        } else {
            LookupResult::Missing
        }
    }
}

impl<V> From<Option<V>> for LookupResult<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => LookupResult::Found(v),
            None => LookupResult::Missing,
        }
    }
}

/* ===================== Lookup Sources ===================== */

/// Anything that can answer a keyed lookup with a found flag
pub trait Table<Q: ?Sized> {
    type Value;

    fn lookup(&self, key: &Q) -> LookupResult<&Self::Value>;
}

impl<K, V, Q, S> Table<Q> for HashMap<K, V, S>
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Value = V;

    fn lookup(&self, key: &Q) -> LookupResult<&V> {
        self.get(key).into()
    }
}

impl<K, V, Q> Table<Q> for BTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Value = V;

    fn lookup(&self, key: &Q) -> LookupResult<&V> {
        self.get(key).into()
    }
}

impl<V> Table<str> for Env<'_, V> {
    type Value = V;

    fn lookup(&self, key: &str) -> LookupResult<&V> {
        self.get(key).into()
    }
}

/* ===================== Combinators ===================== */

/// Run `body` with the value if it was found, else yield `None`
pub fn when_found<V, R>(
    lookup: impl Into<LookupResult<V>>,
    body: impl FnOnce(V) -> R,
) -> Option<R> {
    lookup.into().into_option().map(body)
}

/// Run `then` with the value if it was found, else `otherwise` without one
pub fn if_found<V, R>(
    lookup: impl Into<LookupResult<V>>,
    then: impl FnOnce(V) -> R,
    otherwise: impl FnOnce() -> R,
) -> R {
    match lookup.into() {
        LookupResult::Found(v) => then(v),
        LookupResult::Missing => otherwise(),
    }
}

/// `when_found` that binds the value to `var` in a child of `outer`
pub fn when_found_in<V, R>(
    outer: &Env<'_, V>,
    var: &str,
    lookup: impl Into<LookupResult<V>>,
    body: impl FnOnce(&Env<'_, V>) -> R,
) -> Option<R> {
    when_found(lookup, |v| {
        let mut inner = outer.child();
        inner.insert(var, v);
        body(&inner)
    })
}

/// `if_found` that binds the value to `var` for `then` only
pub fn if_found_in<V, R>(
    outer: &Env<'_, V>,
    var: &str,
    lookup: impl Into<LookupResult<V>>,
    then: impl FnOnce(&Env<'_, V>) -> R,
    otherwise: impl FnOnce(&Env<'_, V>) -> R,
) -> R {
    match lookup.into() {
        LookupResult::Found(v) => {
            let mut inner = outer.child();
            inner.insert(var, v);
            then(&inner)
        }
        LookupResult::Missing => otherwise(outer),
    }
}
