//! Layered name scopes
//!
//! An `Env` owns the names bound at one level and borrows its parent, so a
//! nested scope never copies what is already visible outside it. Dropping a
//! child scope is all it takes to make its names disappear again.

use std::collections::HashMap;

/// A scope of named values with read-through to its parent
#[derive(Debug)]
pub struct Env<'p, V> {
    parent: Option<&'p Env<'p, V>>,
    vars: HashMap<String, V>,
}

impl<V> Default for Env<'_, V> {
    fn default() -> Self {
        Self {
            parent: None,
            vars: HashMap::new(),
        }
    }
}

impl<'p, V> Env<'p, V> {
    /// Empty root scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Root scope seeded with existing bindings
    pub fn from_map(vars: HashMap<String, V>) -> Self {
        Self { parent: None, vars }
    }

    /// Empty scope nested inside this one
    pub fn child(&self) -> Env<'_, V> {
        Env {
            parent: Some(self),
            vars: HashMap::new(),
        }
    }

    /// Bind `name` at this level, shadowing any outer binding
    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        self.vars.insert(name.into(), value);
    }

    /// Innermost value bound to `name`
    pub fn get(&self, name: &str) -> Option<&V> {
        match self.vars.get(name) {
            Some(v) => Some(v),
            None => self.parent.and_then(|p| p.get(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names bound at this level only
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Number of scopes between this one and the root
    pub fn depth(&self) -> usize {
        self.parent.map_or(0, |p| p.depth() + 1)
    }
}

impl<'p, V> From<HashMap<String, V>> for Env<'p, V> {
    fn from(vars: HashMap<String, V>) -> Self {
        Self::from_map(vars)
    }
}
