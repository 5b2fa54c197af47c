//! Dynamic value type
//!
//! `Val` is the value callers use when bindings, lookups or records are
//! dynamically typed (decoded JSON records, CLI output, mixed environments).
//! The combinators themselves are generic and never require it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Val {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<Val>),
    Obj(BTreeMap<String, Val>),
}

impl Val {
    /// Check if value is truthy (`Null` and `false` are not)
    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Bool(b) => *b,
            Val::Null => false,
            _ => true,
        }
    }

    /// Convert a possibly-falsy value into an explicit presence
    ///
    /// This is the bridge from falsy conventions to the binders: a falsy
    /// value becomes `None`, which the short-circuit binder treats as empty.
    pub fn present(self) -> Option<Val> {
        if self.is_truthy() {
            Some(self)
        } else {
            None
        }
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Num(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Str(s.to_string())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::Str(s)
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Null => write!(f, "null"),
            Val::Bool(b) => write!(f, "{}", b),
            Val::Num(n) => write!(f, "{}", n),
            Val::Str(s) => write!(f, "{}", s),
            other => match serde_json::to_string(other) {
                Ok(json) => write!(f, "{}", json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Val::Null.is_truthy());
        assert!(!Val::Bool(false).is_truthy());
        assert!(Val::Bool(true).is_truthy());
        assert!(Val::Num(0.0).is_truthy());
        assert!(Val::Str(String::new()).is_truthy());
    }

    #[test]
    fn test_present_drops_falsy_values() {
        assert_eq!(Val::Null.present(), None);
        assert_eq!(Val::Bool(false).present(), None);
        assert_eq!(Val::Num(0.0).present(), Some(Val::Num(0.0)));
    }

    #[test]
    fn test_untagged_json_shape() {
        let val: Val = serde_json::from_str(r#"{"a": [1, true, null, "x"]}"#).unwrap();
        let Val::Obj(obj) = &val else {
            unreachable!("Expected object, got {:?}", val);
        };
        assert_eq!(
            obj.get("a"),
            Some(&Val::List(vec![
                Val::Num(1.0),
                Val::Bool(true),
                Val::Null,
                Val::Str("x".into())
            ]))
        );
        assert_eq!(val.to_string(), r#"{"a":[1.0,true,null,"x"]}"#);
    }
}
