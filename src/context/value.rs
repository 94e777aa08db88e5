// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A scalar that can be attached to a log event.
///
/// Anything that is not one of these kinds is converted to its textual form
/// before it enters the context (see [`crate::pluck::Traverse::loggable`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Flat key/value mapping carried by the context store and by log events.
pub type ContextMap = HashMap<String, ContextValue>;

impl ContextValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ContextValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ContextValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Null => write!(f, "null"),
            ContextValue::Bool(b) => write!(f, "{}", b),
            ContextValue::Int(i) => write!(f, "{}", i),
            ContextValue::Float(x) => write!(f, "{}", x),
            ContextValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Str(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Str(value)
    }
}

impl From<&String> for ContextValue {
    fn from(value: &String) -> Self {
        ContextValue::Str(value.clone())
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

impl From<f32> for ContextValue {
    fn from(value: f32) -> Self {
        ContextValue::Float(value as f64)
    }
}

macro_rules! lossless_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ContextValue {
                fn from(value: $t) -> Self {
                    ContextValue::Int(value as i64)
                }
            }
        )*
    };
}

lossless_int!(i8, i16, i32, i64, u8, u16, u32);

// Out-of-range unsigned values keep their exact digits as text.
impl From<u64> for ContextValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(ContextValue::Int)
            .unwrap_or_else(|_| ContextValue::Str(value.to_string()))
    }
}

impl From<usize> for ContextValue {
    fn from(value: usize) -> Self {
        ContextValue::from(value as u64)
    }
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ContextValue::Null)
    }
}

/// Build a [`ContextMap`] from `key => value` pairs.
///
/// ```
/// use woodchipper::context_map;
///
/// let map = context_map! { "vendor" => "ACME", "retries" => 3 };
/// assert_eq!(map.len(), 2);
/// ```
#[macro_export]
macro_rules! context_map {
    () => {
        $crate::context::ContextMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::context::ContextMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::context::ContextValue::from($value));
        )+
        map
    }};
}
