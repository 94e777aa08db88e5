// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dig into nested values by a delimited path.
//!
//! Each segment is looked up as an attribute first and as a mapping key second.
//! A segment that resolves neither way ends the walk with [`Plucked::Missing`];
//! resolution never fails. Sequences are not indexable.

mod traverse;

pub use traverse::{Namespace, Traverse};

use std::fmt;

use crate::context::ContextValue;
use crate::errors::ContextResult;

/// Outcome of [`pluck`]. `Missing` is distinct from a present null value.
#[derive(Clone, Copy)]
pub enum Plucked<'a> {
    Found(&'a dyn Traverse),
    Missing,
}

impl<'a> Plucked<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Plucked::Missing)
    }

    pub fn found(self) -> Option<&'a dyn Traverse> {
        match self {
            Plucked::Found(value) => Some(value),
            Plucked::Missing => None,
        }
    }

    /// Loggable form of the found value, or `missing` when nothing was found.
    pub fn to_loggable(&self, missing: &ContextValue) -> ContextResult<ContextValue> {
        match self {
            Plucked::Found(value) => value.loggable(),
            Plucked::Missing => Ok(missing.clone()),
        }
    }
}

impl fmt::Debug for Plucked<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plucked::Found(value) => match value.loggable() {
                Ok(v) => write!(f, "Found({:?})", v),
                Err(_) => write!(f, "Found(<unloggable>)"),
            },
            Plucked::Missing => write!(f, "Missing"),
        }
    }
}

/// Split off the first segment of `path`. The tail is empty for a single segment.
pub(crate) fn split_head<'p>(path: &'p str, delimiter: &str) -> (&'p str, &'p str) {
    if delimiter.is_empty() {
        return (path, "");
    }
    path.split_once(delimiter).unwrap_or((path, ""))
}

/// Resolve `path` against `obj`. An empty path yields `obj` itself.
pub fn pluck<'a>(obj: &'a dyn Traverse, path: &str, delimiter: &str) -> Plucked<'a> {
    let mut current = obj;
    let mut remaining = path;

    while !remaining.is_empty() {
        let (head, tail) = split_head(remaining, delimiter);
        match current.attr(head).or_else(|| current.item(head)) {
            Some(next) => current = next,
            None => return Plucked::Missing,
        }
        remaining = tail;
    }

    Plucked::Found(current)
}
