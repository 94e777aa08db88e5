// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;

use crate::errors::{ContextError, ContextResult};
use crate::pluck::Traverse;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    name: String,
    required: bool,
}

/// Declared parameter names of a wrapped function, in positional order.
///
/// Optional parameters stand for parameters with a default value. The default
/// itself is never known here, so an omitted optional parameter is simply
/// unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
    extra_keywords: bool,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            required: false,
        });
        self
    }

    /// Accept keyword arguments that match no declared parameter.
    pub fn extra_keywords(mut self) -> Self {
        self.extra_keywords = true;
        self
    }

    pub fn accepts_extra_keywords(&self) -> bool {
        self.extra_keywords
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Pair call arguments with parameter names.
    pub fn bind<'a>(&self, args: &Arguments<'a>) -> ContextResult<BoundArguments<'a>> {
        if args.positional.len() > self.params.len() {
            return Err(ContextError::Binding(format!(
                "takes {} positional arguments but {} were given",
                self.params.len(),
                args.positional.len()
            )));
        }

        let mut values: HashMap<String, &'a dyn Traverse> = self
            .params
            .iter()
            .zip(args.positional.iter())
            .map(|(param, value)| (param.name.clone(), *value))
            .collect();

        for (name, value) in &args.keyword {
            if !self.extra_keywords && !self.contains(name) {
                return Err(ContextError::Binding(format!(
                    "got an unexpected keyword argument '{}'",
                    name
                )));
            }
            if values.insert(name.to_string(), *value).is_some() {
                return Err(ContextError::Binding(format!(
                    "got multiple values for argument '{}'",
                    name
                )));
            }
        }

        if let Some(param) = self
            .params
            .iter()
            .find(|p| p.required && !values.contains_key(&p.name))
        {
            return Err(ContextError::Binding(format!(
                "missing required argument '{}'",
                param.name
            )));
        }

        Ok(BoundArguments { values })
    }
}

/// Arguments of one call, borrowed for the duration of the call.
#[derive(Default)]
pub struct Arguments<'a> {
    positional: Vec<&'a dyn Traverse>,
    keyword: Vec<(&'a str, &'a dyn Traverse)>,
}

impl<'a> Arguments<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg<T: Traverse>(mut self, value: &'a T) -> Self {
        self.positional.push(value);
        self
    }

    pub fn kwarg<T: Traverse>(mut self, name: &'a str, value: &'a T) -> Self {
        self.keyword.push((name, value));
        self
    }
}

impl fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("positional", &self.positional.len())
            .field(
                "keyword",
                &self.keyword.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Arguments keyed by the parameter they were bound to.
pub struct BoundArguments<'a> {
    values: HashMap<String, &'a dyn Traverse>,
}

impl<'a> BoundArguments<'a> {
    /// The argument bound to `name`, or `None` when it was not supplied.
    pub fn get(&self, name: &str) -> Option<&'a dyn Traverse> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
