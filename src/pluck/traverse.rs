// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use crate::context::ContextValue;
use crate::errors::{ContextError, ContextResult};

/// A value the path resolver can walk into.
///
/// `attr` is member-style lookup (struct fields, namespace attributes), `item` is
/// mapping-style lookup. The resolver tries `attr` first and falls back to `item`.
/// Both default to "not present".
///
/// `loggable` turns the value into something that can be placed in the logging
/// context. Scalars map to their [`ContextValue`] kind, containers to their text
/// form. The default reports the type as unloggable.
pub trait Traverse {
    fn attr(&self, _name: &str) -> Option<&dyn Traverse> {
        None
    }

    fn item(&self, _key: &str) -> Option<&dyn Traverse> {
        None
    }

    fn loggable(&self) -> ContextResult<ContextValue> {
        Err(ContextError::UnloggableValue {
            type_name: std::any::type_name::<Self>(),
        })
    }
}

/// Renders a loggable value the way it appears inside a container's text form.
fn quoted(value: &ContextValue) -> String {
    match value {
        ContextValue::Str(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

fn render_entries<'a, I>(entries: I) -> ContextResult<ContextValue>
where
    I: Iterator<Item = (&'a str, &'a dyn Traverse)>,
{
    let mut rendered = Vec::new();
    for (key, value) in entries {
        rendered.push(format!("{:?}: {}", key, quoted(&value.loggable()?)));
    }
    rendered.sort();
    Ok(ContextValue::Str(format!("{{{}}}", rendered.join(", "))))
}

impl<V: Traverse, S: BuildHasher> Traverse for HashMap<String, V, S> {
    fn item(&self, key: &str) -> Option<&dyn Traverse> {
        self.get(key).map(|v| v as &dyn Traverse)
    }

    fn loggable(&self) -> ContextResult<ContextValue> {
        render_entries(self.iter().map(|(k, v)| (k.as_str(), v as &dyn Traverse)))
    }
}

impl<V: Traverse> Traverse for BTreeMap<String, V> {
    fn item(&self, key: &str) -> Option<&dyn Traverse> {
        self.get(key).map(|v| v as &dyn Traverse)
    }

    fn loggable(&self) -> ContextResult<ContextValue> {
        render_entries(self.iter().map(|(k, v)| (k.as_str(), v as &dyn Traverse)))
    }
}

impl<T: Traverse> Traverse for Vec<T> {
    fn loggable(&self) -> ContextResult<ContextValue> {
        let mut rendered = Vec::with_capacity(self.len());
        for value in self {
            rendered.push(quoted(&value.loggable()?));
        }
        Ok(ContextValue::Str(format!("[{}]", rendered.join(", "))))
    }
}

impl Traverse for serde_json::Value {
    fn item(&self, key: &str) -> Option<&dyn Traverse> {
        match self {
            serde_json::Value::Object(map) => map.get(key).map(|v| v as &dyn Traverse),
            _ => None,
        }
    }

    fn loggable(&self) -> ContextResult<ContextValue> {
        Ok(match self {
            serde_json::Value::Null => ContextValue::Null,
            serde_json::Value::Bool(b) => ContextValue::Bool(*b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => ContextValue::Int(i),
                (None, Some(f)) if n.is_f64() => ContextValue::Float(f),
                _ => ContextValue::Str(n.to_string()),
            },
            serde_json::Value::String(s) => ContextValue::Str(s.clone()),
            other => ContextValue::Str(other.to_string()),
        })
    }
}

impl Traverse for ContextValue {
    fn loggable(&self) -> ContextResult<ContextValue> {
        Ok(self.clone())
    }
}

impl Traverse for str {
    fn loggable(&self) -> ContextResult<ContextValue> {
        Ok(ContextValue::from(self))
    }
}

impl Traverse for String {
    fn loggable(&self) -> ContextResult<ContextValue> {
        Ok(ContextValue::from(self.as_str()))
    }
}

macro_rules! scalar_traverse {
    ($($t:ty),*) => {
        $(
            impl Traverse for $t {
                fn loggable(&self) -> ContextResult<ContextValue> {
                    Ok(ContextValue::from(*self))
                }
            }
        )*
    };
}

scalar_traverse!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl<T: Traverse> Traverse for Option<T> {
    fn attr(&self, name: &str) -> Option<&dyn Traverse> {
        self.as_ref().and_then(|v| v.attr(name))
    }

    fn item(&self, key: &str) -> Option<&dyn Traverse> {
        self.as_ref().and_then(|v| v.item(key))
    }

    fn loggable(&self) -> ContextResult<ContextValue> {
        match self {
            Some(v) => v.loggable(),
            None => Ok(ContextValue::Null),
        }
    }
}

macro_rules! delegate_traverse {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Traverse + ?Sized> Traverse for $wrapper<T> {
                fn attr(&self, name: &str) -> Option<&dyn Traverse> {
                    (**self).attr(name)
                }

                fn item(&self, key: &str) -> Option<&dyn Traverse> {
                    (**self).item(key)
                }

                fn loggable(&self) -> ContextResult<ContextValue> {
                    (**self).loggable()
                }
            }
        )*
    };
}

delegate_traverse!(Box, Arc, Rc);

impl<T: Traverse + ?Sized> Traverse for &T {
    fn attr(&self, name: &str) -> Option<&dyn Traverse> {
        (**self).attr(name)
    }

    fn item(&self, key: &str) -> Option<&dyn Traverse> {
        (**self).item(key)
    }

    fn loggable(&self) -> ContextResult<ContextValue> {
        (**self).loggable()
    }
}

/// A bag of named attributes, for values that are objects rather than mappings.
///
/// Only attribute lookup succeeds; item lookup on a namespace is always missing.
#[derive(Default)]
pub struct Namespace {
    attrs: BTreeMap<String, Box<dyn Traverse + Send + Sync>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Traverse + Send + Sync + 'static) -> Self {
        self.attrs.insert(name.into(), Box::new(value));
        self
    }
}

impl Traverse for Namespace {
    fn attr(&self, name: &str) -> Option<&dyn Traverse> {
        self.attrs.get(name).map(|v| v.as_ref() as &dyn Traverse)
    }

    fn loggable(&self) -> ContextResult<ContextValue> {
        let mut rendered = Vec::with_capacity(self.attrs.len());
        for (name, value) in &self.attrs {
            rendered.push(format!("{}={}", name, quoted(&value.loggable()?)));
        }
        Ok(ContextValue::Str(format!("namespace({})", rendered.join(", "))))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("attrs", &self.attrs.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Implement [`Traverse`] for a struct by listing the fields the resolver may read.
///
/// The struct must implement `Debug`; its debug form is the loggable text.
///
/// ```
/// use woodchipper::impl_traverse;
/// use woodchipper::pluck::{pluck, Traverse};
///
/// #[derive(Debug)]
/// struct Order { id: u32, customer: String }
/// impl_traverse!(Order { id, customer });
///
/// let order = Order { id: 7, customer: "ada".into() };
/// let found = pluck(&order, "id", ".").found().unwrap();
/// assert_eq!(found.loggable().unwrap(), 7.into());
/// ```
#[macro_export]
macro_rules! impl_traverse {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::pluck::Traverse for $ty {
            fn attr(&self, name: &str) -> ::std::option::Option<&dyn $crate::pluck::Traverse> {
                match name {
                    $( stringify!($field) => ::std::option::Option::Some(&self.$field as &dyn $crate::pluck::Traverse), )*
                    _ => ::std::option::Option::None,
                }
            }

            fn loggable(&self) -> $crate::errors::ContextResult<$crate::context::ContextValue> {
                ::std::result::Result::Ok($crate::context::ContextValue::Str(format!("{:?}", self)))
            }
        }
    };
}
