// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Context derived from the arguments of a call.
//!
//! An [`ArgLogger`] is configured once with `{output_key: dig_path}` pairs
//! whose first segment names a declared parameter. Each call binds its
//! arguments to the [`Signature`], resolves every path against the bound
//! argument and runs the body inside a fresh [`LoggingContext`] holding the
//! resolved values.
//!
//! ```
//! use woodchipper::context;
//! use woodchipper::scope::{ArgLogger, Arguments, Signature};
//!
//! let orders = ArgLogger::builder(Signature::new().required("order").optional("note"))
//!     .path("OrderID", "order.id")
//!     .path("Note", "note")
//!     .no_prefix()
//!     .build()
//!     .unwrap();
//!
//! let order = serde_json::json!({ "id": 42 });
//! let args = Arguments::new().arg(&order);
//!
//! let seen = orders.call(&args, || context::as_map()).unwrap();
//! assert_eq!(seen["OrderID"], 42.into());
//! assert_eq!(seen["Note"], "<missing>".into());
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::config::consts::{DEFAULT_MISSING, DEFAULT_PATH_DELIMITER};
use crate::context::{ContextFuture, ContextMap, ContextValue};
use crate::errors::{ConfigurationError, ContextResult};
use crate::observability::messages::config::UndeclaredDigHead;
use crate::observability::messages::StructuredLog;
use crate::pipeline::Logger;
use crate::pluck::{self, pluck};
use crate::scope::{Arguments, LoggingContext, MonitorFactory, Signature};

/// Where one output key is read from, relative to its head parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSearchConfig {
    /// Path below the head parameter, empty when the parameter itself is logged
    pub dig_path: String,
    pub output_key: String,
    pub diggable: bool,
}

#[derive(Debug, Clone)]
enum PrefixChoice {
    Ambient,
    Fixed(String),
    Disabled,
}

/// Builder for [`ArgLogger`].
pub struct ArgLoggerBuilder {
    signature: Signature,
    paths: Vec<(String, String)>,
    missing_default: ContextValue,
    path_delimiter: String,
    name: Option<String>,
    prefix: PrefixChoice,
    monitors: Option<Vec<Arc<dyn MonitorFactory>>>,
    logger: Option<Logger>,
}

impl ArgLoggerBuilder {
    /// Inject the value found at `dig_path` under `output_key`.
    pub fn path(mut self, output_key: impl Into<String>, dig_path: impl Into<String>) -> Self {
        self.paths.push((output_key.into(), dig_path.into()));
        self
    }

    /// Value injected when a parameter is unbound or a path does not resolve.
    pub fn missing_default(mut self, value: impl Into<ContextValue>) -> Self {
        self.missing_default = value.into();
        self
    }

    pub fn path_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.path_delimiter = delimiter.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = PrefixChoice::Fixed(prefix.into());
        self
    }

    pub fn no_prefix(mut self) -> Self {
        self.prefix = PrefixChoice::Disabled;
        self
    }

    pub fn monitors(mut self, factories: impl IntoIterator<Item = Arc<dyn MonitorFactory>>) -> Self {
        self.monitors = Some(factories.into_iter().collect());
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Validate every path against the signature.
    ///
    /// A path whose head is not a declared parameter is kept: it can never be
    /// bound, so its output key always receives the missing default.
    pub fn build(self) -> Result<ArgLogger, ConfigurationError> {
        if self.path_delimiter.is_empty() {
            return Err(ConfigurationError::EmptyDelimiter);
        }

        let mut search = Vec::with_capacity(self.paths.len());
        for (output_key, dig_path) in self.paths {
            if dig_path.is_empty() {
                return Err(ConfigurationError::EmptyDigPath { output_key });
            }

            let (head, tail) = pluck::split_head(&dig_path, &self.path_delimiter);
            if !self.signature.contains(head) && !self.signature.accepts_extra_keywords() {
                UndeclaredDigHead {
                    output_key: &output_key,
                    parameter: head,
                }
                .log();
            }

            search.push((
                head.to_string(),
                ParamSearchConfig {
                    dig_path: tail.to_string(),
                    output_key,
                    diggable: !tail.is_empty(),
                },
            ));
        }

        Ok(ArgLogger {
            signature: self.signature,
            search,
            missing_default: self.missing_default,
            path_delimiter: self.path_delimiter,
            name: self.name,
            prefix: self.prefix,
            monitors: self.monitors,
            logger: self.logger,
        })
    }
}

/// Runs calls inside a logging scope built from their arguments.
pub struct ArgLogger {
    signature: Signature,
    search: Vec<(String, ParamSearchConfig)>,
    missing_default: ContextValue,
    path_delimiter: String,
    name: Option<String>,
    prefix: PrefixChoice,
    monitors: Option<Vec<Arc<dyn MonitorFactory>>>,
    logger: Option<Logger>,
}

impl ArgLogger {
    pub fn builder(signature: Signature) -> ArgLoggerBuilder {
        ArgLoggerBuilder {
            signature,
            paths: Vec::new(),
            missing_default: ContextValue::from(DEFAULT_MISSING),
            path_delimiter: DEFAULT_PATH_DELIMITER.to_string(),
            name: None,
            prefix: PrefixChoice::Ambient,
            monitors: None,
            logger: None,
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Search configuration per head parameter, in declaration order.
    pub fn search_configs(&self) -> impl Iterator<Item = (&str, &ParamSearchConfig)> {
        self.search.iter().map(|(head, config)| (head.as_str(), config))
    }

    /// The mapping a call with `args` would inject.
    pub fn extract(&self, args: &Arguments<'_>) -> ContextResult<ContextMap> {
        let bound = self.signature.bind(args)?;

        let mut injected = ContextMap::with_capacity(self.search.len());
        for (head, config) in &self.search {
            let value = match bound.get(head) {
                None => self.missing_default.clone(),
                Some(argument) if config.diggable => {
                    pluck(argument, &config.dig_path, &self.path_delimiter)
                        .to_loggable(&self.missing_default)?
                }
                Some(argument) => argument.loggable()?,
            };
            injected.insert(config.output_key.clone(), value);
        }
        Ok(injected)
    }

    /// The scope a call with `args` would run in.
    pub fn scope(&self, args: &Arguments<'_>) -> ContextResult<LoggingContext> {
        let mut scope = LoggingContext::new(self.extract(args)?);
        scope = match &self.prefix {
            PrefixChoice::Ambient => scope,
            PrefixChoice::Fixed(prefix) => scope.prefix(prefix.as_str()),
            PrefixChoice::Disabled => scope.no_prefix(),
        };
        if let Some(name) = &self.name {
            scope = scope.name(name.as_str());
        }
        if let Some(monitors) = &self.monitors {
            scope = scope.monitors(monitors.iter().cloned());
        }
        if let Some(logger) = &self.logger {
            scope = scope.logger(logger.clone());
        }
        Ok(scope)
    }

    /// Run `f` inside the scope derived from `args`.
    ///
    /// Binding and conversion errors are returned before `f` runs.
    #[track_caller]
    pub fn call<R>(&self, args: &Arguments<'_>, f: impl FnOnce() -> R) -> ContextResult<R> {
        Ok(self.scope(args)?.run(f))
    }

    /// Run `future` inside the scope derived from `args`.
    #[track_caller]
    pub fn call_async<F: Future>(
        &self,
        args: &Arguments<'_>,
        future: F,
    ) -> ContextResult<ContextFuture<impl Future<Output = F::Output>>> {
        Ok(self.scope(args)?.run_async(future))
    }
}

/// An [`ArgLoggerBuilder`] whose scopes are named `"<module>:<function>"` after
/// the function the macro is expanded in.
///
/// ```
/// use woodchipper::arg_logger;
/// use woodchipper::scope::{Arguments, Signature};
///
/// fn create_order(order_id: u32) -> Option<String> {
///     let logger = arg_logger!(Signature::new().required("order_id"))
///         .path("OrderID", "order_id")
///         .build()
///         .ok()?;
///     let scope = logger.scope(&Arguments::new().arg(&order_id)).ok()?;
///     scope.context_name().map(str::to_string)
/// }
///
/// assert!(create_order(7).unwrap().ends_with(":create_order"));
/// ```
#[macro_export]
macro_rules! arg_logger {
    ($signature:expr) => {
        $crate::scope::ArgLogger::builder($signature).name($crate::__scope_fn_name!())
    };
}
