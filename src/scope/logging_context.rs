// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;

use crate::config::consts::CONTEXT_LOGGER_NAME;
use crate::config::registry;
use crate::context::{self, ContextFuture, ContextMap, ContextValue, FutureExt, Token};
use crate::facility::Level;
use crate::observability::messages::context::{
    ContextRestoreFailed, MonitorFinishFailed, MonitorSetupFailed,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::Logger;
use crate::scope::{Monitor, MonitorFactory};

/// Field carrying the scope name on the exit event.
pub const CONTEXT_NAME_KEY: &str = "context_name";
/// Field carrying the time spent inside the scope, in microseconds.
pub const TIME_TO_RUN_KEY: &str = "context.time_to_run_musec";

/// A set of fields attached to every event logged while the scope is active.
///
/// Entering installs the fields in the current flow and starts the registered
/// monitors. Leaving (dropping the [`ContextGuard`]) finishes the monitors,
/// logs one `"Exiting context: <name>"` event at INFO and restores exactly the
/// fields that were active before entry.
///
/// ```
/// use woodchipper::context;
/// use woodchipper::context_map;
/// use woodchipper::scope::LoggingContext;
///
/// LoggingContext::new(context_map! { "order_id" => 42 })
///     .name("load_order")
///     .no_prefix()
///     .run(|| {
///         assert_eq!(context::get("order_id"), Some(42.into()));
///     });
///
/// assert_eq!(context::get("order_id"), None);
/// ```
pub struct LoggingContext {
    fields: ContextMap,
    name: Option<String>,
    prefix: Option<String>,
    monitors: Vec<Arc<dyn MonitorFactory>>,
    logger: Option<Logger>,
    exit_level: Level,
}

impl LoggingContext {
    /// Fields prefixed with the ambient key prefix, monitored by every
    /// registered monitor.
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            name: None,
            prefix: registry::ambient_prefix(),
            monitors: registry::get_monitors(),
            logger: None,
            exit_level: Level::Info,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Prefix every injected key as `prefix.key`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into()).filter(|p| !p.is_empty());
        self
    }

    /// Inject keys as given, even when an ambient prefix is configured.
    pub fn no_prefix(mut self) -> Self {
        self.prefix = None;
        self
    }

    /// Use these monitors instead of the registered ones.
    pub fn monitors(mut self, factories: impl IntoIterator<Item = Arc<dyn MonitorFactory>>) -> Self {
        self.monitors = factories.into_iter().collect();
        self
    }

    /// Logger for the exit event. Defaults to `woodchipper.context`.
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Severity of the exit event. Defaults to INFO.
    pub fn exit_level(mut self, level: Level) -> Self {
        self.exit_level = level;
        self
    }

    pub fn context_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The mapping entering this scope installs, with the prefix applied.
    pub fn injected_context(&self) -> ContextMap {
        match &self.prefix {
            Some(prefix) => self
                .fields
                .iter()
                .map(|(k, v)| (format!("{}.{}", prefix, k), v.clone()))
                .collect(),
            None => self.fields.clone(),
        }
    }

    /// Activate the scope until the returned guard is dropped.
    ///
    /// Without an explicit name the scope is named after the caller's
    /// `file:line`.
    ///
    /// The guard is tied to the current thread's flow and cannot be held
    /// across an `.await` in a spawned task. Use [`run_async`](Self::run_async)
    /// or [`context::spawn`] for scopes that suspend.
    #[track_caller]
    pub fn enter(self) -> ContextGuard {
        ContextGuard {
            exit: self.open(Location::caller()),
            _flow_bound: PhantomData,
        }
    }

    fn open(self, location: &'static Location<'static>) -> ScopeExit {
        let injected = self.injected_context();
        let name = self
            .name
            .unwrap_or_else(|| format!("{}:{}", location.file(), location.line()));

        // An empty mapping has nothing to restore.
        let token = context::update(injected).ok();

        let mut monitors = Vec::with_capacity(self.monitors.len());
        for factory in &self.monitors {
            let mut monitor = factory.create();
            match monitor.setup() {
                Ok(()) => monitors.push((factory.name().to_string(), monitor)),
                Err(error) => MonitorSetupFailed {
                    context: &name,
                    monitor: factory.name(),
                    error: &*error,
                }
                .log(),
            }
        }

        let mut logger = self
            .logger
            .unwrap_or_else(|| registry::get_logger(CONTEXT_LOGGER_NAME));
        logger.clear_prefix();

        ScopeExit {
            name,
            token,
            monitors,
            logger,
            exit_level: self.exit_level,
            started: Instant::now(),
        }
    }

    /// Run `f` inside the scope. The scope is exited even if `f` panics.
    #[track_caller]
    pub fn run<R>(self, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        f()
    }

    /// Run `future` inside the scope, in its own copy of the current flow.
    ///
    /// The scope is exited when the future completes or is dropped.
    #[track_caller]
    pub fn run_async<F: Future>(self, future: F) -> ContextFuture<impl Future<Output = F::Output>> {
        let location = Location::caller();
        // The future owns its flow, so its exit may move between threads.
        async move {
            let _exit = self.open(location);
            future.await
        }
        .in_current_context()
    }
}

impl fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingContext")
            .field("fields", &self.fields)
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("monitors", &self.monitors)
            .field("exit_level", &self.exit_level)
            .finish()
    }
}

/// An active [`LoggingContext`]. Dropping it exits the scope.
///
/// Not `Send`: tasks sharing a worker thread share its flow, so a guard held
/// across an await in one task would restore state over another task's.
#[must_use = "the scope is exited as soon as the guard is dropped"]
pub struct ContextGuard {
    exit: ScopeExit,
    _flow_bound: PhantomData<*const ()>,
}

impl ContextGuard {
    pub fn name(&self) -> &str {
        &self.exit.name
    }

    /// Exit now rather than at the end of the enclosing block.
    pub fn exit(self) {}
}

impl fmt::Debug for ContextGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextGuard")
            .field("name", &self.exit.name)
            .field(
                "monitors",
                &self.exit.monitors.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Exit steps of an entered scope, run on drop.
struct ScopeExit {
    name: String,
    token: Option<Token>,
    monitors: Vec<(String, Box<dyn Monitor>)>,
    logger: Logger,
    exit_level: Level,
    started: Instant,
}

impl Drop for ScopeExit {
    fn drop(&mut self) {
        let elapsed = i64::try_from(self.started.elapsed().as_micros()).unwrap_or(i64::MAX);

        let mut exit_fields = ContextMap::new();
        exit_fields.insert(CONTEXT_NAME_KEY.to_string(), ContextValue::from(self.name.as_str()));
        exit_fields.insert(TIME_TO_RUN_KEY.to_string(), ContextValue::Int(elapsed));

        for (monitor_name, monitor) in self.monitors.iter_mut() {
            match monitor.finish() {
                Ok(fields) => exit_fields.extend(fields),
                Err(error) => MonitorFinishFailed {
                    context: &self.name,
                    monitor: monitor_name,
                    error: &*error,
                }
                .log(),
            }
        }

        self.logger.log(
            self.exit_level,
            &format!("Exiting context: {}", self.name),
            exit_fields,
        );

        if let Some(token) = self.token.take() {
            if let Err(error) = context::reset(token) {
                ContextRestoreFailed {
                    context: &self.name,
                    error: &error,
                }
                .log();
            }
        }
    }
}

#[doc(hidden)]
pub fn __scope_name(module: &str, marker_path: &str) -> String {
    let function = marker_path
        .strip_suffix("::__woodchipper_here")
        .unwrap_or(marker_path)
        .split("::")
        .filter(|segment| *segment != "{{closure}}")
        .last()
        .unwrap_or(module);
    format!("{}:{}", module, function)
}

/// A [`LoggingContext`] named `"<module>:<function>"` after the enclosing function.
///
/// ```
/// use woodchipper::logging_context;
///
/// fn load_order() -> String {
///     let scope = logging_context! { "order_id" => 42 };
///     scope.context_name().unwrap_or_default().to_string()
/// }
///
/// assert!(load_order().ends_with(":load_order"));
/// ```
#[macro_export]
macro_rules! logging_context {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::scope::LoggingContext::new($crate::context_map! { $($key => $value),* })
            .name($crate::__scope_fn_name!())
    };
}

/// `"<module>:<function>"` of the function the macro is expanded in.
#[doc(hidden)]
#[macro_export]
macro_rules! __scope_fn_name {
    () => {{
        fn __woodchipper_here() {}
        fn __woodchipper_type_name<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::scope::__scope_name(module_path!(), __woodchipper_type_name(__woodchipper_here))
    }};
}
