// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Logging scopes: fields that are active for a block of code, plus the
//! monitors and exit event that come with them.
//!
//! * [`LoggingContext`] / [`ContextGuard`] - enter a scope, exit on drop
//! * [`Monitor`] / [`MonitorFactory`] - per-scope resource measurement
//! * [`ArgLogger`] - scopes derived from call arguments via dig paths

mod arg_logger;
mod logging_context;
mod monitor;
mod signature;

pub use arg_logger::{ArgLogger, ArgLoggerBuilder, ParamSearchConfig};
#[doc(hidden)]
pub use logging_context::__scope_name;
pub use logging_context::{ContextGuard, LoggingContext, CONTEXT_NAME_KEY, TIME_TO_RUN_KEY};
pub use monitor::{
    monitor_factory, monitor_fn, DefaultMonitorFactory, FnMonitorFactory, Monitor, MonitorFactory,
};
pub use signature::{Arguments, BoundArguments, Signature};
