// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Context-aware structured logging.
//!
//! Fields installed by a [`LoggingContext`] are attached to every event logged
//! inside it, on the same thread or across `.await` points, and are restored
//! exactly when the scope ends. Loggers are filtered per facility (dot-delimited
//! logger-name prefix) and run their events through a configurable pipeline.
//!
//! ```
//! use woodchipper::{context_map, get_logger, LoggingContext};
//!
//! let logger = get_logger("orders.api");
//!
//! LoggingContext::new(context_map! { "request_id" => "r-1" })
//!     .name("orders:create")
//!     .run(|| {
//!         logger.info("Order created.", context_map! { "order_id" => 42 });
//!     });
//! ```

pub mod config; // process-wide configuration, presets, YAML loading
pub mod context; // flow-local context store
pub mod errors; // error handling
pub mod facility; // per-namespace minimum levels
pub mod observability; // the crate's own diagnostics
pub mod pipeline; // processors, loggers
pub mod pluck; // dig paths into nested values
pub mod scope; // logging scopes, monitors, argument loggers
pub mod sinks; // event destinations
pub mod traits; // pipeline step and sink contracts

pub use config::{configure, get_facilities, get_logger, get_monitors, reset, Configuration, Preset};
pub use context::{ContextMap, ContextValue};
pub use errors::{ConfigurationError, ContextError, ContextResult};
pub use facility::Level;
pub use pipeline::Logger;
pub use scope::{ArgLogger, Arguments, ContextGuard, LoggingContext, Monitor, MonitorFactory, Signature};
