// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the context store and logging scopes.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A token was handed to `reset` on a flow other than the one that issued it.
///
/// # Log Level
/// `warn!` - Caller bug, the store is left untouched
pub struct ForeignTokenRejected {
    pub issued_in: u64,
    pub current: u64,
}

impl Display for ForeignTokenRejected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Context token issued in flow {} cannot be reset from flow {}",
            self.issued_in, self.current
        )
    }
}

impl StructuredLog for ForeignTokenRejected {
    fn log(&self) {
        tracing::warn!(
            issued_in = self.issued_in,
            current = self.current,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "foreign_token",
            span_name = name,
            issued_in = self.issued_in,
            current = self.current,
        )
    }
}

/// A monitor failed while its scope was being entered.
///
/// # Log Level
/// `error!` - The monitor is skipped for this scope
///
/// # Example
/// ```
/// use woodchipper::observability::messages::context::MonitorSetupFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "no counter");
/// let msg = MonitorSetupFailed {
///     context: "load_orders",
///     monitor: "sql",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct MonitorSetupFailed<'a> {
    pub context: &'a str,
    pub monitor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for MonitorSetupFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Monitor '{}' failed to start in context '{}': {}",
            self.monitor, self.context, self.error
        )
    }
}

impl StructuredLog for MonitorSetupFailed<'_> {
    fn log(&self) {
        tracing::error!(
            context = self.context,
            monitor = self.monitor,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "monitor_setup_failed",
            span_name = name,
            context = self.context,
            monitor = self.monitor,
        )
    }
}

/// A monitor failed to report when its scope was exited.
///
/// # Log Level
/// `error!` - The monitor contributes no fields to the exit event
pub struct MonitorFinishFailed<'a> {
    pub context: &'a str,
    pub monitor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for MonitorFinishFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Monitor '{}' failed to finish in context '{}': {}",
            self.monitor, self.context, self.error
        )
    }
}

impl StructuredLog for MonitorFinishFailed<'_> {
    fn log(&self) {
        tracing::error!(
            context = self.context,
            monitor = self.monitor,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "monitor_finish_failed",
            span_name = name,
            context = self.context,
            monitor = self.monitor,
        )
    }
}

/// Restoring the context at scope exit failed.
///
/// # Log Level
/// `error!` - Later events in this flow may carry stale fields
pub struct ContextRestoreFailed<'a> {
    pub context: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ContextRestoreFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to restore logging context on exit from '{}': {}",
            self.context, self.error
        )
    }
}

impl StructuredLog for ContextRestoreFailed<'_> {
    fn log(&self) {
        tracing::error!(context = self.context, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("context_restore_failed", span_name = name, context = self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_render() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "boom");

        let test_cases: Vec<(String, &str)> = vec![
            (
                ForeignTokenRejected {
                    issued_in: 1,
                    current: 2,
                }
                .to_string(),
                "Context token issued in flow 1 cannot be reset from flow 2",
            ),
            (
                MonitorSetupFailed {
                    context: "ctx",
                    monitor: "sql",
                    error: &error,
                }
                .to_string(),
                "Monitor 'sql' failed to start in context 'ctx': boom",
            ),
            (
                MonitorFinishFailed {
                    context: "ctx",
                    monitor: "sql",
                    error: &error,
                }
                .to_string(),
                "Monitor 'sql' failed to finish in context 'ctx': boom",
            ),
        ];

        for (rendered, expected) in test_cases {
            assert_eq!(rendered, expected);
        }
    }
}
