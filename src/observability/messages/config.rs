// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for process-wide configuration.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// `configure` was applied.
///
/// # Log Level
/// `debug!` - Configuration is usually applied once at startup
///
/// # Example
/// ```
/// use woodchipper::observability::messages::config::ConfigurationApplied;
///
/// let msg = ConfigurationApplied {
///     pipeline: "dev",
///     facility_count: 2,
///     monitor_count: 1,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ConfigurationApplied<'a> {
    pub pipeline: &'a str,
    pub facility_count: usize,
    pub monitor_count: usize,
}

impl Display for ConfigurationApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Logging configured: pipeline={}, facilities={}, monitors={}",
            self.pipeline, self.facility_count, self.monitor_count
        )
    }
}

impl StructuredLog for ConfigurationApplied<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            facility_count = self.facility_count,
            monitor_count = self.monitor_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "configuration_applied",
            span_name = name,
            pipeline = self.pipeline,
        )
    }
}

/// A monitor factory was registered under a name that is already taken.
///
/// # Log Level
/// `debug!` - The earlier registration is kept
pub struct DuplicateMonitorIgnored<'a> {
    pub monitor: &'a str,
}

impl Display for DuplicateMonitorIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Monitor '{}' is already registered, ignoring", self.monitor)
    }
}

impl StructuredLog for DuplicateMonitorIgnored<'_> {
    fn log(&self) {
        tracing::debug!(monitor = self.monitor, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("duplicate_monitor", span_name = name, monitor = self.monitor)
    }
}

/// A dig path starts at a name the signature does not declare.
///
/// The output key is always injected with the missing default.
///
/// # Log Level
/// `warn!` - Usually a typo in the path, but not fatal
pub struct UndeclaredDigHead<'a> {
    pub output_key: &'a str,
    pub parameter: &'a str,
}

impl Display for UndeclaredDigHead<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dig path for '{}' starts at '{}' which is not a declared parameter",
            self.output_key, self.parameter
        )
    }
}

impl StructuredLog for UndeclaredDigHead<'_> {
    fn log(&self) {
        tracing::warn!(
            output_key = self.output_key,
            parameter = self.parameter,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "undeclared_dig_head",
            span_name = name,
            output_key = self.output_key,
            parameter = self.parameter,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let cases = vec![
            (
                DuplicateMonitorIgnored { monitor: "timer" }.to_string(),
                "Monitor 'timer' is already registered, ignoring",
            ),
            (
                UndeclaredDigHead {
                    output_key: "NestValue",
                    parameter: "nest",
                }
                .to_string(),
                "Dig path for 'NestValue' starts at 'nest' which is not a declared parameter",
            ),
        ];

        for (actual, expected) in cases {
            assert_eq!(actual, expected);
        }
    }
}
