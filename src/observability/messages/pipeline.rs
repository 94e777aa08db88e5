// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the event pipeline and its sinks.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A processor stopped an event before it reached the sink.
///
/// # Log Level
/// `trace!` - Routine, happens for every filtered event
pub struct EventDropped<'a> {
    pub logger: &'a str,
    pub level: &'a str,
    pub processor: &'a str,
}

impl Display for EventDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped {} event from '{}' at processor '{}'",
            self.level, self.logger, self.processor
        )
    }
}

impl StructuredLog for EventDropped<'_> {
    fn log(&self) {
        tracing::trace!(
            logger = self.logger,
            level = self.level,
            processor = self.processor,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "event_dropped",
            span_name = name,
            logger = self.logger,
            processor = self.processor,
        )
    }
}

/// A sink could not write an event.
///
/// # Log Level
/// `warn!` - The event is lost, logging continues
pub struct SinkWriteFailed<'a> {
    pub sink: &'a str,
    pub logger: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for SinkWriteFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Sink '{}' failed to write event from '{}': {}",
            self.sink, self.logger, self.error
        )
    }
}

impl StructuredLog for SinkWriteFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            sink = self.sink,
            logger = self.logger,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("sink_write_failed", span_name = name, sink = self.sink)
    }
}

/// A timestamp pattern could not be parsed; the default pattern is used instead.
///
/// # Log Level
/// `warn!` - Events are still stamped
pub struct InvalidTimestampFormat<'a> {
    pub format: &'a str,
    pub fallback: &'a str,
}

impl Display for InvalidTimestampFormat<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invalid timestamp format '{}', using '{}'",
            self.format, self.fallback
        )
    }
}

impl StructuredLog for InvalidTimestampFormat<'_> {
    fn log(&self) {
        tracing::warn!(format = self.format, fallback = self.fallback, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("invalid_timestamp_format", span_name = name, format = self.format)
    }
}
