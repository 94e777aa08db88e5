// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for the library's own diagnostics.
//!
//! * `context` - context store and scope lifecycle events
//! * `pipeline` - event drops and sink failures
//! * `config` - configuration loading and merging

pub mod config;
pub mod context;
pub mod pipeline;

use tracing::Span;

/// A diagnostic message that knows how to log itself with structured fields.
pub trait StructuredLog {
    /// Emit the message at its own level, with its fields attached.
    fn log(&self);

    /// A span carrying the same fields, for work done on behalf of the message.
    fn span(&self, name: &str) -> Span;
}
