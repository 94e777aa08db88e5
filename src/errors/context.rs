// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for context store updates and context value conversion.

use thiserror::Error;

/// Errors produced while reading, updating or populating the logging context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    /// `update` was called with a mapping that has no entries.
    #[error("Cannot update the logging context with an empty mapping")]
    EmptyUpdate,

    /// A token issued in one flow was used to reset a different flow.
    #[error("Token was issued in flow {issued_in} and cannot reset flow {current}")]
    ForeignToken { issued_in: u64, current: u64 },

    /// A value cannot be represented as a loggable scalar or as text.
    #[error("Value of type '{type_name}' cannot be converted to a loggable value")]
    UnloggableValue { type_name: &'static str },

    /// Call arguments do not fit the declared signature.
    #[error("Cannot bind arguments: {0}")]
    Binding(String),
}

/// Result type alias for context operations.
pub type ContextResult<T> = Result<T, ContextError>;
