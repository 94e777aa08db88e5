// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while building decorators or loading logging configuration.
//!
//! These are detected once, at setup time, and are never retried.

use std::fmt;

/// Invalid decorator or logging configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A dig path was the empty string, so there is no parameter to read from
    EmptyDigPath {
        /// The output key the empty path was declared for
        output_key: String,
    },
    /// The path delimiter was the empty string
    EmptyDelimiter,
    /// A facility entry names a severity that does not exist
    UnknownLevel {
        /// The facility prefix the level was configured for
        facility: String,
        /// The rejected level name
        level: String,
    },
    /// The configuration file could not be read or parsed
    Load {
        /// Where the configuration came from
        source_name: String,
        /// The underlying reason
        reason: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyDigPath { output_key } => {
                write!(f, "Dig path for '{}' cannot be an empty string", output_key)
            }
            ConfigurationError::EmptyDelimiter => {
                write!(f, "Path delimiter cannot be an empty string")
            }
            ConfigurationError::UnknownLevel { facility, level } => {
                write!(
                    f,
                    "Facility '{}' is configured with unknown level '{}'",
                    facility, level
                )
            }
            ConfigurationError::Load {
                source_name,
                reason,
            } => {
                write!(f, "Failed to load logging configuration from '{}': {}", source_name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let cases = vec![
            (
                ConfigurationError::EmptyDigPath {
                    output_key: "Foo".to_string(),
                },
                "Dig path for 'Foo' cannot be an empty string",
            ),
            (
                ConfigurationError::EmptyDelimiter,
                "Path delimiter cannot be an empty string",
            ),
            (
                ConfigurationError::UnknownLevel {
                    facility: "app.db".to_string(),
                    level: "LOUD".to_string(),
                },
                "Facility 'app.db' is configured with unknown level 'LOUD'",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
