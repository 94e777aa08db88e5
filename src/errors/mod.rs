// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod context;

pub use config::ConfigurationError;
pub use context::{ContextError, ContextResult};
