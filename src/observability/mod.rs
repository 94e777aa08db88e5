// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Diagnostics the library emits about itself.
//!
//! Events produced by user code go through the [`crate::pipeline`]; this module
//! covers what the library reports about its own operation (rejected tokens,
//! failing monitors, dropped events, configuration changes). Those go straight
//! to `tracing` so they stay visible even when the pipeline is misconfigured.
//!
//! Message types follow a struct-based pattern with a `Display` implementation
//! and a [`messages::StructuredLog`] implementation that carries the fields.
//!
//! # Usage
//!
//! ```rust
//! use woodchipper::observability::messages::{context::ForeignTokenRejected, StructuredLog};
//!
//! let msg = ForeignTokenRejected {
//!     issued_in: 3,
//!     current: 7,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
