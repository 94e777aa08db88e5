// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sinks that receive events at the end of the pipeline.
//!
//! * `CaptureSink` keeps events in memory, for assertions in tests
//! * `StreamSink` writes one JSON object per line to stdout, stderr or a shared writer
//! * `TracingSink` forwards events to the `tracing` ecosystem

mod capture;
mod stream;
mod tracing_sink;

pub use capture::{CaptureSink, CapturedEvent};
pub use stream::{render_json, SharedWriter, StreamSink};
pub use tracing_sink::TracingSink;
