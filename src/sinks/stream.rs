// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::observability::messages::{pipeline::SinkWriteFailed, StructuredLog};
use crate::pipeline::{EventDict, Record};
use crate::traits::Sink;

/// A writer shared by every sink that targets it.
///
/// Clones share one lock, so lines written through different sinks and loggers
/// never interleave.
#[derive(Clone)]
pub struct SharedWriter(Arc<Mutex<Box<dyn Write + Send>>>);

impl SharedWriter {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Box::new(writer))))
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedWriter")
    }
}

#[derive(Debug, Clone)]
enum Target {
    Stdout,
    Stderr,
    Writer(SharedWriter),
}

/// Writes each event as a single JSON line.
#[derive(Debug, Clone)]
pub struct StreamSink {
    target: Target,
}

/// Render an event as compact JSON with keys in sorted order.
pub fn render_json(event: &EventDict) -> String {
    let ordered: BTreeMap<&String, _> = event.iter().collect();
    serde_json::to_string(&ordered).unwrap_or_else(|e| format!("{{\"render_error\":{:?}}}", e.to_string()))
}

impl StreamSink {
    pub fn stdout() -> Self {
        Self { target: Target::Stdout }
    }

    pub fn stderr() -> Self {
        Self { target: Target::Stderr }
    }

    pub fn writer(writer: SharedWriter) -> Self {
        Self {
            target: Target::Writer(writer),
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        // Each destination has exactly one lock: the std handle's own lock for
        // the standard streams, the shared mutex otherwise.
        match &self.target {
            Target::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{}", line)?;
                out.flush()
            }
            Target::Stderr => {
                let mut out = io::stderr().lock();
                writeln!(out, "{}", line)?;
                out.flush()
            }
            Target::Writer(shared) => {
                let mut out = shared.0.lock();
                writeln!(out, "{}", line)?;
                out.flush()
            }
        }
    }
}

impl Sink for StreamSink {
    fn emit(&self, record: &Record<'_>, event: EventDict) {
        if let Err(error) = self.write_line(&render_json(&event)) {
            SinkWriteFailed {
                sink: self.name(),
                logger: record.logger,
                error: &error,
            }
            .log();
        }
    }

    fn name(&self) -> &'static str {
        match self.target {
            Target::Stdout => "stdout",
            Target::Stderr => "stderr",
            Target::Writer(_) => "writer",
        }
    }
}
