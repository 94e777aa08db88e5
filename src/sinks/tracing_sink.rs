// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::facility::Level;
use crate::pipeline::{EventDict, Record, EVENT_KEY};
use crate::sinks::render_json;
use crate::traits::Sink;

/// Forwards events to `tracing`, so any installed subscriber renders them.
///
/// The message becomes the tracing message; the remaining fields travel as one
/// JSON-rendered `fields` value. `Critical` is reported at `ERROR`.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&self, record: &Record<'_>, mut event: EventDict) {
        let message = event
            .remove(EVENT_KEY)
            .map(|m| m.to_string())
            .unwrap_or_default();
        let fields = render_json(&event);
        let logger = record.logger;

        match record.level {
            Level::Debug => tracing::debug!(logger, fields = %fields, "{}", message),
            Level::Info => tracing::info!(logger, fields = %fields, "{}", message),
            Level::Warning => tracing::warn!(logger, fields = %fields, "{}", message),
            Level::Error => tracing::error!(logger, fields = %fields, "{}", message),
            Level::Critical => tracing::error!(logger, critical = true, fields = %fields, "{}", message),
        }
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
