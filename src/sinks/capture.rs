// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use parking_lot::Mutex;

use crate::facility::Level;
use crate::pipeline::{EventDict, Record};
use crate::traits::Sink;

/// One event as it reached a [`CaptureSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub logger: String,
    pub level: Level,
    pub fields: EventDict,
}

/// Keeps every emitted event in memory.
#[derive(Debug, Default)]
pub struct CaptureSink {
    captured: Mutex<Vec<CapturedEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields of every captured event, oldest first.
    pub fn events(&self) -> Vec<EventDict> {
        self.captured.lock().iter().map(|e| e.fields.clone()).collect()
    }

    pub fn entries(&self) -> Vec<CapturedEvent> {
        self.captured.lock().clone()
    }

    pub fn clear(&self) {
        self.captured.lock().clear();
    }
}

impl Sink for CaptureSink {
    fn emit(&self, record: &Record<'_>, event: EventDict) {
        self.captured.lock().push(CapturedEvent {
            logger: record.logger.to_string(),
            level: record.level,
            fields: event,
        });
    }

    fn name(&self) -> &'static str {
        "capture"
    }
}
