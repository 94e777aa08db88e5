// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::panic::Location;

use crate::context::ContextMap;
use crate::facility::Level;

/// Fields of a single log event, keyed by flat (possibly dotted) names.
pub type EventDict = ContextMap;

/// Key the log message is stored under.
pub const EVENT_KEY: &str = "event";

/// Identity of an event: which logger, at what severity, from where.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub logger: &'a str,
    pub level: Level,
    pub callsite: &'static Location<'static>,
}

impl<'a> Record<'a> {
    #[track_caller]
    pub fn new(logger: &'a str, level: Level) -> Self {
        Self {
            logger,
            level,
            callsite: Location::caller(),
        }
    }
}
