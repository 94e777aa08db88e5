// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in pipeline steps.

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, Utc};

use crate::config::consts::DEFAULT_TIMESTAMP_FORMAT;
use crate::context;
use crate::facility::{self, FacilityTable};
use crate::observability::messages::pipeline::InvalidTimestampFormat;
use crate::observability::messages::StructuredLog;
use crate::pipeline::{EventDict, Record};
use crate::traits::{Outcome, Processor};

/// Adds `level` with the event's severity name.
pub struct AddLogLevel;

impl Processor for AddLogLevel {
    fn process(&self, record: &Record<'_>, mut event: EventDict) -> Outcome {
        event.insert("level".to_string(), record.level.as_str().into());
        Outcome::Continue(event)
    }

    fn name(&self) -> &'static str {
        "add_log_level"
    }
}

/// Adds `logger` with the emitting logger's name.
pub struct AddLoggerName;

impl Processor for AddLoggerName {
    fn process(&self, record: &Record<'_>, mut event: EventDict) -> Outcome {
        event.insert("logger".to_string(), record.logger.into());
        Outcome::Continue(event)
    }

    fn name(&self) -> &'static str {
        "add_logger_name"
    }
}

/// Adds `timestamp`, formatted with a strftime pattern.
pub struct TimeStamper {
    format: String,
    utc: bool,
}

impl TimeStamper {
    /// An unparsable `format` is replaced by the default pattern.
    pub fn new(format: impl Into<String>, utc: bool) -> Self {
        let mut format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            InvalidTimestampFormat {
                format: &format,
                fallback: DEFAULT_TIMESTAMP_FORMAT,
            }
            .log();
            format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        }
        Self { format, utc }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Default for TimeStamper {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT, false)
    }
}

impl Processor for TimeStamper {
    fn process(&self, _record: &Record<'_>, mut event: EventDict) -> Outcome {
        let timestamp = if self.utc {
            Utc::now().format(&self.format).to_string()
        } else {
            Local::now().format(&self.format).to_string()
        };
        event.insert("timestamp".to_string(), timestamp.into());
        Outcome::Continue(event)
    }

    fn name(&self) -> &'static str {
        "time_stamper"
    }
}

/// Adds `filename` and `lineno` of the logging call.
pub struct CallsiteAdder;

impl Processor for CallsiteAdder {
    fn process(&self, record: &Record<'_>, mut event: EventDict) -> Outcome {
        event.insert("filename".to_string(), record.callsite.file().into());
        event.insert("lineno".to_string(), record.callsite.line().into());
        Outcome::Continue(event)
    }

    fn name(&self) -> &'static str {
        "callsite_adder"
    }
}

/// Merges the current logging context underneath the event's own fields.
///
/// Keys set on the event win over context keys of the same name.
pub struct InjectContext;

impl Processor for InjectContext {
    fn process(&self, _record: &Record<'_>, event: EventDict) -> Outcome {
        let mut merged = context::as_map();
        merged.extend(event);
        Outcome::Continue(merged)
    }

    fn name(&self) -> &'static str {
        "inject_context"
    }
}

/// Drops events below the minimum level configured for their facility.
pub struct FacilityFilter {
    table: Option<FacilityTable>,
}

impl FacilityFilter {
    /// Filter against the process-wide facility table, read at every event.
    pub fn global() -> Self {
        Self { table: None }
    }

    /// Filter against a fixed table.
    pub fn with_table(table: FacilityTable) -> Self {
        Self { table: Some(table) }
    }
}

impl Processor for FacilityFilter {
    fn process(&self, record: &Record<'_>, event: EventDict) -> Outcome {
        match &self.table {
            Some(table) => facility::filter_with(table, record.logger, record.level, event),
            None => facility::filter(record.logger, record.level, event),
        }
    }

    fn name(&self) -> &'static str {
        "facility_filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextValue;
    use crate::context_map;
    use crate::facility::Level;

    fn continued(outcome: Outcome) -> EventDict {
        match outcome {
            Outcome::Continue(event) => event,
            Outcome::Drop => panic!("expected the event to continue"),
        }
    }

    #[test]
    fn test_level_and_logger_name() {
        let record = Record::new("app.db", Level::Warning);
        let event = continued(AddLogLevel.process(&record, EventDict::new()));
        let event = continued(AddLoggerName.process(&record, event));

        assert_eq!(event, context_map! { "level" => "warning", "logger" => "app.db" });
    }

    #[test]
    fn test_callsite_points_at_caller() {
        let record = Record::new("app", Level::Info);
        let event = continued(CallsiteAdder.process(&record, EventDict::new()));

        assert_eq!(event["filename"], ContextValue::from(file!()));
        assert!(event["lineno"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_timestamp_uses_format() {
        let record = Record::new("app", Level::Info);
        let event = continued(TimeStamper::new("%Y", true).process(&record, EventDict::new()));
        let year = event["timestamp"].as_str().unwrap();
        assert_eq!(year.len(), 4);
    }

    #[test]
    fn test_invalid_timestamp_format_falls_back() {
        let cases = vec![
            ("%Y-%m-%d", "%Y-%m-%d"),
            ("%Q", DEFAULT_TIMESTAMP_FORMAT),
            ("%", DEFAULT_TIMESTAMP_FORMAT),
        ];

        for (format, expected) in cases {
            let stamper = TimeStamper::new(format, false);
            assert_eq!(stamper.format(), expected, "format '{}'", format);

            let event = continued(stamper.process(&Record::new("app", Level::Info), EventDict::new()));
            assert!(event.contains_key("timestamp"));
        }
    }

    #[test]
    fn test_inject_context_event_keys_win() {
        let token = context::update(context_map! { "type" => "ctx", "request" => "r-1" }).unwrap();
        let record = Record::new("app", Level::Info);
        let event = continued(InjectContext.process(&record, context_map! { "type" => "debug" }));
        context::reset(token).unwrap();

        assert_eq!(event, context_map! { "type" => "debug", "request" => "r-1" });
    }

    #[test]
    fn test_facility_filter_with_table() {
        let filter = FacilityFilter::with_table([("", Level::Info)].into_iter().collect());
        assert_eq!(
            filter.process(&Record::new("x", Level::Debug), EventDict::new()),
            Outcome::Drop
        );
    }
}
