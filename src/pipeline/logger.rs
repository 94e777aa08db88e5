// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::config::registry;
use crate::context::ContextValue;
use crate::facility::Level;
use crate::pipeline::{EventDict, Pipeline, Record, EVENT_KEY};

#[derive(Clone)]
enum PipelineSource {
    /// Whatever pipeline is configured process-wide at the time of each call.
    Global,
    Fixed(Arc<Pipeline>),
}

/// A named logger that feeds events into a pipeline.
///
/// Loggers are cheap to clone. Fields added with [`Logger::bind`] are attached
/// to every event the returned logger emits. Un-dotted field keys get the key
/// prefix (from `WOODCHIPPER_KEY_PREFIX` or the configured `key_prefix`) as `prefix.key`;
/// keys that already contain a dot are left alone.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    source: PipelineSource,
    bound: Arc<EventDict>,
    prefix: Option<Arc<str>>,
}

impl Logger {
    /// A logger routed through the process-wide pipeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            source: PipelineSource::Global,
            bound: Arc::new(EventDict::new()),
            prefix: registry::ambient_prefix().map(Arc::from),
        }
    }

    /// A logger routed through a fixed pipeline, independent of global configuration.
    pub fn with_pipeline(name: impl Into<String>, pipeline: Arc<Pipeline>) -> Self {
        Self {
            source: PipelineSource::Fixed(pipeline),
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Stop prefixing field keys on this logger.
    pub fn clear_prefix(&mut self) {
        self.prefix = None;
    }

    /// Replace the key prefix. `None` disables prefixing.
    pub fn with_prefix(mut self, prefix: Option<&str>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty()).map(Arc::from);
        self
    }

    /// A new logger that also attaches `fields` to every event.
    pub fn bind<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        let mut bound = (*self.bound).clone();
        bound.extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self {
            bound: Arc::new(bound),
            ..self.clone()
        }
    }

    fn prefixed(&self, key: String) -> String {
        match &self.prefix {
            Some(prefix) if !key.contains('.') => format!("{}.{}", prefix, key),
            _ => key,
        }
    }

    /// Emit `event` at `level`. Returns `true` if the event reached the sink.
    #[track_caller]
    pub fn log<I, K, V>(&self, level: Level, event: &str, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        let record = Record::new(&self.name, level);

        let mut dict = EventDict::with_capacity(self.bound.len() + 1);
        for (key, value) in self.bound.iter() {
            dict.insert(self.prefixed(key.clone()), value.clone());
        }
        for (key, value) in fields {
            dict.insert(self.prefixed(key.into()), value.into());
        }
        dict.insert(EVENT_KEY.to_string(), ContextValue::from(event));

        match &self.source {
            PipelineSource::Fixed(pipeline) => pipeline.run(&record, dict),
            PipelineSource::Global => registry::active_pipeline().run(&record, dict),
        }
    }

    #[track_caller]
    pub fn debug<I, K, V>(&self, event: &str, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.log(Level::Debug, event, fields)
    }

    #[track_caller]
    pub fn info<I, K, V>(&self, event: &str, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.log(Level::Info, event, fields)
    }

    #[track_caller]
    pub fn warning<I, K, V>(&self, event: &str, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.log(Level::Warning, event, fields)
    }

    #[track_caller]
    pub fn error<I, K, V>(&self, event: &str, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.log(Level::Error, event, fields)
    }

    #[track_caller]
    pub fn critical<I, K, V>(&self, event: &str, fields: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.log(Level::Critical, event, fields)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("bound", &self.bound.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context;
    use crate::context_map;
    use crate::pipeline::processors::{AddLogLevel, FacilityFilter, InjectContext};
    use crate::sinks::CaptureSink;

    fn capture_logger(name: &str) -> (Logger, Arc<CaptureSink>) {
        let sink = Arc::new(CaptureSink::new());
        let pipeline = Pipeline::new(sink.clone())
            .with_processor(FacilityFilter::with_table([("", Level::Info)].into_iter().collect()))
            .with_processor(AddLogLevel)
            .with_processor(InjectContext);
        (Logger::with_pipeline(name, Arc::new(pipeline)).with_prefix(None), sink)
    }

    #[test]
    fn test_levels_below_minimum_are_dropped() {
        let (logger, sink) = capture_logger("app");

        assert!(!logger.debug("Debug Log Test", context_map!()));
        assert!(logger.info("Info Log Test", context_map!()));
        assert!(logger.warning("Warning Log Test", context_map!()));
        assert!(logger.error("Error Log Test", context_map!()));
        assert!(logger.critical("Critical Log Test", context_map!()));

        let levels: Vec<_> = sink
            .events()
            .iter()
            .map(|e| e["level"].to_string())
            .collect();
        assert_eq!(levels, vec!["info", "warning", "error", "critical"]);
    }

    #[test]
    fn test_prefix_applies_to_undotted_keys() {
        let (logger, sink) = capture_logger("app");
        let logger = logger.with_prefix(Some("footest"));

        logger.info("Message one.", [("a", 1)]);
        let with_ctx = logger.bind(context_map! { "b" => 2, "customprefix.bar" => "baz" });
        with_ctx.info("Message two.", [("a", 1)]);

        let events = sink.events();
        assert_eq!(events[0]["event"], ContextValue::from("Message one."));
        assert_eq!(events[0]["level"], ContextValue::from("info"));
        assert_eq!(events[0]["footest.a"], ContextValue::Int(1));
        assert_eq!(events[1]["footest.b"], ContextValue::Int(2));
        assert_eq!(events[1]["customprefix.bar"], ContextValue::from("baz"));
        assert_eq!(events[1]["footest.a"], ContextValue::Int(1));
    }

    #[test]
    fn test_clear_prefix() {
        let (logger, sink) = capture_logger("test_prefix");
        let mut logger = logger.with_prefix(Some("footest"));
        logger.clear_prefix();

        logger.info("Message one.", [("c", 3)]);
        assert_eq!(sink.events()[0]["c"], ContextValue::Int(3));
    }

    #[test]
    fn test_context_is_attached() {
        let (logger, sink) = capture_logger("app");
        let token = context::set("request_id", "abc");
        logger.info("handled", context_map!());
        context::reset(token).unwrap();

        assert_eq!(sink.events()[0]["request_id"], ContextValue::from("abc"));
    }

    #[test]
    fn test_bind_does_not_change_original() {
        let (logger, sink) = capture_logger("app");
        let _bound = logger.bind([("x", 1)]);
        logger.info("plain", context_map!());
        assert!(!sink.events()[0].contains_key("x"));
    }
}
