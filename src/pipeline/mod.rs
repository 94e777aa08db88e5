// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The event pipeline: an ordered list of processors ending in a sink.
//!
//! # Architecture
//!
//! ```text
//! Logger::info("msg", fields)
//!     → Record { logger, level, callsite } + EventDict
//!     → FacilityFilter  (may Drop; runs first so dropped events cost little)
//!     → enrichment steps (level, logger name, timestamp, callsite, context)
//!     → Sink::emit
//! ```
//!
//! A [`Outcome::Drop`] from any step short-circuits the rest and the sink is
//! never called.

mod event;
mod logger;
pub mod processors;

pub use event::{EventDict, Record, EVENT_KEY};
pub use logger::Logger;

use std::fmt;
use std::sync::Arc;

use crate::observability::messages::{pipeline::EventDropped, StructuredLog};
use crate::traits::{Outcome, Processor, Sink};

/// Processors in run order plus the sink that receives surviving events.
#[derive(Clone)]
pub struct Pipeline {
    processors: Vec<Arc<dyn Processor>>,
    sink: Arc<dyn Sink>,
}

impl Pipeline {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            processors: Vec::new(),
            sink,
        }
    }

    /// Append a step to the end of the pipeline.
    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    pub fn with_processors(mut self, processors: Vec<Arc<dyn Processor>>) -> Self {
        self.processors.extend(processors);
        self
    }

    pub fn processor_names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Run `event` through every step. Returns `true` if it reached the sink.
    pub fn run(&self, record: &Record<'_>, event: EventDict) -> bool {
        let mut event = event;
        for processor in &self.processors {
            match processor.process(record, event) {
                Outcome::Continue(next) => event = next,
                Outcome::Drop => {
                    EventDropped {
                        logger: record.logger,
                        level: record.level.as_str(),
                        processor: processor.name(),
                    }
                    .log();
                    return false;
                }
            }
        }

        self.sink.emit(record, event);
        true
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("processors", &self.processor_names())
            .field("sink", &self.sink.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_map;
    use crate::facility::Level;
    use crate::sinks::CaptureSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    impl Processor for Counting {
        fn process(&self, _record: &Record<'_>, event: EventDict) -> Outcome {
            self.0.fetch_add(1, Ordering::SeqCst);
            Outcome::Continue(event)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct Tag(&'static str, i64);

    impl Processor for Tag {
        fn process(&self, _record: &Record<'_>, mut event: EventDict) -> Outcome {
            event.insert(self.0.to_string(), self.1.into());
            Outcome::Continue(event)
        }

        fn name(&self) -> &'static str {
            "tag"
        }
    }

    struct DropAll;

    impl Processor for DropAll {
        fn process(&self, _record: &Record<'_>, _event: EventDict) -> Outcome {
            Outcome::Drop
        }

        fn name(&self) -> &'static str {
            "drop_all"
        }
    }

    #[test]
    fn test_steps_run_in_order() {
        let sink = Arc::new(CaptureSink::new());
        let pipeline = Pipeline::new(sink.clone())
            .with_processor(Tag("k", 1))
            .with_processor(Tag("k", 2));

        assert!(pipeline.run(&Record::new("app", Level::Info), EventDict::new()));
        assert_eq!(sink.events(), vec![context_map! { "k" => 2 }]);
    }

    #[test]
    fn test_drop_short_circuits() {
        let sink = Arc::new(CaptureSink::new());
        let after = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(sink.clone())
            .with_processor(DropAll)
            .with_processor(Counting(after.clone()));

        assert!(!pipeline.run(&Record::new("app", Level::Info), EventDict::new()));
        assert_eq!(after.load(Ordering::SeqCst), 0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_debug_lists_processor_names() {
        let pipeline = Pipeline::new(Arc::new(CaptureSink::new())).with_processor(DropAll);
        let rendered = format!("{:?}", pipeline);
        assert!(rendered.contains("drop_all"));
        assert!(rendered.contains("capture"));
    }
}
