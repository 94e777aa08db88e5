use crate::pipeline::{EventDict, Record};

/// Result of one pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Hand the (possibly updated) fields to the next step.
    Continue(EventDict),
    /// Stop here; the event is never rendered.
    Drop,
}

/// One event-transforming step of the pipeline.
pub trait Processor: Send + Sync {
    fn process(&self, record: &Record<'_>, event: EventDict) -> Outcome;

    fn name(&self) -> &'static str;
}
