use crate::pipeline::{EventDict, Record};

/// Destination for events that made it through the pipeline.
///
/// Rendering and transport live behind this trait; the pipeline only promises
/// to call `emit` once per surviving event.
pub trait Sink: Send + Sync {
    fn emit(&self, record: &Record<'_>, event: EventDict);

    fn name(&self) -> &'static str;
}
