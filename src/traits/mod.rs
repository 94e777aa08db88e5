pub mod processor;
pub mod sink;

pub use processor::{Outcome, Processor};
pub use sink::Sink;
