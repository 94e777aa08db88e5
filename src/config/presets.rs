// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::pipeline::processors::{
    AddLogLevel, AddLoggerName, CallsiteAdder, FacilityFilter, InjectContext, TimeStamper,
};
use crate::pipeline::Pipeline;
use crate::traits::{Processor, Sink};

/// Ready-made processor chains.
///
/// Every preset starts with the global [`FacilityFilter`] so that filtered
/// events skip the enrichment steps entirely.
///
/// # Variants
/// * `Minimal` - level and logger name only, mostly useful in tests
/// * `Dev` - adds timestamp, callsite and the current logging context
/// * `Json` - same steps as `Dev`, intended for machine-read JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Minimal,
    #[default]
    Dev,
    Json,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Dev => "dev",
            Preset::Json => "json",
        }
    }

    pub fn processors(&self) -> Vec<Arc<dyn Processor>> {
        let mut steps: Vec<Arc<dyn Processor>> = vec![
            Arc::new(FacilityFilter::global()),
            Arc::new(AddLogLevel),
            Arc::new(AddLoggerName),
        ];

        if matches!(self, Preset::Dev | Preset::Json) {
            steps.push(Arc::new(TimeStamper::default()));
            steps.push(Arc::new(CallsiteAdder));
            steps.push(Arc::new(InjectContext));
        }

        steps
    }

    pub fn build(&self, sink: Arc<dyn Sink>) -> Pipeline {
        Pipeline::new(sink).with_processors(self.processors())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::CaptureSink;

    #[test]
    fn test_preset_steps() {
        let test_cases = vec![
            (Preset::Minimal, vec!["facility_filter", "add_log_level", "add_logger_name"]),
            (
                Preset::Dev,
                vec![
                    "facility_filter",
                    "add_log_level",
                    "add_logger_name",
                    "time_stamper",
                    "callsite_adder",
                    "inject_context",
                ],
            ),
        ];

        for (preset, expected) in test_cases {
            let pipeline = preset.build(Arc::new(CaptureSink::new()));
            assert_eq!(pipeline.processor_names(), expected, "preset {}", preset);
        }
    }

    #[test]
    fn test_preset_from_yaml() {
        let preset: Preset = serde_yaml::from_str("json").unwrap();
        assert_eq!(preset, Preset::Json);
    }
}
