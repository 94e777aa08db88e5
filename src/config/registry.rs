// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide logging state.
//!
//! Three pieces of state live here:
//!
//! * the facility table, merged by every [`configure`] call and never shrunk
//! * the registered monitor factories, deduplicated by name, registration order kept
//! * the active pipeline, replaced by [`configure`] and restored by [`reset`]
//!
//! Loggers created with [`get_logger`] look the active pipeline up on every
//! event, so reconfiguring takes effect for loggers that already exist.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::config::consts::KEY_PREFIX_ENV;
use crate::config::presets::Preset;
use crate::facility::{FacilityTable, Level};
use crate::observability::messages::config::{ConfigurationApplied, DuplicateMonitorIgnored};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{Logger, Pipeline};
use crate::scope::MonitorFactory;
use crate::sinks::StreamSink;
use crate::traits::{Processor, Sink};

static FACILITIES: Lazy<RwLock<FacilityTable>> = Lazy::new(|| RwLock::new(FacilityTable::new()));

static MONITORS: Lazy<RwLock<Vec<Arc<dyn MonitorFactory>>>> = Lazy::new(|| RwLock::new(Vec::new()));

static PIPELINE: Lazy<RwLock<Arc<Pipeline>>> = Lazy::new(|| RwLock::new(default_pipeline()));

static KEY_PREFIX: Lazy<RwLock<Option<String>>> = Lazy::new(|| RwLock::new(None));

fn default_pipeline() -> Arc<Pipeline> {
    Arc::new(Preset::default().build(Arc::new(StreamSink::stdout())))
}

/// Everything one [`configure`] call applies.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use woodchipper::config::{Configuration, Preset};
/// use woodchipper::facility::Level;
/// use woodchipper::sinks::StreamSink;
///
/// let configuration = Configuration::preset(Preset::Json)
///     .sink(Arc::new(StreamSink::stderr()))
///     .facility("", Level::Info)
///     .facility("app.db", Level::Warning);
///
/// woodchipper::configure(configuration);
/// ```
pub struct Configuration {
    label: String,
    processors: Vec<Arc<dyn Processor>>,
    sink: Option<Arc<dyn Sink>>,
    facilities: FacilityTable,
    monitors: Vec<Arc<dyn MonitorFactory>>,
    key_prefix: Option<String>,
}

impl Configuration {
    pub fn preset(preset: Preset) -> Self {
        Self {
            label: preset.as_str().to_string(),
            processors: preset.processors(),
            sink: None,
            facilities: FacilityTable::new(),
            monitors: Vec::new(),
            key_prefix: None,
        }
    }

    /// A pipeline made of exactly these processors.
    pub fn custom(processors: Vec<Arc<dyn Processor>>) -> Self {
        Self {
            label: "custom".to_string(),
            processors,
            ..Self::preset(Preset::default())
        }
    }

    /// Where surviving events go. Defaults to JSON lines on stdout.
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn facility(mut self, prefix: impl Into<String>, level: Level) -> Self {
        self.facilities.insert(prefix, level);
        self
    }

    pub fn facilities(mut self, table: FacilityTable) -> Self {
        self.facilities.merge(&table);
        self
    }

    pub fn monitor(mut self, factory: Arc<dyn MonitorFactory>) -> Self {
        self.monitors.push(factory);
        self
    }

    pub fn monitors(mut self, factories: impl IntoIterator<Item = Arc<dyn MonitorFactory>>) -> Self {
        self.monitors.extend(factories);
        self
    }

    /// Key prefix used when `WOODCHIPPER_KEY_PREFIX` is not set.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

/// Apply `configuration` process-wide.
///
/// Facilities and monitors are merged into what is already registered; the
/// pipeline is replaced.
pub fn configure(configuration: Configuration) {
    let Configuration {
        label,
        processors,
        sink,
        facilities,
        monitors,
        key_prefix,
    } = configuration;

    let facility_count = {
        let mut table = FACILITIES.write();
        table.merge(&facilities);
        table.len()
    };

    let monitor_count = {
        let mut registered = MONITORS.write();
        for factory in monitors {
            if registered.iter().any(|m| m.name() == factory.name()) {
                DuplicateMonitorIgnored {
                    monitor: factory.name(),
                }
                .log();
                continue;
            }
            registered.push(factory);
        }
        registered.len()
    };

    if key_prefix.is_some() {
        *KEY_PREFIX.write() = key_prefix;
    }

    let sink = sink.unwrap_or_else(|| Arc::new(StreamSink::stdout()));
    *PIPELINE.write() = Arc::new(Pipeline::new(sink).with_processors(processors));

    ConfigurationApplied {
        pipeline: &label,
        facility_count,
        monitor_count,
    }
    .log();
}

/// Restore the default pipeline and forget the configured key prefix.
///
/// Facilities and monitors stay registered.
pub fn reset() {
    *PIPELINE.write() = default_pipeline();
    *KEY_PREFIX.write() = None;
}

/// A logger routed through whatever pipeline is active when it logs.
pub fn get_logger(name: impl Into<String>) -> Logger {
    Logger::new(name)
}

/// Registered monitor factories, in registration order.
pub fn get_monitors() -> Vec<Arc<dyn MonitorFactory>> {
    MONITORS.read().clone()
}

/// A snapshot of the facility table.
pub fn get_facilities() -> FacilityTable {
    FACILITIES.read().clone()
}

pub(crate) fn with_facilities<R>(f: impl FnOnce(&FacilityTable) -> R) -> R {
    f(&FACILITIES.read())
}

pub(crate) fn active_pipeline() -> Arc<Pipeline> {
    PIPELINE.read().clone()
}

/// `WOODCHIPPER_KEY_PREFIX` if set and non-empty, else the configured prefix.
pub(crate) fn ambient_prefix() -> Option<String> {
    std::env::var(KEY_PREFIX_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .or_else(|| KEY_PREFIX.read().clone())
}

/// Serializes tests that swap the active pipeline.
#[cfg(test)]
pub(crate) fn exclusive() -> parking_lot::MutexGuard<'static, ()> {
    static LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
    LOCK.lock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextMap, ContextValue};
    use crate::context_map;
    use crate::scope::{monitor_fn, Monitor};
    use crate::sinks::CaptureSink;

    struct Noop;

    impl Monitor for Noop {
        fn setup(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn finish(&mut self) -> anyhow::Result<ContextMap> {
            Ok(ContextMap::new())
        }
    }

    #[test]
    fn test_facilities_merge_and_are_never_removed() {
        configure_facilities_only(&[("registry_test.a", Level::Warning)]);
        configure_facilities_only(&[("registry_test.b", Level::Error)]);

        let table = get_facilities();
        assert_eq!(table.get("registry_test.a"), Some(Level::Warning));
        assert_eq!(table.get("registry_test.b"), Some(Level::Error));

        configure_facilities_only(&[("registry_test.a", Level::Debug)]);
        assert_eq!(get_facilities().get("registry_test.a"), Some(Level::Debug));
        assert_eq!(get_facilities().get("registry_test.b"), Some(Level::Error));
    }

    #[test]
    fn test_monitors_deduplicated_by_name() {
        let _guard = exclusive();
        configure(
            Configuration::preset(Preset::Minimal)
                .sink(Arc::new(CaptureSink::new()))
                .monitor(monitor_fn("registry_test.noop", || Box::new(Noop)))
                .monitor(monitor_fn("registry_test.noop", || Box::new(Noop))),
        );

        let names: Vec<String> = get_monitors()
            .iter()
            .map(|m| m.name().to_string())
            .filter(|n| n == "registry_test.noop")
            .collect();
        assert_eq!(names.len(), 1);
        reset();
    }

    #[test]
    fn test_configure_swaps_pipeline_and_reset_restores_default() {
        let _guard = exclusive();
        let sink = Arc::new(CaptureSink::new());
        configure(Configuration::preset(Preset::Minimal).sink(sink.clone()));

        let logger = get_logger("registry_test.swap");
        assert!(logger.info("hello", context_map!()));

        let mine: Vec<_> = sink
            .entries()
            .into_iter()
            .filter(|e| e.logger == "registry_test.swap")
            .collect();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].fields["logger"], ContextValue::from("registry_test.swap"));

        reset();
        assert_eq!(active_pipeline().sink().name(), "stdout");
        assert_eq!(
            active_pipeline().processor_names(),
            Preset::default().build(sink).processor_names()
        );
    }

    fn configure_facilities_only(entries: &[(&str, Level)]) {
        let _guard = exclusive();
        configure(
            Configuration::preset(Preset::Minimal)
                .sink(Arc::new(CaptureSink::new()))
                .facilities(entries.iter().map(|(k, v)| (*k, *v)).collect()),
        );
        reset();
    }
}
