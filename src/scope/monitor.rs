// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::ContextMap;

/// Measures a resource over the lifetime of one logging scope.
///
/// A fresh monitor is created for every scope entry. `setup` runs after the
/// scope's fields are installed; `finish` runs at exit and returns fields that
/// are added to the exit event. Both hooks are expected to be fast and must
/// not block on I/O.
pub trait Monitor: Send {
    fn setup(&mut self) -> anyhow::Result<()>;

    fn finish(&mut self) -> anyhow::Result<ContextMap>;
}

/// Creates monitors. Registered process-wide, deduplicated by `name`.
pub trait MonitorFactory: Send + Sync {
    fn name(&self) -> &str;

    fn create(&self) -> Box<dyn Monitor>;
}

/// Factory for any `Monitor + Default`, named after the monitor type.
pub struct DefaultMonitorFactory<M> {
    _monitor: PhantomData<fn() -> M>,
}

impl<M> MonitorFactory for DefaultMonitorFactory<M>
where
    M: Monitor + Default + 'static,
{
    fn name(&self) -> &str {
        type_name::<M>()
    }

    fn create(&self) -> Box<dyn Monitor> {
        Box::new(M::default())
    }
}

/// Factory backed by a closure.
pub struct FnMonitorFactory<F> {
    name: String,
    create: F,
}

impl<F> MonitorFactory for FnMonitorFactory<F>
where
    F: Fn() -> Box<dyn Monitor> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self) -> Box<dyn Monitor> {
        (self.create)()
    }
}

/// Factory for a `Monitor + Default` type.
pub fn monitor_factory<M>() -> Arc<dyn MonitorFactory>
where
    M: Monitor + Default + 'static,
{
    Arc::new(DefaultMonitorFactory::<M> {
        _monitor: PhantomData,
    })
}

/// Factory that calls `create` for every scope entry.
pub fn monitor_fn<F>(name: impl Into<String>, create: F) -> Arc<dyn MonitorFactory>
where
    F: Fn() -> Box<dyn Monitor> + Send + Sync + 'static,
{
    Arc::new(FnMonitorFactory {
        name: name.into(),
        create,
    })
}

impl fmt::Debug for dyn MonitorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MonitorFactory({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_map;

    #[derive(Default)]
    struct Counter {
        started: bool,
    }

    impl Monitor for Counter {
        fn setup(&mut self) -> anyhow::Result<()> {
            self.started = true;
            Ok(())
        }

        fn finish(&mut self) -> anyhow::Result<ContextMap> {
            Ok(context_map! { "counter.started" => self.started })
        }
    }

    #[test]
    fn test_default_factory_creates_fresh_monitors() {
        let factory = monitor_factory::<Counter>();
        assert!(factory.name().ends_with("Counter"));

        let mut first = factory.create();
        first.setup().unwrap();
        let mut second = factory.create();

        assert_eq!(first.finish().unwrap(), context_map! { "counter.started" => true });
        assert_eq!(second.finish().unwrap(), context_map! { "counter.started" => false });
    }

    #[test]
    fn test_fn_factory_uses_given_name() {
        let factory = monitor_fn("counter", || Box::new(Counter::default()));
        assert_eq!(factory.name(), "counter");
        assert_eq!(format!("{:?}", factory), "MonitorFactory(counter)");
    }
}
