// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Nested logging scopes, an argument logger and a monitor, rendered through
//! `tracing`.
//!
//! ```text
//! RUST_LOG=debug cargo run --example context_demo
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use woodchipper::config::Preset;
use woodchipper::scope::monitor_factory;
use woodchipper::sinks::TracingSink;
use woodchipper::{
    context_map, get_logger, ArgLogger, Arguments, Configuration, ContextMap, Level,
    LoggingContext, Monitor, Signature,
};

/// Reports wall-clock time spent in each scope.
#[derive(Default)]
struct WallClock {
    started: Option<Instant>,
}

impl Monitor for WallClock {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.started = Some(Instant::now());
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<ContextMap> {
        let started = self
            .started
            .ok_or_else(|| anyhow::anyhow!("finish called before setup"))?;
        Ok(context_map! { "wall_clock.elapsed_ms" => started.elapsed().as_millis() as u64 })
    }
}

fn nested(product: &serde_json::Value) {
    let logger = get_logger("demo.context");
    LoggingContext::new(context_map! { "product" => product["id"].as_str() })
        .name("demo:nested")
        .run(|| logger.info("Context two.", context_map!()));
}

fn with_context(product: &serde_json::Value, exit_level: Level) {
    let logger = get_logger("demo.context");
    LoggingContext::new(context_map! { "vendor" => product["vendor"].as_str() })
        .name("demo:with_context")
        .exit_level(exit_level)
        .run(|| {
            logger.info("Context one.", context_map!());
            nested(product);
            logger.info("Context three.", context_map!());
        });
    logger.info("Context four.", context_map!());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    woodchipper::configure(
        Configuration::preset(Preset::Dev)
            .sink(Arc::new(TracingSink))
            .facility("", Level::Debug)
            .monitor(monitor_factory::<WallClock>())
            .key_prefix("tkl"),
    );

    let product = serde_json::json!({ "vendor": "DEMOVENDOR", "id": "DEMOPRODUCT" });

    let decorated = ArgLogger::builder(Signature::new().required("product"))
        .path("vendor", "product.vendor")
        .name("demo:decorated")
        .build()?;
    decorated.call(&Arguments::new().arg(&product), || {
        get_logger("demo.context").info("Decorated.", context_map!());
    })?;

    with_context(&product, Level::Info);
    with_context(&product, Level::Debug);

    let logger = get_logger("demo.context");
    LoggingContext::new(context_map! { "task" => "async" })
        .name("demo:async")
        .run_async(async move {
            tokio::task::yield_now().await;
            logger.info("Still in context after await.", context_map!());
        })
        .await;

    Ok(())
}
