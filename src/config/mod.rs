// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod consts;
mod loader;
mod presets;
pub(crate) mod registry;

pub use loader::{
    configure_from_file, load_and_validate_config, load_config, LoggingConfig, SinkTarget,
};
pub use presets::Preset;
pub use registry::{configure, get_facilities, get_logger, get_monitors, reset, Configuration};
