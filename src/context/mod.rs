// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scoped logging context shared by everything that logs within one logical flow.

mod future;
pub mod store;
mod value;

pub use future::{capture, spawn, CapturedContext, ContextFuture, FutureExt};
pub use store::{as_map, flow_id, get, is_empty, len, remove, reset, set, update, FlowId, Token};
pub use value::{ContextMap, ContextValue};
