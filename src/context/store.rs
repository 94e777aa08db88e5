// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flow-local, copy-on-write logging context.
//!
//! Every logical flow (an OS thread, or a future wrapped with
//! [`FutureExt::in_current_context`](super::FutureExt::in_current_context))
//! owns exactly one active [`ContextMap`]. The map is never mutated in place:
//! each update clones it, applies the change and installs the clone, handing back
//! a [`Token`] that remembers the map that was active before.
//!
//! ```
//! use woodchipper::context::{self, ContextValue};
//! use woodchipper::context_map;
//!
//! let token = context::update(context_map! { "request_id" => "abc" }).unwrap();
//! assert_eq!(context::get("request_id"), Some(ContextValue::from("abc")));
//!
//! context::reset(token).unwrap();
//! assert!(context::as_map().is_empty());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::context::{ContextMap, ContextValue};
use crate::errors::{ContextError, ContextResult};
use crate::observability::messages::{context::ForeignTokenRejected, StructuredLog};

static NEXT_FLOW_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one logical flow of execution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlowId(u64);

impl FlowId {
    fn next() -> Self {
        FlowId(NEXT_FLOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The state owned by one flow: its id and its active mapping.
#[derive(Clone, Debug)]
pub(crate) struct Flow {
    id: FlowId,
    map: Arc<ContextMap>,
}

impl Flow {
    fn root() -> Self {
        Flow {
            id: FlowId::next(),
            map: Arc::new(ContextMap::new()),
        }
    }

    /// A new flow that starts from a copy of this one's mapping.
    pub(crate) fn fork(&self) -> Self {
        Flow {
            id: FlowId::next(),
            map: Arc::clone(&self.map),
        }
    }

    pub(crate) fn with_entries(mut self, entries: ContextMap) -> Self {
        if !entries.is_empty() {
            let mut updated = (*self.map).clone();
            updated.extend(entries);
            self.map = Arc::new(updated);
        }
        self
    }
}

thread_local! {
    static CURRENT: RefCell<Flow> = RefCell::new(Flow::root());
}

/// Handle to the mapping that was active before an update.
///
/// Tokens are consumed by [`reset`], so each one restores state at most once.
#[must_use = "dropping a token makes the update impossible to undo"]
#[derive(Debug)]
pub struct Token {
    flow: FlowId,
    previous: Arc<ContextMap>,
}

impl Token {
    pub fn flow(&self) -> FlowId {
        self.flow
    }
}

/// Install a new mapping for the current flow, returning the token for the old one.
fn replace(map: ContextMap) -> Token {
    CURRENT.with(|current| {
        let mut flow = current.borrow_mut();
        let previous = std::mem::replace(&mut flow.map, Arc::new(map));
        Token {
            flow: flow.id,
            previous,
        }
    })
}

fn snapshot_arc() -> Arc<ContextMap> {
    CURRENT.with(|current| Arc::clone(&current.borrow().map))
}

/// Id of the flow the caller is running in.
pub fn flow_id() -> FlowId {
    CURRENT.with(|current| current.borrow().id)
}

/// Read one key from the current flow's mapping. Absent keys yield `None`.
pub fn get(key: &str) -> Option<ContextValue> {
    CURRENT.with(|current| current.borrow().map.get(key).cloned())
}

/// Merge `entries` into a copy of the active mapping and install the copy.
///
/// Fails with [`ContextError::EmptyUpdate`] when `entries` is empty.
pub fn update<I, K, V>(entries: I) -> ContextResult<Token>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ContextValue>,
{
    let mut entries = entries.into_iter().peekable();
    if entries.peek().is_none() {
        return Err(ContextError::EmptyUpdate);
    }

    let mut updated = (*snapshot_arc()).clone();
    updated.extend(entries.map(|(k, v)| (k.into(), v.into())));
    Ok(replace(updated))
}

/// Set a single key.
pub fn set(key: impl Into<String>, value: impl Into<ContextValue>) -> Token {
    let mut updated = (*snapshot_arc()).clone();
    updated.insert(key.into(), value.into());
    replace(updated)
}

/// Remove a single key. Returns `None` and leaves the store alone if the key is absent.
pub fn remove(key: &str) -> Option<Token> {
    let current = snapshot_arc();
    if !current.contains_key(key) {
        return None;
    }

    let mut updated = (*current).clone();
    updated.remove(key);
    Some(replace(updated))
}

/// Restore the mapping captured by `token`, discarding whatever is active now.
///
/// Tokens from other flows are rejected and the current flow is left untouched.
pub fn reset(token: Token) -> ContextResult<()> {
    let issued_in = token.flow;
    let current = CURRENT.with(|current| {
        let mut flow = current.borrow_mut();
        if flow.id != issued_in {
            return Err(flow.id);
        }
        flow.map = token.previous;
        Ok(())
    });

    // Logged after the borrow ends so subscribers may read the context.
    current.map_err(|current| {
        ForeignTokenRejected {
            issued_in: issued_in.as_u64(),
            current: current.as_u64(),
        }
        .log();
        ContextError::ForeignToken {
            issued_in: issued_in.as_u64(),
            current: current.as_u64(),
        }
    })
}

/// Independent copy of the current flow's mapping.
pub fn as_map() -> ContextMap {
    (*snapshot_arc()).clone()
}

pub fn len() -> usize {
    CURRENT.with(|current| current.borrow().map.len())
}

pub fn is_empty() -> bool {
    len() == 0
}

/// Copy of the current flow, used to seed child flows.
pub(crate) fn current_flow() -> Flow {
    CURRENT.with(|current| current.borrow().clone())
}

/// Exchange the thread's active flow with `flow`.
pub(crate) fn swap_flow(flow: &mut Flow) {
    CURRENT.with(|current| std::mem::swap(&mut *current.borrow_mut(), flow));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_map;

    #[test]
    fn test_starts_empty_and_get_missing_is_none() {
        assert!(is_empty());
        assert_eq!(get("nope"), None);
    }

    #[test]
    fn test_tokens_restore_each_prior_stage() {
        let tkn1 = update(context_map! { "a" => 1, "b" => 2 }).unwrap();
        assert_eq!(as_map(), context_map! { "a" => 1, "b" => 2 });

        let tkn2 = update(context_map! { "a" => 3, "c" => 4 }).unwrap();
        assert_eq!(as_map(), context_map! { "a" => 3, "b" => 2, "c" => 4 });
        assert_eq!(get("a"), Some(ContextValue::Int(3)));

        reset(tkn2).unwrap();
        assert_eq!(as_map(), context_map! { "a" => 1, "b" => 2 });
        reset(tkn1).unwrap();
        assert!(as_map().is_empty());
    }

    #[test]
    fn test_lifo_restore_over_many_updates() {
        let mut snapshots = Vec::new();
        let mut tokens = Vec::new();
        for i in 0..5 {
            snapshots.push(as_map());
            tokens.push(update([(format!("k{}", i % 3), i)]).unwrap());
        }

        while let Some(token) = tokens.pop() {
            reset(token).unwrap();
            assert_eq!(as_map(), snapshots.pop().unwrap());
        }
    }

    #[test]
    fn test_out_of_order_reset_installs_captured_state() {
        let tkn1 = update([("a", 1)]).unwrap();
        let tkn2 = update([("b", 2)]).unwrap();

        reset(tkn1).unwrap();
        assert!(as_map().is_empty());

        // The later token still restores exactly what it captured.
        reset(tkn2).unwrap();
        assert_eq!(as_map(), context_map! { "a" => 1 });
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let result = update(ContextMap::new());
        assert_eq!(result.unwrap_err(), ContextError::EmptyUpdate);
        assert!(is_empty());
    }

    #[test]
    fn test_set_and_remove() {
        let set_token = set("a", "x");
        assert_eq!(get("a"), Some(ContextValue::from("x")));

        let remove_token = remove("a").expect("key is present");
        assert_eq!(get("a"), None);
        assert!(remove("a").is_none());

        reset(remove_token).unwrap();
        assert_eq!(get("a"), Some(ContextValue::from("x")));
        reset(set_token).unwrap();
        assert!(is_empty());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let token = set("a", 1);
        let mut snapshot = as_map();
        snapshot.insert("b".to_string(), ContextValue::Int(2));
        assert_eq!(len(), 1);
        reset(token).unwrap();
    }

    #[test]
    fn test_threads_are_isolated() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let key = format!("thread_{}", i);
                    let token = update([(key.clone(), i)]).unwrap();
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    let seen = as_map();
                    reset(token).unwrap();
                    (key, seen)
                })
            })
            .collect();

        for handle in handles {
            let (key, seen) = handle.join().unwrap();
            assert_eq!(seen.len(), 1);
            assert!(seen.contains_key(&key));
        }
    }

    #[test]
    fn test_foreign_token_is_rejected() {
        let token = std::thread::spawn(|| set("a", 1)).join().unwrap();
        let other = set("b", 2);

        let err = reset(token).unwrap_err();
        assert!(matches!(err, ContextError::ForeignToken { .. }));
        assert_eq!(as_map(), context_map! { "b" => 2 });

        reset(other).unwrap();
    }

    struct ReadsContext(Arc<parking_lot::Mutex<Vec<ContextMap>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ReadsContext {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
            self.0.lock().push(as_map());
        }
    }

    #[test]
    fn test_foreign_token_diagnostic_may_read_context() {
        use tracing_subscriber::layer::SubscriberExt;

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(ReadsContext(seen.clone()));

        let token = std::thread::spawn(|| set("a", 1)).join().unwrap();
        let other = set("b", 2);
        let result = tracing::subscriber::with_default(subscriber, || reset(token));

        assert!(matches!(result, Err(ContextError::ForeignToken { .. })));
        assert_eq!(*seen.lock(), vec![context_map! { "b" => 2 }]);
        reset(other).unwrap();
    }
}
