// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-namespace minimum severity.
//!
//! A facility is a dot-delimited logger namespace such as `app.db`. The facility
//! table maps namespace prefixes to a minimum [`Level`]; the empty prefix is the
//! universal default. A logger name is governed by the longest configured prefix
//! it starts with. Names that match nothing are not filtered.

mod level;

pub use level::{Level, UnknownLevel};

use std::collections::HashMap;

use crate::pipeline::EventDict;
use crate::traits::Outcome;

/// Mapping of namespace prefix to minimum level. Entries are only ever added or overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityTable(HashMap<String, Level>);

impl FacilityTable {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, prefix: impl Into<String>, level: Level) {
        self.0.insert(prefix.into(), level);
    }

    /// Add all entries of `other`, overwriting prefixes that already exist.
    pub fn merge(&mut self, other: &FacilityTable) {
        self.0.extend(other.0.iter().map(|(k, v)| (k.clone(), *v)));
    }

    pub fn get(&self, prefix: &str) -> Option<Level> {
        self.0.get(prefix).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Level)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Level)> for FacilityTable {
    fn from_iter<I: IntoIterator<Item = (K, Level)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<HashMap<String, Level>> for FacilityTable {
    fn from(map: HashMap<String, Level>) -> Self {
        Self(map)
    }
}

/// Longest configured prefix of `full_name`, with its level.
pub fn resolve<'t>(full_name: &str, table: &'t FacilityTable) -> Option<(&'t str, Level)> {
    table
        .0
        .iter()
        .filter(|(prefix, _)| full_name.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(prefix, level)| (prefix.as_str(), *level))
}

/// Drop `event` if `level` is below the minimum configured for `logger_name`.
pub fn filter_with(table: &FacilityTable, logger_name: &str, level: Level, event: EventDict) -> Outcome {
    match resolve(logger_name, table) {
        Some((_, min_level)) if level < min_level => Outcome::Drop,
        _ => Outcome::Continue(event),
    }
}

/// [`filter_with`] against the process-wide facility table.
pub fn filter(logger_name: &str, level: Level, event: EventDict) -> Outcome {
    crate::config::registry::with_facilities(|table| filter_with(table, logger_name, level, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_map;

    fn table(entries: &[(&str, Level)]) -> FacilityTable {
        entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_longest_prefix_match() {
        let facilities = table(&[("foo", Level::Info), ("foo.bar", Level::Error)]);

        assert_eq!(resolve("foo", &facilities), Some(("foo", Level::Info)));
        assert_eq!(resolve("foo.bar", &facilities), Some(("foo.bar", Level::Error)));
        assert_eq!(resolve("foo.bar.quux", &facilities), Some(("foo.bar", Level::Error)));
        assert_eq!(resolve("other", &facilities), None);
    }

    #[test]
    fn test_no_match_on_empty_table() {
        assert_eq!(resolve("anything", &FacilityTable::new()), None);
    }

    #[test]
    fn test_empty_prefix_matches_everything() {
        let facilities = table(&[("", Level::Warning), ("app", Level::Debug)]);
        assert_eq!(resolve("unrelated", &facilities), Some(("", Level::Warning)));
        assert_eq!(resolve("app.db", &facilities), Some(("app", Level::Debug)));
    }

    #[test]
    fn test_filter_drops_below_minimum_and_passes_the_rest() {
        let facilities = table(&[("", Level::Info)]);
        let event = context_map! { "event" => "hello", "a" => 1 };

        assert_eq!(
            filter_with(&facilities, "any.logger", Level::Debug, event.clone()),
            Outcome::Drop
        );
        assert_eq!(
            filter_with(&facilities, "any.logger", Level::Info, event.clone()),
            Outcome::Continue(event.clone())
        );
        assert_eq!(
            filter_with(&facilities, "any.logger", Level::Critical, event.clone()),
            Outcome::Continue(event)
        );
    }

    #[test]
    fn test_unconfigured_namespace_is_not_filtered() {
        let facilities = table(&[("app", Level::Critical)]);
        let event = context_map! { "event" => "x" };
        assert_eq!(
            filter_with(&facilities, "lib", Level::Debug, event.clone()),
            Outcome::Continue(event)
        );
    }

    #[test]
    fn test_merge_overwrites_and_keeps_existing() {
        let mut facilities = table(&[("", Level::Info), ("app", Level::Debug)]);
        facilities.merge(&table(&[("app", Level::Error), ("lib", Level::Warning)]));

        assert_eq!(facilities.len(), 3);
        assert_eq!(facilities.get(""), Some(Level::Info));
        assert_eq!(facilities.get("app"), Some(Level::Error));
        assert_eq!(facilities.get("lib"), Some(Level::Warning));
    }
}
