//! Cross-attempt field-test usage counters.
//!
//! One [`FieldTestUsage`] instance lives for the whole process and is shared by
//! every assembly pass. For each segment key it keeps a list of
//! `(group key, occurrences)` counters sorted by ascending occurrences, so the
//! next selection always starts from the least-used groups.
//!
//! # Concurrency
//!
//! Segment keys live in a `DashMap`; each segment's counter list sits behind its
//! own `parking_lot::Mutex`. [`FieldTestUsage::claim_least_used`] registers new
//! groups, picks, increments and re-sorts under that single lock, so concurrent
//! attempts on the same segment never lose an update and never pick from a
//! half-updated ordering. Different segments never contend.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// How often one group key has been handed out for a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUsage {
    pub group_key: String,
    pub occurrences: u64,
}

impl GroupUsage {
    fn unused(group_key: &str) -> Self {
        Self {
            group_key: group_key.to_string(),
            occurrences: 0,
        }
    }
}

/// Ascending occurrences, ties broken by group key.
fn sort_least_used_first(counters: &mut [GroupUsage]) {
    counters.sort_by(|a, b| {
        a.occurrences
            .cmp(&b.occurrences)
            .then_with(|| a.group_key.cmp(&b.group_key))
    });
}

type CounterList = Arc<Mutex<Vec<GroupUsage>>>;

/// Process-wide usage counters keyed by segment key.
#[derive(Debug, Default)]
pub struct FieldTestUsage {
    segments: DashMap<String, CounterList>,
}

impl FieldTestUsage {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self, segment_key: &str) -> CounterList {
        if let Some(existing) = self.segments.get(segment_key) {
            return Arc::clone(existing.value());
        }
        Arc::clone(
            self.segments
                .entry(segment_key.to_string())
                .or_default()
                .value(),
        )
    }

    /// Sorted copy of a segment's counters; empty if the segment was never used.
    pub fn snapshot(&self, segment_key: &str) -> Vec<GroupUsage> {
        let list = self
            .segments
            .get(segment_key)
            .map(|entry| Arc::clone(entry.value()));
        match list {
            Some(list) => list.lock().clone(),
            None => Vec::new(),
        }
    }

    pub fn occurrences(&self, segment_key: &str, group_key: &str) -> Option<u64> {
        self.snapshot(segment_key)
            .into_iter()
            .find(|usage| usage.group_key == group_key)
            .map(|usage| usage.occurrences)
    }

    pub fn is_tracking(&self, segment_key: &str) -> bool {
        self.segments.contains_key(segment_key)
    }

    /// Pick least-used groups until their item counts reach `wanted`.
    ///
    /// `eligible` maps each candidate group key to its item count. Every eligible
    /// key is registered (picked or not) so other attempts see it; each picked
    /// key's counter is incremented. Returns the picked keys in pick order.
    pub fn claim_least_used(
        &self,
        segment_key: &str,
        eligible: &HashMap<String, u32>,
        wanted: u32,
    ) -> Vec<String> {
        let list = self.counters(segment_key);
        let mut counters = list.lock();

        let mut fresh: Vec<&str> = eligible.keys().map(String::as_str).collect();
        fresh.sort_unstable();
        register_unseen(&mut counters, fresh);
        sort_least_used_first(&mut counters);

        let mut remaining = eligible.clone();
        let mut claimed = Vec::new();
        let mut item_total: u32 = 0;
        for usage in counters.iter_mut() {
            if item_total >= wanted {
                break;
            }
            if let Some(item_count) = remaining.remove(&usage.group_key) {
                usage.occurrences += 1;
                item_total = item_total.saturating_add(item_count);
                claimed.push(usage.group_key.clone());
            }
        }

        sort_least_used_first(&mut counters);
        claimed
    }
}

/// New groups go to the front so they are tried before any already-used group.
fn register_unseen<'a, I>(counters: &mut Vec<GroupUsage>, group_keys: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for group_key in group_keys {
        if !counters.iter().any(|usage| usage.group_key == group_key) {
            counters.insert(0, GroupUsage::unused(group_key));
        }
    }
}
