//! Round-robin form selection for fixed-form segments.
//!
//! Each segment key has a rotation counter. The first request for a segment gets
//! its first form; every later request advances to the next form, wrapping
//! around. Counters idle for longer than the configured timeout are treated as
//! fresh, so rotation restarts at the first form.

use crate::core::{Form, Segment};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct Rotation {
    index: usize,
    last_used: DateTime<Utc>,
}

#[derive(Debug)]
pub struct FormSelector {
    rotations: DashMap<String, Rotation>,
    idle_timeout: chrono::Duration,
}

impl FormSelector {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            rotations: DashMap::new(),
            idle_timeout: chrono::Duration::from_std(idle_timeout)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Next form for `segment` in `language`, or `None` when it has none.
    pub fn select<'a>(
        &self,
        segment: &'a Segment,
        language: &str,
        now: DateTime<Utc>,
    ) -> Option<&'a Form> {
        let forms: Vec<&Form> = segment.forms_in_language(language).collect();
        match forms.len() {
            0 => None,
            1 => Some(forms[0]),
            count => Some(forms[self.next_index(&segment.key, count, now)]),
        }
    }

    /// First form in `language` that belongs to `cohort`.
    pub fn select_for_cohort<'a>(
        segment: &'a Segment,
        language: &str,
        cohort: &str,
    ) -> Option<&'a Form> {
        segment
            .forms_in_language(language)
            .find(|form| form.cohort == cohort)
    }

    fn next_index(&self, segment_key: &str, form_count: usize, now: DateTime<Utc>) -> usize {
        match self.rotations.entry(segment_key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let rotation = occupied.get_mut();
                rotation.index = if now - rotation.last_used >= self.idle_timeout {
                    0
                } else {
                    (rotation.index + 1) % form_count
                };
                rotation.last_used = now;
                rotation.index
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Rotation {
                    index: 0,
                    last_used: now,
                });
                0
            }
        }
    }

    /// Drop counters idle for longer than the timeout.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let before = self.rotations.len();
        self.rotations
            .retain(|_, rotation| now - rotation.last_used < self.idle_timeout);
        before - self.rotations.len()
    }

    pub fn tracked_segments(&self) -> usize {
        self.rotations.len()
    }
}
