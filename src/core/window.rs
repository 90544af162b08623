//! Date windows with optional bounds.
//!
//! Field-test windows are configured with nullable start and end dates. In memory
//! the four combinations are explicit variants, so "is the window open" never
//! depends on null checks scattered through the callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "WindowBounds", into = "WindowBounds")]
pub enum DateWindow {
    /// Open-ended in both directions
    #[default]
    Unbounded,
    /// Open from `start` onwards
    StartingAt(DateTime<Utc>),
    /// Open until `end`
    EndingAt(DateTime<Utc>),
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl DateWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        match (start, end) {
            (None, None) => DateWindow::Unbounded,
            (Some(start), None) => DateWindow::StartingAt(start),
            (None, Some(end)) => DateWindow::EndingAt(end),
            (Some(start), Some(end)) => DateWindow::Between { start, end },
        }
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self {
            DateWindow::StartingAt(start) | DateWindow::Between { start, .. } => Some(*start),
            _ => None,
        }
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        match self {
            DateWindow::EndingAt(end) | DateWindow::Between { end, .. } => Some(*end),
            _ => None,
        }
    }

    /// Open iff the start (if any) is in the past and the end (if any) in the future.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.start().is_none_or(|start| start < now) && self.end().is_none_or(|end| end > now)
    }
}

/// Wire shape: `{ "start": <date|null>, "end": <date|null> }`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct WindowBounds {
    #[serde(default)]
    start: Option<DateTime<Utc>>,
    #[serde(default)]
    end: Option<DateTime<Utc>>,
}

impl From<WindowBounds> for DateWindow {
    fn from(bounds: WindowBounds) -> Self {
        DateWindow::new(bounds.start, bounds.end)
    }
}

impl From<DateWindow> for WindowBounds {
    fn from(window: DateWindow) -> Self {
        WindowBounds {
            start: window.start(),
            end: window.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_unbounded_is_always_open() {
        assert!(DateWindow::Unbounded.is_open_at(now()));
    }

    #[test]
    fn test_bounds_must_straddle_now() {
        let past = now() - Duration::days(1);
        let future = now() + Duration::days(1);

        assert!(DateWindow::StartingAt(past).is_open_at(now()));
        assert!(!DateWindow::StartingAt(future).is_open_at(now()));
        assert!(DateWindow::EndingAt(future).is_open_at(now()));
        assert!(!DateWindow::EndingAt(past).is_open_at(now()));
        assert!(DateWindow::new(Some(past), Some(future)).is_open_at(now()));
        assert!(!DateWindow::new(Some(future), Some(future + Duration::days(1))).is_open_at(now()));
    }

    #[test]
    fn test_boundary_instants_are_closed() {
        assert!(!DateWindow::StartingAt(now()).is_open_at(now()));
        assert!(!DateWindow::EndingAt(now()).is_open_at(now()));
    }

    #[test]
    fn test_json_uses_nullable_bounds() {
        let window: DateWindow =
            serde_json::from_str(r#"{"start":"2026-01-01T00:00:00Z","end":null}"#).unwrap();
        assert_eq!(
            window,
            DateWindow::StartingAt(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
        );

        let empty: DateWindow = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DateWindow::Unbounded);

        let json = serde_json::to_value(DateWindow::Unbounded).unwrap();
        assert_eq!(json, serde_json::json!({"start": null, "end": null}));
    }
}
