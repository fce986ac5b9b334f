//! "Today", default expansion and past/future decisions.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::datetime::FloatingDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Classification {
    /// Bucket matching the current local calendar date, if any.
    pub today_key: Option<String>,
    /// Bucket to open on first render: today, else the earliest bucket.
    /// [`ExpansionState::initialize`] applies it at most once.
    pub default_expanded_key: Option<String>,
}

/// Classify bucket keys (chronological order) against the current moment.
pub fn classify(bucket_keys: &[String], now: NaiveDateTime) -> Classification {
    let today = FloatingDateTime::from_local(now).date_key;
    let today_key = bucket_keys.iter().find(|k| **k == today).cloned();
    let default_expanded_key = today_key.clone().or_else(|| bucket_keys.first().cloned());
    Classification {
        today_key,
        default_expanded_key,
    }
}

/// Strictly before `now`, both sides read as floating wall-clock values.
pub fn is_past(when: &FloatingDateTime, now: NaiveDateTime) -> bool {
    *when < FloatingDateTime::from_local(now)
}

/// Which day buckets are open.
///
/// `touched` flips on the first initialization or toggle and never flips
/// back, so the default can only be applied once even if the map later ends
/// up empty or all-closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashMap<String, bool>,
    touched: bool,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the classification's default if nothing has been set yet.
    /// Returns whether anything changed.
    pub fn initialize(&mut self, classification: &Classification) -> bool {
        if self.touched {
            return false;
        }
        match &classification.default_expanded_key {
            Some(key) => {
                self.expanded.insert(key.clone(), true);
                self.touched = true;
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, date_key: &str) {
        let open = self.is_expanded(date_key);
        self.expanded.insert(date_key.to_string(), !open);
        self.touched = true;
    }

    pub fn is_expanded(&self, date_key: &str) -> bool {
        self.expanded.get(date_key).copied().unwrap_or(false)
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::parse_floating;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn keys() -> Vec<String> {
        vec!["2026-01-02".to_string(), "2026-01-03".to_string()]
    }

    #[test]
    fn finds_today() {
        let c = classify(&keys(), at(2026, 1, 2, 10, 0));
        assert_eq!(c.today_key.as_deref(), Some("2026-01-02"));
        assert_eq!(c.default_expanded_key.as_deref(), Some("2026-01-02"));

        let c = classify(&keys(), at(2026, 1, 3, 23, 59));
        assert_eq!(c.today_key.as_deref(), Some("2026-01-03"));
    }

    #[test]
    fn falls_back_to_earliest() {
        let c = classify(&keys(), at(2026, 1, 5, 10, 0));
        assert_eq!(c.today_key, None);
        assert_eq!(c.default_expanded_key.as_deref(), Some("2026-01-02"));
    }

    #[test]
    fn no_buckets_no_default() {
        let c = classify(&[], at(2026, 1, 5, 10, 0));
        assert_eq!(c, Classification::default());
        let mut state = ExpansionState::new();
        assert!(!state.initialize(&c));
        assert!(!state.is_touched());
    }

    #[test]
    fn past_and_future() {
        let item = parse_floating("2026-01-02 09:00").unwrap();
        assert!(is_past(&item, at(2026, 1, 2, 14, 0)));
        assert!(!is_past(&item, at(2026, 1, 2, 8, 0)));
        // Same minute is not strictly before.
        assert!(!is_past(&item, at(2026, 1, 2, 9, 0)));
        assert!(is_past(&item, at(2026, 1, 3, 0, 0)));
    }

    #[test]
    fn default_applies_once() {
        let mut state = ExpansionState::new();
        let c = classify(&keys(), at(2026, 1, 5, 10, 0));
        assert!(state.initialize(&c));
        assert!(state.is_expanded("2026-01-02"));
        assert!(!state.initialize(&c));
    }

    #[test]
    fn user_toggle_blocks_default() {
        let mut state = ExpansionState::new();
        // User opens and closes a day before the clock has resolved.
        state.toggle("2026-01-03");
        state.toggle("2026-01-03");
        assert!(!state.is_expanded("2026-01-03"));

        let c = classify(&keys(), at(2026, 1, 5, 10, 0));
        assert!(!state.initialize(&c));
        assert!(!state.is_expanded("2026-01-02"));
        assert!(!state.is_expanded("2026-01-03"));
    }
}
