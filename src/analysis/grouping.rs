//! Calendar-day grouping of movement events.

use crate::types::MovementEvent;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;

/// One calendar day of hive activity. Constructed fresh every pipeline run,
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    /// Calendar day in the observer's configured time zone.
    pub date: NaiveDate,
    /// Number of detections on this day — what the dashboard shows per group
    /// header without walking the events.
    pub event_count: usize,
    /// Events in input order (not re-sorted within the day).
    pub events: Vec<MovementEvent>,
}

/// Partition movement events into calendar-day buckets.
///
/// The grouping key is the date of each timestamp converted into `tz` — hive
/// activity is reported to a human observer, so the day boundary is theirs,
/// not UTC's. The zone is an explicit parameter to keep grouping reproducible
/// under test.
///
/// Groups come back sorted by descending date (most recent day first); within
/// a group, event order is insertion order from the input. Empty input yields
/// an empty Vec.
pub fn group_by_date(events: &[MovementEvent], tz: Tz) -> Vec<DateGroup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<MovementEvent>> = BTreeMap::new();
    for event in events {
        let date = event.timestamp.with_timezone(&tz).date_naive();
        buckets.entry(date).or_default().push(event.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|(date, events)| DateGroup {
            date,
            event_count: events.len(),
            events,
        })
        .collect()
}
