//! Date-based note grouping for list views.
//!
//! # Responsibility
//! - Partition a note collection into labeled recency buckets.
//!
//! # Invariants
//! - Notes are stable-sorted by `updated_at` descending before bucketing,
//!   keyed on `updated_at` alone, so equal timestamps keep their input order.
//! - Group labels appear in first-seen order over the sorted sequence.
//! - Day boundaries are computed from the local timezone at call time; a
//!   timezone change shifts buckets on the next evaluation.

use crate::model::note::Note;
use chrono::{DateTime, Days, Duration, Local, LocalResult, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const TODAY_LABEL: &str = "Today";
const YESTERDAY_LABEL: &str = "Yesterday";

/// A labeled run of notes sharing one recency bucket.
///
/// Derived on every relevant change and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGroup {
    /// "Today", "Yesterday", or a formatted calendar date.
    pub label: String,
    /// Members in `updated_at`-descending order.
    pub notes: Vec<Note>,
}

/// Buckets notes by recency against the given evaluation instant.
///
/// Notes updated at or after local midnight land in "Today" (a future
/// `updated_at` lands there too; clock skew gets no special case). Notes
/// from the previous local day land in "Yesterday". Older notes get one
/// group per calendar day, labeled with the formatted date.
pub fn group_notes_by_date(notes: &[Note], now: DateTime<Local>) -> Vec<NoteGroup> {
    if notes.is_empty() {
        return Vec::new();
    }

    let mut sorted = notes.to_vec();
    sorted.sort_by_key(|note| std::cmp::Reverse(note.updated_at));

    let today = now.date_naive();
    let today_start = local_day_start_ms(today);
    let yesterday_start = today
        .checked_sub_days(Days::new(1))
        .map(local_day_start_ms)
        .unwrap_or(i64::MIN);

    let mut groups: Vec<NoteGroup> = Vec::new();
    for note in sorted {
        let label = if note.updated_at >= today_start {
            TODAY_LABEL.to_string()
        } else if note.updated_at >= yesterday_start {
            YESTERDAY_LABEL.to_string()
        } else {
            calendar_label(note.updated_at)
        };

        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.notes.push(note),
            None => groups.push(NoteGroup {
                label,
                notes: vec![note],
            }),
        }
    }

    groups
}

/// First instant of the given local calendar day, in epoch milliseconds.
///
/// Midnight can be skipped or doubled on DST transition days; the earliest
/// valid instant of the day is used in both cases.
fn local_day_start_ms(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local) {
        LocalResult::Single(start) | LocalResult::Ambiguous(start, _) => start.timestamp_millis(),
        LocalResult::None => match (midnight + Duration::hours(1)).and_local_timezone(Local) {
            LocalResult::Single(shifted) | LocalResult::Ambiguous(shifted, _) => {
                shifted.timestamp_millis() - Duration::hours(1).num_milliseconds()
            }
            LocalResult::None => midnight.and_utc().timestamp_millis(),
        },
    }
}

fn calendar_label(updated_at: i64) -> String {
    match DateTime::from_timestamp_millis(updated_at) {
        Some(instant) => instant
            .with_timezone(&Local)
            .format("%B %-d, %Y")
            .to_string(),
        // Out-of-range epoch values cannot be rendered as a date.
        None => updated_at.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{group_notes_by_date, TODAY_LABEL, YESTERDAY_LABEL};
    use crate::model::note::Note;
    use chrono::{Duration, Local};

    fn note_updated_at(title: &str, updated_at: i64) -> Note {
        let mut note = Note::new(title, "");
        note.created_at = updated_at;
        note.updated_at = updated_at;
        note
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_notes_by_date(&[], Local::now()).is_empty());
    }

    #[test]
    fn buckets_today_yesterday_and_calendar_day_in_order() {
        let now = Local::now();
        let now_ms = now.timestamp_millis();
        let notes = vec![
            note_updated_at("fresh", now_ms),
            note_updated_at("day-old", now_ms - Duration::hours(26).num_milliseconds()),
            note_updated_at("older", now_ms - Duration::hours(50).num_milliseconds()),
        ];

        let groups = group_notes_by_date(&notes, now);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].label, TODAY_LABEL);
        assert_eq!(groups[1].label, YESTERDAY_LABEL);
        assert_ne!(groups[2].label, TODAY_LABEL);
        assert_ne!(groups[2].label, YESTERDAY_LABEL);
        for group in &groups {
            assert_eq!(group.notes.len(), 1);
        }
        assert_eq!(groups[0].notes[0].title, "fresh");
        assert_eq!(groups[1].notes[0].title, "day-old");
        assert_eq!(groups[2].notes[0].title, "older");
    }

    #[test]
    fn future_timestamp_lands_in_today() {
        let now = Local::now();
        let ahead = now.timestamp_millis() + Duration::minutes(10).num_milliseconds();
        let groups = group_notes_by_date(&[note_updated_at("skewed", ahead)], now);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, TODAY_LABEL);
    }

    #[test]
    fn notes_within_a_group_stay_recency_ordered() {
        let now = Local::now();
        let now_ms = now.timestamp_millis();
        let notes = vec![
            note_updated_at("older today", now_ms - 5_000),
            note_updated_at("newest today", now_ms),
        ];

        let groups = group_notes_by_date(&notes, now);
        assert_eq!(groups.len(), 1);
        let titles: Vec<&str> = groups[0]
            .notes
            .iter()
            .map(|note| note.title.as_str())
            .collect();
        assert_eq!(titles, vec!["newest today", "older today"]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let now = Local::now();
        let now_ms = now.timestamp_millis();
        let notes = vec![
            note_updated_at("first", now_ms),
            note_updated_at("second", now_ms),
        ];

        let groups = group_notes_by_date(&notes, now);
        let titles: Vec<&str> = groups[0]
            .notes
            .iter()
            .map(|note| note.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
