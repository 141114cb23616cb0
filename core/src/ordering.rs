// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Ordering keys for manually sorted lists and chronological placement
//! for time-bearing lists.
//!
//! Manual keys are arbitrary-precision fractional indexes over a base-36
//! digit alphabet: a midpoint strictly between any two keys always
//! exists, so repeated insertion between the same neighbors never
//! exhausts precision and no renormalization pass is required.

use std::fmt::{self, Display};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const BASE: usize = DIGITS.len();

/// Ordering key for a manually sorted list.
///
/// Keys are non-empty digit strings that never end in the zero digit,
/// compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKey(String);

impl SortKey {
    /// A key strictly between `lo` and `hi`; `None` means unbounded on
    /// that side.
    pub fn between(lo: Option<&SortKey>, hi: Option<&SortKey>) -> SortKey {
        let a = lo.map(|k| k.0.as_bytes()).unwrap_or_default();
        let b = hi.map(|k| k.0.as_bytes()).unwrap_or_default();
        debug_assert!(lo.is_none() || hi.is_none() || a < b);

        let bytes = midpoint(a, b);
        // midpoint yields valid utf-8: every byte comes from DIGITS
        SortKey(String::from_utf8(bytes).expect("digit alphabet is ascii"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        SortKey(s.to_string())
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key for a new item placed after `reference` in a manually ordered
/// list: strictly between the reference key and its successor among
/// `neighbors`. `reference: None` places the item before the minimum.
pub fn generate_sort_id(reference: Option<&SortKey>, neighbors: &[SortKey]) -> SortKey {
    let mut sorted: Vec<&SortKey> = neighbors.iter().collect();
    sorted.sort();

    match reference {
        None => SortKey::between(None, sorted.first().copied()),
        Some(r) => {
            let successor = sorted.iter().find(|k| **k > r).copied();
            SortKey::between(Some(r), successor)
        }
    }
}

/// Index at which an event with the given effective time keeps the list
/// sorted: before the first timed entry strictly later than `time`.
/// Untimed entries (`None`) are transparent and keep their relative
/// order; equal times insert after existing entries (stable).
pub fn place_by_time(time: NaiveDateTime, times: &[Option<NaiveDateTime>]) -> usize {
    for (i, t) in times.iter().enumerate() {
        if let Some(t) = t
            && *t > time
        {
            return i;
        }
    }
    times.len()
}

/// What ordering needs to know about one list entry.
#[derive(Debug, Clone, Default)]
pub struct Slot {
    pub time: Option<NaiveDateTime>,
    pub key: Option<SortKey>,
}

/// One insertion-position policy per list type: fractional keys for
/// manual lists, array position by effective time for planner lists.
pub trait OrderingStrategy {
    fn insertion_index(&self, entries: &[Slot], candidate: &Slot) -> usize;
}

/// Time-bearing lists (planners).
pub struct Chronological;

impl OrderingStrategy for Chronological {
    fn insertion_index(&self, entries: &[Slot], candidate: &Slot) -> usize {
        match candidate.time {
            Some(time) => {
                let times: Vec<Option<NaiveDateTime>> =
                    entries.iter().map(|s| s.time).collect();
                place_by_time(time, &times)
            }
            None => entries.len(),
        }
    }
}

/// Manually ordered lists (folders, deadlines, countdowns, weekday
/// recurring items).
pub struct ManualOrder;

impl OrderingStrategy for ManualOrder {
    fn insertion_index(&self, entries: &[Slot], candidate: &Slot) -> usize {
        let Some(key) = &candidate.key else {
            return entries.len();
        };
        entries
            .iter()
            .position(|s| s.key.as_ref().is_some_and(|k| k > key))
            .unwrap_or(entries.len())
    }
}

fn digit_index(d: u8) -> usize {
    match d {
        b'0'..=b'9' => (d - b'0') as usize,
        b'a'..=b'z' => (d - b'a') as usize + 10,
        _ => unreachable!("sort keys only contain base-36 digits"),
    }
}

/// Digit string strictly between `a` and `b`; empty `a` means unbounded
/// below, empty `b` unbounded above. Requires `a < b` when both bound.
/// The result never ends in the zero digit.
fn midpoint(a: &[u8], b: &[u8]) -> Vec<u8> {
    match (a.first(), b.first()) {
        (None, None) => vec![DIGITS[BASE / 2]],

        (Some(&a0), None) => {
            let ai = digit_index(a0);
            if ai < BASE - 1 {
                // mid of (ai, BASE) is strictly above ai
                vec![DIGITS[(ai + BASE) / 2]]
            } else {
                let mut v = vec![a0];
                v.extend(midpoint(&a[1..], b));
                v
            }
        }

        (None, Some(&b0)) => {
            let bi = digit_index(b0);
            if bi >= 2 {
                vec![DIGITS[bi / 2]]
            } else {
                // descend under the zero digit to stay below b
                let mut v = vec![DIGITS[0]];
                let rest = if bi == 0 { &b[1..] } else { &[][..] };
                v.extend(midpoint(&[], rest));
                v
            }
        }

        (Some(&a0), Some(&b0)) => {
            let ai = digit_index(a0);
            let bi = digit_index(b0);
            if ai == bi {
                let mut v = vec![a0];
                v.extend(midpoint(&a[1..], &b[1..]));
                v
            } else if bi - ai >= 2 {
                vec![DIGITS[(ai + bi) / 2]]
            } else {
                // adjacent leading digits: grow above a's suffix
                let mut v = vec![a0];
                v.extend(midpoint(&a[1..], &[]));
                v
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SortKey {
        s.into()
    }

    fn dt(s: &str) -> NaiveDateTime {
        s.parse().expect("valid datetime")
    }

    #[test]
    fn between_is_strictly_ordered() {
        let cases = [
            (Some("1"), Some("2")),
            (Some("1"), Some("11")),
            (Some("a"), Some("b")),
            (Some("az"), Some("b")),
            (Some("z"), None),
            (Some("zz"), None),
            (None, Some("1")),
            (None, Some("001")),
            (None, None),
        ];
        for (lo, hi) in cases {
            let lo = lo.map(key);
            let hi = hi.map(key);
            let k = SortKey::between(lo.as_ref(), hi.as_ref());
            if let Some(lo) = &lo {
                assert!(k > *lo, "{k} should be above {lo}");
            }
            if let Some(hi) = &hi {
                assert!(k < *hi, "{k} should be below {hi}");
            }
            assert!(!k.as_str().ends_with('0'), "{k} must not end in zero");
        }
    }

    #[test]
    fn generate_sort_id_between_all_neighbor_pairs() {
        let neighbors: Vec<SortKey> = ["2", "5", "c", "m", "x"].map(key).to_vec();
        for pair in neighbors.windows(2) {
            let k = generate_sort_id(Some(&pair[0]), &neighbors);
            assert!(pair[0] < k && k < pair[1], "{} < {k} < {}", pair[0], pair[1]);
        }

        // list ends
        let below = generate_sort_id(None, &neighbors);
        assert!(below < neighbors[0]);
        let above = generate_sort_id(Some(&neighbors[4]), &neighbors);
        assert!(above > neighbors[4]);
    }

    #[test]
    fn adversarial_repeated_midpoint_insertion() {
        // inserting 200 items consecutively between the same two
        // neighbors must yield 200 distinct, strictly increasing keys
        let lo = key("a");
        let hi = key("b");
        let mut neighbors = vec![lo.clone(), hi.clone()];
        let mut last = lo.clone();
        for _ in 0..200 {
            let k = generate_sort_id(Some(&last), &neighbors);
            assert!(last < k && k < hi, "{last} < {k} < {hi}");
            neighbors.push(k.clone());
            last = k;
        }

        let mut sorted = neighbors.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), neighbors.len(), "keys must be distinct");
    }

    #[test]
    fn adversarial_descending_insertion() {
        // same gap, always referencing the low end: keys approach it
        // from above without ever colliding
        let lo = key("a");
        let mut neighbors = vec![lo.clone(), key("b")];
        let mut prev: Option<SortKey> = None;
        for _ in 0..200 {
            let k = generate_sort_id(Some(&lo), &neighbors);
            assert!(k > lo);
            if let Some(prev) = &prev {
                assert!(k < *prev);
            }
            neighbors.push(k.clone());
            prev = Some(k);
        }
    }

    #[test]
    fn place_by_time_finds_chronological_slot() {
        let times = vec![
            Some(dt("2024-06-01T09:00:00")),
            Some(dt("2024-06-01T12:00:00")),
            Some(dt("2024-06-01T15:00:00")),
        ];
        assert_eq!(place_by_time(dt("2024-06-01T08:00:00"), &times), 0);
        assert_eq!(place_by_time(dt("2024-06-01T13:00:00"), &times), 2);
        assert_eq!(place_by_time(dt("2024-06-01T18:00:00"), &times), 3);
    }

    #[test]
    fn place_by_time_ties_insert_after_existing() {
        let times = vec![
            Some(dt("2024-06-01T09:00:00")),
            Some(dt("2024-06-01T12:00:00")),
        ];
        assert_eq!(place_by_time(dt("2024-06-01T12:00:00"), &times), 2);
    }

    #[test]
    fn place_by_time_skips_untimed_entries() {
        // untimed entries interleaved among timed ones are transparent
        let times = vec![
            None,
            Some(dt("2024-06-01T09:00:00")),
            None,
            Some(dt("2024-06-01T15:00:00")),
            None,
        ];
        assert_eq!(place_by_time(dt("2024-06-01T10:00:00"), &times), 3);
        assert_eq!(place_by_time(dt("2024-06-01T16:00:00"), &times), 5);
    }

    #[test]
    fn chronological_strategy_appends_untimed() {
        let entries = vec![
            Slot {
                time: Some(dt("2024-06-01T09:00:00")),
                key: None,
            },
            Slot {
                time: None,
                key: None,
            },
        ];
        let idx = Chronological.insertion_index(&entries, &Slot::default());
        assert_eq!(idx, 2);
    }

    #[test]
    fn manual_strategy_orders_by_key() {
        let entries = vec![
            Slot {
                time: None,
                key: Some(key("3")),
            },
            Slot {
                time: None,
                key: Some(key("7")),
            },
        ];
        let candidate = Slot {
            time: None,
            key: Some(key("5")),
        };
        assert_eq!(ManualOrder.insertion_index(&entries, &candidate), 1);
    }
}
