//! Unit tests for bounded top-K tracking

use crate::fixtures::record;
use filestat::FileRecord;
use filestat::services::top_k::{DEFAULT_CAPACITY, LargestFirst, NewestFirst, OldestFirst, TopK};

fn sizes(tracker: &TopK<FileRecord, LargestFirst>) -> Vec<u64> {
    tracker.sorted().iter().map(|r| r.size).collect()
}

#[test]
fn never_exceeds_capacity() {
    let mut tracker: TopK<FileRecord, LargestFirst> = TopK::new();
    for i in 0..25 {
        tracker.offer(record(&format!("f{i}.bin"), i * 10, 0));
        assert!(tracker.len() <= DEFAULT_CAPACITY);
    }

    assert_eq!(tracker.len(), 10);
    assert_eq!(
        sizes(&tracker),
        vec![240, 230, 220, 210, 200, 190, 180, 170, 160, 150]
    );
}

#[test]
fn result_is_independent_of_offer_order() {
    let values: Vec<u64> = vec![17, 3, 99, 42, 8, 56, 71, 23, 64, 5, 88, 31, 12, 77, 45];

    let mut forward: TopK<FileRecord, LargestFirst> = TopK::with_capacity(5);
    let mut backward: TopK<FileRecord, LargestFirst> = TopK::with_capacity(5);
    let mut shuffled: TopK<FileRecord, LargestFirst> = TopK::with_capacity(5);

    for &v in &values {
        forward.offer(record("a", v, 0));
    }
    for &v in values.iter().rev() {
        backward.offer(record("a", v, 0));
    }
    // Interleave odd and even positions.
    for &v in values.iter().step_by(2).chain(values.iter().skip(1).step_by(2)) {
        shuffled.offer(record("a", v, 0));
    }

    let expected = vec![99, 88, 77, 71, 64];
    assert_eq!(sizes(&forward), expected);
    assert_eq!(sizes(&backward), expected);
    assert_eq!(sizes(&shuffled), expected);
}

#[test]
fn ties_keep_earlier_offers() {
    let mut tracker: TopK<FileRecord, LargestFirst> = TopK::with_capacity(2);
    tracker.offer(record("first", 5, 0));
    tracker.offer(record("second", 5, 0));
    tracker.offer(record("third", 5, 0));

    let paths: Vec<_> = tracker.sorted().iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, ["first", "second"]);
}

#[test]
fn oldest_and_newest_rank_by_mtime() {
    let mut oldest: TopK<FileRecord, OldestFirst> = TopK::with_capacity(3);
    let mut newest: TopK<FileRecord, NewestFirst> = TopK::with_capacity(3);

    for secs in [500, 100, 900, 300, 700] {
        let r = record(&format!("{secs}.log"), 1, secs);
        oldest.offer(r.clone());
        newest.offer(r);
    }

    let oldest_paths: Vec<_> = oldest.sorted().iter().map(|r| r.path.clone()).collect();
    let newest_paths: Vec<_> = newest.sorted().iter().map(|r| r.path.clone()).collect();

    assert_eq!(oldest_paths, ["100.log", "300.log", "500.log"]);
    assert_eq!(newest_paths, ["900.log", "700.log", "500.log"]);
}

#[test]
fn merge_matches_single_tracker() {
    let mut whole: TopK<FileRecord, LargestFirst> = TopK::with_capacity(4);
    let mut left: TopK<FileRecord, LargestFirst> = TopK::with_capacity(4);
    let mut right: TopK<FileRecord, LargestFirst> = TopK::with_capacity(4);

    for v in 0..20u64 {
        let r = record("m", (v * 37) % 101, 0);
        whole.offer(r.clone());
        if v % 2 == 0 {
            left.offer(r);
        } else {
            right.offer(r);
        }
    }

    left.merge(right);
    assert_eq!(sizes(&left), sizes(&whole));
}

#[test]
fn into_sorted_vec_is_most_preferred_first() {
    let mut tracker: TopK<FileRecord, LargestFirst> = TopK::with_capacity(3);
    for v in [4, 9, 1, 7] {
        tracker.offer(record("s", v, 0));
    }

    let items: Vec<u64> = tracker.into_sorted_vec().into_iter().map(|r| r.size).collect();
    assert_eq!(items, vec![9, 7, 4]);
}

#[test]
fn zero_capacity_keeps_nothing() {
    let mut tracker: TopK<FileRecord, LargestFirst> = TopK::with_capacity(0);
    tracker.offer(record("z", 1, 0));
    assert!(tracker.is_empty());
}

#[test]
fn capacity_reports_configured_bound() {
    let default: TopK<FileRecord, LargestFirst> = TopK::new();
    assert_eq!(default.capacity(), DEFAULT_CAPACITY);

    let mut small: TopK<FileRecord, OldestFirst> = TopK::with_capacity(3);
    for i in 0..5 {
        small.offer(record(&format!("f{i}"), 1, i));
    }
    assert_eq!(small.capacity(), 3);
    assert_eq!(small.len(), small.capacity());
}
