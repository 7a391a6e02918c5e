// Unit tests for the sliding-window rate limiter.
//
// All timestamps are injected so the window arithmetic is tested exactly:
// the 3-per-hour cap, the strict-greater-than prune cutoff, the rule that
// denials never consume a slot, and the one-admission guarantee under
// concurrent access.

use chrono::{DateTime, Duration, TimeZone, Utc};
use postbox::ratelimit::SlidingWindowLimiter;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

#[test]
fn first_three_in_an_hour_admitted_fourth_denied() {
    let limiter = SlidingWindowLimiter::per_hour(3);
    let base = t0();
    for i in 0..3 {
        assert!(
            limiter.check_and_record("198.51.100.2", base + Duration::minutes(i * 10)),
            "call {i} should be admitted"
        );
    }
    assert!(!limiter.check_and_record("198.51.100.2", base + Duration::minutes(40)));
}

#[test]
fn window_slides_after_3601_seconds() {
    let limiter = SlidingWindowLimiter::per_hour(3);
    let base = t0();
    assert!(limiter.check_and_record("a", base));

    // Just past the hour the first entry is pruned, so three fresh
    // admissions fit again.
    let later = base + Duration::seconds(3601);
    assert!(limiter.check_and_record("a", later));
    assert!(limiter.check_and_record("a", later));
    assert!(limiter.check_and_record("a", later));
    assert!(!limiter.check_and_record("a", later));
}

#[test]
fn denied_call_does_not_extend_the_block() {
    let limiter = SlidingWindowLimiter::per_hour(3);
    let base = t0();
    for _ in 0..3 {
        assert!(limiter.check_and_record("a", base));
    }
    // A burst of denied retries leaves the history at the original three
    for i in 0..10 {
        assert!(!limiter.check_and_record("a", base + Duration::seconds(i)));
    }
    // The original entries still age out on schedule
    assert!(limiter.check_and_record("a", base + Duration::seconds(3601)));
}

#[test]
fn fresh_identifier_starts_with_empty_history() {
    let limiter = SlidingWindowLimiter::per_hour(1);
    assert!(limiter.check_and_record("never-seen-before", t0()));
}

#[test]
fn identifiers_do_not_share_budgets() {
    let limiter = SlidingWindowLimiter::per_hour(3);
    let base = t0();
    for _ in 0..3 {
        assert!(limiter.check_and_record("a", base));
    }
    assert!(!limiter.check_and_record("a", base));
    // "b" is unaffected by "a" exhausting its slots
    assert!(limiter.check_and_record("b", base));
}

#[test]
fn custom_window_and_count() {
    let limiter = SlidingWindowLimiter::new(Duration::seconds(60), 2);
    let base = t0();
    assert!(limiter.check_and_record("a", base));
    assert!(limiter.check_and_record("a", base + Duration::seconds(30)));
    assert!(!limiter.check_and_record("a", base + Duration::seconds(59)));
    // First entry falls out 61s after it was recorded
    assert!(limiter.check_and_record("a", base + Duration::seconds(61)));
}

#[test]
fn concurrent_race_for_last_slot_admits_exactly_one() {
    let limiter = SlidingWindowLimiter::per_hour(3);
    let base = t0();
    assert!(limiter.check_and_record("a", base));
    assert!(limiter.check_and_record("a", base));

    for _ in 0..50 {
        // Re-arm: prune everything, then refill two slots
        let fresh = SlidingWindowLimiter::per_hour(3);
        assert!(fresh.check_and_record("a", base));
        assert!(fresh.check_and_record("a", base));

        let results = std::thread::scope(|s| {
            let h1 = s.spawn(|| fresh.check_and_record("a", base));
            let h2 = s.spawn(|| fresh.check_and_record("a", base));
            [h1.join().unwrap(), h2.join().unwrap()]
        });
        assert_eq!(results.iter().filter(|&&r| r).count(), 1);
    }
}

#[test]
fn many_threads_never_exceed_the_cap() {
    let limiter = SlidingWindowLimiter::per_hour(3);
    let base = t0();
    let admitted: usize = std::thread::scope(|s| {
        (0..16)
            .map(|_| s.spawn(|| usize::from(limiter.check_and_record("a", base))))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .sum()
    });
    assert_eq!(admitted, 3);
}
