//! Property-based tests for the benchmark path.
//!
//! Ladders and times are generated at random; the properties below must hold
//! for every well-formed ladder, not just the published tables.
//!
//! ```bash
//! cargo test --test property_tests
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```

use proptest::prelude::*;
use std::sync::Arc;
use swimbench::domain::event::{AgeGroup, Course, Event, Gender, Stroke};
use swimbench::domain::model::{Bracket, Division, Level, RecruitingEntry, StandardEntry, SwimResult};
use swimbench::domain::time::SwimTime;
use swimbench::{AnchorCurve, BenchmarkEngine, StandardsSnapshot, StandardsStore, TrainingFocusTable};

const EVENT: Event = Event {
    distance: 200,
    stroke: Stroke::Back,
};

/// AAAA cutoff plus the gaps up to each slower level, fastest first.
fn ladder_strategy() -> impl Strategy<Value = (u32, Vec<u32>)> {
    (3000u32..40_000, prop::collection::vec(1u32..800, 5))
}

fn build_engine(fastest: u32, gaps: &[u32], recruiting: &[(Division, u32)]) -> (BenchmarkEngine, Vec<SwimTime>) {
    // slowest first
    let mut times = vec![fastest];
    for gap in gaps {
        let last = *times.last().unwrap_or(&fastest);
        times.push(last + gap);
    }
    times.reverse();
    let times: Vec<SwimTime> = times.into_iter().map(SwimTime::from_hundredths).collect();

    let standards = Level::ALL
        .iter()
        .zip(&times)
        .map(|(&level, &time)| StandardEntry {
            event: EVENT,
            course: Course::Scm,
            age_group: AgeGroup::SeventeenEighteen,
            gender: Gender::Female,
            level,
            time,
        })
        .collect();
    let recruiting = recruiting
        .iter()
        .map(|&(division, h)| RecruitingEntry {
            division,
            event: EVENT,
            gender: Gender::Female,
            course: Course::Scm,
            time: SwimTime::from_hundredths(h),
        })
        .collect();

    let snapshot = StandardsSnapshot::build(1, standards, recruiting).unwrap();
    let engine = BenchmarkEngine::new(
        Arc::new(StandardsStore::new(snapshot)),
        Arc::new(AnchorCurve::default()),
        TrainingFocusTable::default(),
    );
    (engine, times)
}

fn swim(hundredths: u32) -> SwimResult {
    SwimResult::new(
        EVENT,
        Course::Scm,
        17,
        Gender::Female,
        SwimTime::from_hundredths(hundredths),
    )
    .unwrap()
}

fn default_recruiting(fastest: u32) -> Vec<(Division, u32)> {
    vec![(Division::D1Elite, fastest), (Division::D3, fastest + 1000)]
}

proptest! {
    /// A faster swim never lands in a lower bracket or a lower percentile.
    #[test]
    fn prop_faster_never_ranks_lower(
        (fastest, gaps) in ladder_strategy(),
        a in 1000u32..60_000,
        b in 1000u32..60_000,
    ) {
        let (engine, _) = build_engine(fastest, &gaps, &default_recruiting(fastest));
        let (fast, slow) = if a <= b { (a, b) } else { (b, a) };

        let fast = engine.analyze(&swim(fast)).unwrap();
        let slow = engine.analyze(&swim(slow)).unwrap();

        prop_assert!(fast.matched_level >= slow.matched_level);
        prop_assert!(fast.percentile_estimate >= slow.percentile_estimate);
        prop_assert!((0.0..=100.0).contains(&fast.percentile_estimate));
    }

    /// The matched cutoff is at or slower than the swim; the next one is faster.
    #[test]
    fn prop_bracket_brackets_the_time(
        (fastest, gaps) in ladder_strategy(),
        t in 1000u32..60_000,
    ) {
        let (engine, times) = build_engine(fastest, &gaps, &default_recruiting(fastest));
        let time = SwimTime::from_hundredths(t);
        let result = engine.analyze(&swim(t)).unwrap();

        if let Some(level) = result.matched_level.level() {
            let index = Level::ALL.iter().position(|&l| l == level).unwrap();
            prop_assert!(times[index] >= time);
        } else {
            prop_assert!(times[0] < time);
            prop_assert_eq!(result.matched_level, Bracket::BelowMinimum);
        }

        match result.next_level_time {
            Some(next) => {
                prop_assert!(next < time);
                prop_assert_eq!(result.time_drop_needed.hundredths(), t - next.hundredths());
            }
            None => {
                prop_assert_eq!(result.matched_level, Bracket::Level(Level::AAAA));
                prop_assert!(result.time_drop_needed.is_zero());
            }
        }
    }

    /// Each division qualifies exactly when the swim is at or under its cutoff.
    #[test]
    fn prop_recruiting_is_inclusive_and_independent(
        (fastest, gaps) in ladder_strategy(),
        cutoffs in prop::collection::vec(1000u32..60_000, 5),
        t in 1000u32..60_000,
    ) {
        let recruiting: Vec<(Division, u32)> = Division::ALL.iter().copied().zip(cutoffs.iter().copied()).collect();
        let (engine, _) = build_engine(fastest, &gaps, &recruiting);
        let result = engine.analyze(&swim(t)).unwrap();

        for (division, cutoff) in recruiting {
            prop_assert_eq!(result.recruiting_qualifications[&division], t <= cutoff);
        }
    }

    /// Repeating a query against the same snapshot gives the same answer.
    #[test]
    fn prop_analysis_is_idempotent(
        (fastest, gaps) in ladder_strategy(),
        t in 1000u32..60_000,
    ) {
        let (engine, _) = build_engine(fastest, &gaps, &default_recruiting(fastest));
        let first = engine.analyze(&swim(t)).unwrap();
        let second = engine.analyze(&swim(t)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Subtracting two parsed times is exact to the hundredth.
    #[test]
    fn prop_time_subtraction_is_exact(a in 1u32..100_000, b in 1u32..100_000) {
        let (slow, fast) = if a >= b { (a, b) } else { (b, a) };
        let slow_time: SwimTime = SwimTime::from_hundredths(slow).to_string().parse().unwrap();
        let fast_time: SwimTime = SwimTime::from_hundredths(fast).to_string().parse().unwrap();
        prop_assert_eq!(slow_time.saturating_sub(fast_time).hundredths(), slow - fast);
    }
}
