use crate::domain::model::{Bracket, Level, RecruitingCheck, RecruitingEntry, StandardEntry};
use crate::domain::time::SwimTime;
use crate::utils::error::{Result, SwimBenchError};
use std::fmt::Display;

/// Outcome of placing a time on a level ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Benchmark {
    pub bracket: Bracket,
    /// Cutoff of the matched level, absent when below the minimum.
    pub matched_time: Option<SwimTime>,
    pub next_level: Option<Level>,
    pub next_level_time: Option<SwimTime>,
}

impl Benchmark {
    /// Time still to drop to reach the next level; zero at the ceiling.
    pub fn time_drop_needed(&self, time: SwimTime) -> SwimTime {
        match self.next_level_time {
            Some(target) => time.saturating_sub(target),
            None => SwimTime::ZERO,
        }
    }
}

/// Checks that levels rise and cutoffs fall strictly along `ladder`.
pub fn check_ladder(key: &dyn Display, ladder: &[StandardEntry]) -> Result<()> {
    for pair in ladder.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.level <= lower.level {
            return Err(SwimBenchError::AmbiguousDataError {
                key: key.to_string(),
                message: format!(
                    "levels out of order or duplicated: {} followed by {}",
                    lower.level, upper.level
                ),
            });
        }
        if upper.time >= lower.time {
            return Err(SwimBenchError::AmbiguousDataError {
                key: key.to_string(),
                message: format!(
                    "{} cutoff {} is not faster than {} cutoff {}",
                    upper.level, upper.time, lower.level, lower.time
                ),
            });
        }
    }
    Ok(())
}

/// Index of the highest level whose cutoff the swimmer equals or beats.
pub(crate) fn matched_index(time: SwimTime, ladder: &[StandardEntry]) -> Option<usize> {
    // cutoffs fall strictly, so qualifying levels form a prefix
    ladder.iter().take_while(|e| e.time >= time).count().checked_sub(1)
}

/// Places `time` on `ladder` (sorted slowest level first).
pub fn resolve(key: &dyn Display, time: SwimTime, ladder: &[StandardEntry]) -> Result<Benchmark> {
    if ladder.is_empty() {
        return Err(SwimBenchError::NotFoundError { what: key.to_string() });
    }
    check_ladder(key, ladder)?;

    let benchmark = match matched_index(time, ladder) {
        None => Benchmark {
            bracket: Bracket::BelowMinimum,
            matched_time: None,
            next_level: Some(ladder[0].level),
            next_level_time: Some(ladder[0].time),
        },
        Some(i) => {
            let next = ladder.get(i + 1);
            Benchmark {
                bracket: Bracket::Level(ladder[i].level),
                matched_time: Some(ladder[i].time),
                next_level: next.map(|e| e.level),
                next_level_time: next.map(|e| e.time),
            }
        }
    };

    tracing::debug!(
        "{} at {} -> matched {}, next {:?}",
        key,
        time,
        benchmark.bracket,
        benchmark.next_level
    );
    Ok(benchmark)
}

/// Percent of the fastest cutoff below which a time is flagged for confirmation.
const PLAUSIBLE_PERCENT_OF_FASTEST: u64 = 85;

/// Whether `time` is more than 15% faster than the fastest cutoff on `ladder`,
/// which is beyond national-record pace for every age group.
pub fn is_implausibly_fast(time: SwimTime, ladder: &[StandardEntry]) -> bool {
    ladder.last().is_some_and(|fastest| {
        u64::from(time.hundredths()) * 100 < u64::from(fastest.time.hundredths()) * PLAUSIBLE_PERCENT_OF_FASTEST
    })
}

/// Qualifies iff `time <= cutoff`; each division stands alone.
pub fn evaluate_recruiting(time: SwimTime, entries: &[RecruitingEntry]) -> Vec<RecruitingCheck> {
    let mut checks: Vec<RecruitingCheck> = entries
        .iter()
        .map(|e| RecruitingCheck {
            division: e.division,
            cutoff: e.time,
            qualified: time <= e.time,
            gap: time.saturating_sub(e.time),
        })
        .collect();
    checks.sort_by_key(|c| c.division);
    checks
}
