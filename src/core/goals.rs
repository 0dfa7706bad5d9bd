//! Percentile estimation and training advice.
//!
//! Both are reference data: `AnchorCurve` and `TrainingFocusTable` are built
//! from configuration, and the engine only sees them through
//! `PercentileCurve` and a keyed lookup.

use crate::core::resolver::matched_index;
use crate::domain::event::EventCategory;
use crate::domain::model::{Level, StandardEntry};
use crate::domain::ports::PercentileCurve;
use crate::domain::time::SwimTime;
use crate::utils::error::{Result, SwimBenchError};
use crate::utils::validation::validate_range;
use std::collections::{BTreeMap, HashMap};

/// Percentile anchored at each level's cutoff, linear in time between them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorCurve {
    anchors: BTreeMap<Level, f64>,
    /// Percentile reached once a time is `floor_span` (fraction of the slowest
    /// cutoff) slower than the slowest level.
    floor_percentile: f64,
    floor_span: f64,
    /// Percentile approached once a time is `ceiling_span` faster than the
    /// fastest level.
    ceiling_percentile: f64,
    ceiling_span: f64,
}

impl AnchorCurve {
    pub fn new(
        anchors: BTreeMap<Level, f64>,
        floor_percentile: f64,
        floor_span: f64,
        ceiling_percentile: f64,
        ceiling_span: f64,
    ) -> Result<Self> {
        for level in Level::ALL {
            let value = anchors.get(&level).ok_or_else(|| SwimBenchError::MissingConfigError {
                field: format!("percentile.anchors.{}", level),
            })?;
            validate_range(&format!("percentile.anchors.{}", level), *value, 0.0, 100.0)?;
        }
        validate_range("percentile.floor_percentile", floor_percentile, 0.0, 100.0)?;
        validate_range("percentile.ceiling_percentile", ceiling_percentile, 0.0, 100.0)?;
        validate_range("percentile.floor_span", floor_span, 0.001, 10.0)?;
        validate_range("percentile.ceiling_span", ceiling_span, 0.001, 1.0)?;

        // BTreeMap iterates slowest level first
        let values: Vec<f64> = anchors.values().copied().collect();
        if values.windows(2).any(|w| w[1] < w[0]) {
            return Err(SwimBenchError::ConfigValidationError {
                field: "percentile.anchors".to_string(),
                message: "anchors must not decrease from B to AAAA".to_string(),
            });
        }
        let lowest = values.first().copied().unwrap_or(0.0);
        let highest = values.last().copied().unwrap_or(100.0);
        if floor_percentile > lowest || ceiling_percentile < highest {
            return Err(SwimBenchError::ConfigValidationError {
                field: "percentile".to_string(),
                message: "floor must be at or below every anchor and ceiling at or above every anchor"
                    .to_string(),
            });
        }

        Ok(Self {
            anchors,
            floor_percentile,
            floor_span,
            ceiling_percentile,
            ceiling_span,
        })
    }

    /// A new curve with the given values replacing this one's.
    pub fn with_overrides(
        &self,
        anchors: &BTreeMap<Level, f64>,
        floor_percentile: Option<f64>,
        floor_span: Option<f64>,
        ceiling_percentile: Option<f64>,
        ceiling_span: Option<f64>,
    ) -> Result<Self> {
        let mut merged = self.anchors.clone();
        merged.extend(anchors.iter().map(|(&l, &p)| (l, p)));
        Self::new(
            merged,
            floor_percentile.unwrap_or(self.floor_percentile),
            floor_span.unwrap_or(self.floor_span),
            ceiling_percentile.unwrap_or(self.ceiling_percentile),
            ceiling_span.unwrap_or(self.ceiling_span),
        )
    }

    pub fn anchor(&self, level: Level) -> f64 {
        // every level is present after `new`
        self.anchors.get(&level).copied().unwrap_or(0.0)
    }
}

impl Default for AnchorCurve {
    /// Approximate national percentiles of the USA Swimming motivational tiers.
    fn default() -> Self {
        let anchors = BTreeMap::from([
            (Level::B, 50.0),
            (Level::BB, 65.0),
            (Level::A, 80.0),
            (Level::AA, 90.0),
            (Level::AAA, 95.0),
            (Level::AAAA, 98.0),
        ]);
        Self {
            anchors,
            floor_percentile: 1.0,
            floor_span: 0.25,
            ceiling_percentile: 99.9,
            ceiling_span: 0.05,
        }
    }
}

fn lerp(from: f64, to: f64, fraction: f64) -> f64 {
    from + (to - from) * fraction.clamp(0.0, 1.0)
}

impl PercentileCurve for AnchorCurve {
    fn estimate(&self, time: SwimTime, ladder: &[StandardEntry]) -> f64 {
        let (Some(slowest), Some(fastest)) = (ladder.first(), ladder.last()) else {
            return self.floor_percentile;
        };
        let t = f64::from(time.hundredths());

        let raw = match matched_index(time, ladder) {
            None => {
                let cutoff = f64::from(slowest.time.hundredths());
                let fraction = (t - cutoff) / (cutoff * self.floor_span);
                lerp(self.anchor(slowest.level), self.floor_percentile, fraction)
            }
            Some(i) if i + 1 < ladder.len() => {
                let (upper, lower) = (&ladder[i], &ladder[i + 1]);
                let slow = f64::from(upper.time.hundredths());
                let fast = f64::from(lower.time.hundredths());
                let fraction = (slow - t) / (slow - fast);
                lerp(self.anchor(upper.level), self.anchor(lower.level), fraction)
            }
            Some(_) => {
                let cutoff = f64::from(fastest.time.hundredths());
                let fraction = (cutoff - t) / (cutoff * self.ceiling_span);
                lerp(self.anchor(fastest.level), self.ceiling_percentile, fraction)
            }
        };

        (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
    }
}

/// Advisory text per event category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingFocusTable {
    hints: HashMap<EventCategory, String>,
}

impl TrainingFocusTable {
    pub fn new(hints: HashMap<EventCategory, String>) -> Self {
        Self { hints }
    }

    pub fn hint(&self, category: EventCategory) -> Option<&str> {
        self.hints.get(&category).map(String::as_str)
    }

    /// Replaces or adds the hint for one category.
    pub fn with_hint(mut self, category: EventCategory, hint: impl Into<String>) -> Self {
        self.hints.insert(category, hint.into());
        self
    }
}

impl Default for TrainingFocusTable {
    fn default() -> Self {
        Self::new(HashMap::from([
            (
                EventCategory::Sprint,
                "Race-pace speed sets, explosive starts and turns, and underwater kick work".to_string(),
            ),
            (
                EventCategory::Middle,
                "Lactate tolerance sets and even-split pacing at 200 race pace".to_string(),
            ),
            (
                EventCategory::Distance,
                "Threshold aerobic volume, negative-split pacing and stroke-count efficiency".to_string(),
            ),
            (
                EventCategory::IM,
                "Stroke transitions, weakest-stroke technique and back-half endurance".to_string(),
            ),
        ]))
    }
}
