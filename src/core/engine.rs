use crate::core::goals::TrainingFocusTable;
use crate::core::resolver::{evaluate_recruiting, is_implausibly_fast, resolve};
use crate::core::snapshot::MotivationalKey;
use crate::core::store::StandardsStore;
use crate::domain::model::{AbilityLevel, AnalysisResult, SwimResult};
use crate::domain::ports::{PercentileCurve, StandardsRepository};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs one benchmark query end to end.
pub struct BenchmarkEngine {
    store: Arc<StandardsStore>,
    curve: Arc<dyn PercentileCurve>,
    focus: TrainingFocusTable,
}

impl BenchmarkEngine {
    pub fn new(store: Arc<StandardsStore>, curve: Arc<dyn PercentileCurve>, focus: TrainingFocusTable) -> Self {
        Self { store, curve, focus }
    }

    /// Analyzes against the current snapshot, pinned for the whole query.
    pub fn analyze(&self, swim: &SwimResult) -> Result<AnalysisResult> {
        let snapshot = self.store.snapshot();
        self.analyze_with(snapshot.as_ref(), swim)
    }

    /// Analyzes against any repository.
    pub fn analyze_with<R: StandardsRepository + ?Sized>(&self, repo: &R, swim: &SwimResult) -> Result<AnalysisResult> {
        let age_group = swim.age_group()?;
        let key = MotivationalKey {
            event: swim.event,
            course: swim.course,
            age_group,
            gender: swim.gender,
        };
        tracing::debug!("Benchmarking {} for {}", swim.time, key);

        let ladder = repo.lookup_motivational(swim.event, age_group, swim.gender, swim.course)?;
        let benchmark = resolve(&key, swim.time, &ladder)?;
        if is_implausibly_fast(swim.time, &ladder) {
            tracing::warn!(
                "{} for {} is far faster than every standard; confirm the time was entered correctly",
                swim.time,
                key
            );
        }
        if swim.age < 8 {
            tracing::warn!("Age {} is below the 8-18 range the standards are built for", swim.age);
        }

        let tiers = repo.lookup_recruiting(swim.event, swim.gender, swim.course)?;
        let recruiting = evaluate_recruiting(swim.time, &tiers);
        let recruiting_qualifications: BTreeMap<_, _> =
            recruiting.iter().map(|c| (c.division, c.qualified)).collect();

        let percentile_estimate = self.curve.estimate(swim.time, &ladder);
        let category = swim.event.category();

        let result = AnalysisResult {
            event: swim.event,
            course: swim.course,
            age_group,
            gender: swim.gender,
            time: swim.time,
            category,
            matched_level: benchmark.bracket,
            ability_level: AbilityLevel::from(benchmark.bracket),
            next_level: benchmark.next_level,
            next_level_time: benchmark.next_level_time,
            time_drop_needed: benchmark.time_drop_needed(swim.time),
            percentile_estimate,
            recruiting_qualifications,
            recruiting,
            training_focus_hint: self.focus.hint(category).map(str::to_string),
            standards_version: repo.version(),
        };

        tracing::info!(
            "{} {} {} -> {} ({}th percentile), drop {} to next",
            key,
            swim.time,
            result.ability_level,
            result.matched_level,
            result.percentile_estimate,
            result.time_drop_needed
        );
        Ok(result)
    }
}
