use crate::core::resolver::check_ladder;
use crate::domain::event::{AgeGroup, Course, Event, Gender};
use crate::domain::model::{RecruitingEntry, StandardEntry};
use crate::domain::ports::StandardsRepository;
use crate::utils::error::{Result, SwimBenchError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotivationalKey {
    pub event: Event,
    pub course: Course,
    pub age_group: AgeGroup,
    pub gender: Gender,
}

impl fmt::Display for MotivationalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.event, self.course, self.age_group, self.gender)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecruitingKey {
    pub event: Event,
    pub course: Course,
    pub gender: Gender,
}

impl fmt::Display for RecruitingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} (recruiting)", self.event, self.course, self.gender)
    }
}

/// One immutable, versioned copy of both reference tables.
#[derive(Debug, Clone)]
pub struct StandardsSnapshot {
    version: u64,
    loaded_at: DateTime<Utc>,
    motivational: HashMap<MotivationalKey, Vec<StandardEntry>>,
    recruiting: HashMap<RecruitingKey, Vec<RecruitingEntry>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    pub motivational_rows: usize,
    pub motivational_keys: usize,
    pub recruiting_rows: usize,
    pub recruiting_keys: usize,
    /// `"100 Free SCY"` style labels of every event with motivational data.
    pub events: BTreeSet<String>,
}

impl StandardsSnapshot {
    /// Groups rows by key and rejects duplicate or non-monotonic ladders.
    pub fn build(version: u64, motivational: Vec<StandardEntry>, recruiting: Vec<RecruitingEntry>) -> Result<Self> {
        let mut ladders: HashMap<MotivationalKey, Vec<StandardEntry>> = HashMap::new();
        for entry in motivational {
            let key = MotivationalKey {
                event: entry.event,
                course: entry.course,
                age_group: entry.age_group,
                gender: entry.gender,
            };
            ladders.entry(key).or_default().push(entry);
        }
        for (key, ladder) in ladders.iter_mut() {
            ladder.sort_by_key(|e| e.level);
            check_ladder(key, ladder)?;
        }

        let mut tiers: HashMap<RecruitingKey, Vec<RecruitingEntry>> = HashMap::new();
        for entry in recruiting {
            let key = RecruitingKey {
                event: entry.event,
                course: entry.course,
                gender: entry.gender,
            };
            let bucket = tiers.entry(key).or_default();
            if bucket.iter().any(|e| e.division == entry.division) {
                return Err(SwimBenchError::AmbiguousDataError {
                    key: key.to_string(),
                    message: format!("{} cutoff listed more than once", entry.division),
                });
            }
            bucket.push(entry);
        }
        for bucket in tiers.values_mut() {
            bucket.sort_by_key(|e| e.division);
        }

        Ok(Self {
            version,
            loaded_at: Utc::now(),
            motivational: ladders,
            recruiting: tiers,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            version: self.version,
            loaded_at: self.loaded_at,
            motivational_rows: self.motivational.values().map(Vec::len).sum(),
            motivational_keys: self.motivational.len(),
            recruiting_rows: self.recruiting.values().map(Vec::len).sum(),
            recruiting_keys: self.recruiting.len(),
            events: self
                .motivational
                .keys()
                .map(|k| format!("{} {}", k.event, k.course))
                .collect(),
        }
    }
}

impl StandardsRepository for StandardsSnapshot {
    fn lookup_motivational(
        &self,
        event: Event,
        age_group: AgeGroup,
        gender: Gender,
        course: Course,
    ) -> Result<Vec<StandardEntry>> {
        let key = MotivationalKey {
            event,
            course,
            age_group,
            gender,
        };
        match self.motivational.get(&key) {
            Some(ladder) if !ladder.is_empty() => Ok(ladder.clone()),
            _ => Err(SwimBenchError::NotFoundError { what: key.to_string() }),
        }
    }

    fn lookup_recruiting(&self, event: Event, gender: Gender, course: Course) -> Result<Vec<RecruitingEntry>> {
        let key = RecruitingKey { event, course, gender };
        match self.recruiting.get(&key) {
            Some(tiers) if !tiers.is_empty() => Ok(tiers.clone()),
            _ => Err(SwimBenchError::NotFoundError { what: key.to_string() }),
        }
    }

    fn version(&self) -> u64 {
        self.version
    }
}
