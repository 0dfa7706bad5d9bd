//! Live reference data.
//!
//! Readers pin the current `StandardsSnapshot` with a single atomic load and
//! keep it for the whole query. A refresh builds the next snapshot off to the
//! side and swaps it in only once it has been fully validated; readers still
//! holding the old `Arc` finish against it undisturbed.

use crate::core::ingest::{parse_motivational, parse_recruiting};
use crate::core::snapshot::StandardsSnapshot;
use crate::domain::event::{AgeGroup, Course, Event, Gender};
use crate::domain::model::{RecruitingEntry, StandardEntry};
use crate::domain::ports::{ReferenceSource, StandardsRepository};
use crate::utils::error::Result;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// File names of the two tables, relative to a `ReferenceSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTables {
    pub motivational: String,
    pub recruiting: String,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            motivational: "motivational_standards.csv".to_string(),
            recruiting: "recruiting_standards.csv".to_string(),
        }
    }
}

/// Reads and validates both tables into a snapshot tagged `version`.
pub async fn read_snapshot(
    source: &dyn ReferenceSource,
    tables: &ReferenceTables,
    version: u64,
) -> Result<StandardsSnapshot> {
    let motivational_name = source.describe(&tables.motivational);
    let recruiting_name = source.describe(&tables.recruiting);

    tracing::debug!("Reading motivational standards from {}", motivational_name);
    let motivational_bytes = source.read_file(&tables.motivational).await?;
    tracing::debug!("Reading recruiting standards from {}", recruiting_name);
    let recruiting_bytes = source.read_file(&tables.recruiting).await?;

    let motivational = parse_motivational(&motivational_name, &motivational_bytes)?;
    let recruiting = parse_recruiting(&recruiting_name, &recruiting_bytes)?;
    StandardsSnapshot::build(version, motivational, recruiting)
}

pub struct StandardsStore {
    current: ArcSwap<StandardsSnapshot>,
    last_version: AtomicU64,
}

impl StandardsStore {
    pub fn new(snapshot: StandardsSnapshot) -> Self {
        let version = snapshot.version();
        Self {
            current: ArcSwap::from_pointee(snapshot),
            last_version: AtomicU64::new(version),
        }
    }

    /// Builds version 1 from `source`.
    pub async fn load(source: &dyn ReferenceSource, tables: &ReferenceTables) -> Result<Self> {
        let snapshot = read_snapshot(source, tables, 1).await?;
        let summary = snapshot.summary();
        tracing::info!(
            "Loaded reference data v{}: {} motivational rows, {} recruiting rows",
            summary.version,
            summary.motivational_rows,
            summary.recruiting_rows
        );
        Ok(Self::new(snapshot))
    }

    /// The snapshot in force right now. Hold on to it for a consistent view.
    pub fn snapshot(&self) -> Arc<StandardsSnapshot> {
        self.current.load_full()
    }

    pub fn version(&self) -> u64 {
        self.current.load().version()
    }

    /// Makes `snapshot` current unless the same or a newer version is
    /// already live. Returns whether it was swapped in. The previous snapshot
    /// is dropped once its last reader lets go.
    pub fn publish(&self, snapshot: StandardsSnapshot) -> bool {
        let version = snapshot.version();
        self.last_version.fetch_max(version, Ordering::SeqCst);

        let candidate = Arc::new(snapshot);
        let previous = self.current.rcu(|current| {
            if version > current.version() {
                Arc::clone(&candidate)
            } else {
                Arc::clone(current)
            }
        });

        if previous.version() < version {
            tracing::debug!("Replaced reference data v{} with v{}", previous.version(), version);
            true
        } else {
            tracing::debug!(
                "Discarded reference data v{}, v{} is already live",
                version,
                previous.version()
            );
            false
        }
    }

    /// Reloads both tables and publishes them as the next version.
    ///
    /// Returns the version live afterwards. When an overlapping refresh has
    /// already published a newer version, this one is discarded. On any error
    /// the current snapshot stays live and the error is returned.
    pub async fn refresh(&self, source: &dyn ReferenceSource, tables: &ReferenceTables) -> Result<u64> {
        let version = self.last_version.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = read_snapshot(source, tables, version).await?;
        if self.publish(snapshot) {
            tracing::info!("Reference data refreshed to v{}", version);
        } else {
            tracing::info!("Reference data v{} superseded by v{}", version, self.version());
        }
        Ok(self.version())
    }
}

impl StandardsRepository for StandardsStore {
    fn lookup_motivational(
        &self,
        event: Event,
        age_group: AgeGroup,
        gender: Gender,
        course: Course,
    ) -> Result<Vec<StandardEntry>> {
        self.current.load().lookup_motivational(event, age_group, gender, course)
    }

    fn lookup_recruiting(&self, event: Event, gender: Gender, course: Course) -> Result<Vec<RecruitingEntry>> {
        self.current.load().lookup_recruiting(event, gender, course)
    }

    fn version(&self) -> u64 {
        StandardsStore::version(self)
    }
}

/// Refreshes `store` every `period` until the handle is aborted.
/// Failures are logged and the previous data keeps serving.
pub fn spawn_refresh(
    store: Arc<StandardsStore>,
    source: Arc<dyn ReferenceSource>,
    tables: ReferenceTables,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = store.refresh(source.as_ref(), &tables).await {
                tracing::warn!(
                    "Reference refresh failed, keeping v{}: {}",
                    store.version(),
                    e
                );
            }
        }
    })
}
