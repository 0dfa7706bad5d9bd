use crate::domain::event::{AgeGroup, Course, Event, Gender};
use crate::domain::model::{RecruitingEntry, StandardEntry};
use crate::domain::time::SwimTime;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to the two reference tables.
pub trait StandardsRepository: Send + Sync {
    /// Motivational cutoffs for one key, slowest level first.
    fn lookup_motivational(
        &self,
        event: Event,
        age_group: AgeGroup,
        gender: Gender,
        course: Course,
    ) -> Result<Vec<StandardEntry>>;

    fn lookup_recruiting(&self, event: Event, gender: Gender, course: Course) -> Result<Vec<RecruitingEntry>>;

    /// Version of the data being served; 0 when unversioned.
    fn version(&self) -> u64 {
        0
    }
}

/// Where reference-table bytes come from.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Human-readable location, used in logs and ingest errors.
    fn describe(&self, path: &str) -> String;
}

/// Where rendered reports are written.
pub trait ReportSink: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Maps a time's position on a level ladder to a percentile.
pub trait PercentileCurve: Send + Sync {
    /// `ladder` is sorted slowest level first and is never empty.
    fn estimate(&self, time: SwimTime, ladder: &[StandardEntry]) -> f64;
}
