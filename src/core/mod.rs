pub mod engine;
pub mod goals;
pub mod ingest;
pub mod report;
pub mod resolver;
pub mod snapshot;
pub mod store;

pub use crate::domain::model::{AnalysisResult, RecruitingEntry, StandardEntry, SwimQuery, SwimResult};
pub use crate::domain::ports::{PercentileCurve, ReferenceSource, ReportSink, StandardsRepository};
pub use crate::utils::error::Result;
