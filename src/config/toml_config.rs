use crate::config::cli::LocalStorage;
use crate::config::http::HttpSource;
use crate::core::goals::{AnchorCurve, TrainingFocusTable};
use crate::core::store::{spawn_refresh, ReferenceTables, StandardsStore};
use crate::core::ReferenceSource;
use crate::domain::event::{Course, EventCategory, Gender};
use crate::domain::model::Level;
use crate::utils::error::{Result, SwimBenchError};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_path, validate_range, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub reference: ReferenceConfig,
    pub percentile: PercentileConfig,
    pub training_focus: TrainingFocusConfig,
    pub defaults: DefaultsConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Local,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub source: SourceKind,
    pub base_path: String,
    pub base_url: Option<String>,
    pub motivational: String,
    pub recruiting: String,
    pub timeout_seconds: Option<u64>,
    pub refresh_interval_seconds: Option<u64>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        let tables = ReferenceTables::default();
        Self {
            source: SourceKind::Local,
            base_path: "./data".to_string(),
            base_url: None,
            motivational: tables.motivational,
            recruiting: tables.recruiting,
            timeout_seconds: None,
            refresh_interval_seconds: None,
        }
    }
}

/// Overrides on top of the shipped percentile curve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentileConfig {
    /// Level code to percentile, e.g. `AAA = 95.0`.
    pub anchors: HashMap<String, f64>,
    pub floor_percentile: Option<f64>,
    pub floor_span: Option<f64>,
    pub ceiling_percentile: Option<f64>,
    pub ceiling_span: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingFocusConfig {
    pub sprint: Option<String>,
    pub middle: Option<String>,
    pub distance: Option<String>,
    pub im: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub gender: String,
    pub course: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            gender: "M".to_string(),
            course: "SCY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SwimBenchError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SwimBenchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REFERENCE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SwimBenchError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn reference_tables(&self) -> ReferenceTables {
        ReferenceTables {
            motivational: self.reference.motivational.clone(),
            recruiting: self.reference.recruiting.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.reference.timeout_seconds.unwrap_or(30))
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.reference
            .refresh_interval_seconds
            .map(Duration::from_secs)
    }

    /// Starts refreshing `store` from `source` every configured interval.
    pub fn start_refresh(
        &self,
        store: Arc<StandardsStore>,
        source: Arc<dyn ReferenceSource>,
    ) -> Result<JoinHandle<()>> {
        let period = self
            .refresh_interval()
            .ok_or_else(|| SwimBenchError::MissingConfigError {
                field: "reference.refresh_interval_seconds".to_string(),
            })?;
        tracing::info!("Refreshing reference data every {}s", period.as_secs());
        Ok(spawn_refresh(store, source, self.reference_tables(), period))
    }

    pub fn default_gender(&self) -> Result<Gender> {
        self.defaults.gender.parse()
    }

    pub fn default_course(&self) -> Result<Course> {
        self.defaults.course.parse()
    }

    pub fn percentile_curve(&self) -> Result<AnchorCurve> {
        let mut anchors = BTreeMap::new();
        for (code, &value) in &self.percentile.anchors {
            let level: Level = code.parse().map_err(|_| SwimBenchError::InvalidConfigValueError {
                field: "percentile.anchors".to_string(),
                value: code.clone(),
                reason: "not a motivational level code".to_string(),
            })?;
            anchors.insert(level, value);
        }

        AnchorCurve::default().with_overrides(
            &anchors,
            self.percentile.floor_percentile,
            self.percentile.floor_span,
            self.percentile.ceiling_percentile,
            self.percentile.ceiling_span,
        )
    }

    pub fn focus_table(&self) -> TrainingFocusTable {
        let overrides = [
            (EventCategory::Sprint, &self.training_focus.sprint),
            (EventCategory::Middle, &self.training_focus.middle),
            (EventCategory::Distance, &self.training_focus.distance),
            (EventCategory::IM, &self.training_focus.im),
        ];
        overrides
            .into_iter()
            .fold(TrainingFocusTable::default(), |table, (category, hint)| match hint {
                Some(hint) => table.with_hint(category, hint.clone()),
                None => table,
            })
    }

    pub fn build_source(&self) -> Result<Arc<dyn ReferenceSource>> {
        match self.reference.source {
            SourceKind::Local => Ok(Arc::new(LocalStorage::new(&self.reference.base_path))),
            SourceKind::Http => {
                let base_url = validate_required_field("reference.base_url", &self.reference.base_url)?;
                Ok(Arc::new(HttpSource::new(base_url, self.timeout())?))
            }
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring.as_ref().and_then(|m| m.json_logs).unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.reference.source {
            SourceKind::Local => validate_path("reference.base_path", &self.reference.base_path)?,
            SourceKind::Http => {
                let base_url = validate_required_field("reference.base_url", &self.reference.base_url)?;
                validate_url("reference.base_url", base_url)?;
            }
        }

        validate_non_empty_string("reference.motivational", &self.reference.motivational)?;
        validate_non_empty_string("reference.recruiting", &self.reference.recruiting)?;
        validate_file_extensions(
            "reference",
            &[&self.reference.motivational, &self.reference.recruiting],
            &["csv"],
        )?;

        if let Some(timeout) = self.reference.timeout_seconds {
            validate_range("reference.timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(interval) = self.reference.refresh_interval_seconds {
            validate_range("reference.refresh_interval_seconds", interval, 1, 7 * 24 * 3600)?;
        }

        self.default_gender()?;
        self.default_course()?;
        self.percentile_curve()?;

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
