use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwimBenchError {
    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Insufficient data: no reference standards for {what}")]
    NotFoundError { what: String },

    #[error("Ambiguous reference data for {key}: {message}")]
    AmbiguousDataError { key: String, message: String },

    #[error("Invalid reference data in {source_name} line {line}: {reason}")]
    ReferenceDataError {
        source_name: String,
        line: u64,
        reason: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Query,
    ReferenceData,
    Network,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SwimBenchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SwimBenchError::ValidationError { .. } | SwimBenchError::NotFoundError { .. } => {
                ErrorCategory::Query
            }
            SwimBenchError::AmbiguousDataError { .. }
            | SwimBenchError::ReferenceDataError { .. }
            | SwimBenchError::CsvError(_) => ErrorCategory::ReferenceData,
            SwimBenchError::ApiError(_) => ErrorCategory::Network,
            SwimBenchError::IoError(_) | SwimBenchError::SerializationError(_) => ErrorCategory::Io,
            SwimBenchError::ConfigError { .. }
            | SwimBenchError::ConfigValidationError { .. }
            | SwimBenchError::InvalidConfigValueError { .. }
            | SwimBenchError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Query | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::ReferenceData => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SwimBenchError::ValidationError { field, .. } => match field.as_str() {
                "event" => "Use an event such as '100 Free', '200 Back' or '400 IM' that is swum in the chosen course".to_string(),
                "age" => "USA Swimming age groups are 10&U, 11-12, 13-14, 15-16 and 17-18".to_string(),
                "time" => "Enter the time as SS.ss or M:SS.ss, for example 54.21 or 1:02.35".to_string(),
                "course" => "Use SCY, SCM or LCM".to_string(),
                _ => format!("Check the value supplied for {}", field),
            },
            SwimBenchError::NotFoundError { .. } => {
                "The reference tables have no standards for this combination; check the event, age group, gender and course or load a fuller table".to_string()
            }
            SwimBenchError::AmbiguousDataError { .. } | SwimBenchError::ReferenceDataError { .. } => {
                "Fix the reference table so every level is strictly faster than the one below it and every time is positive".to_string()
            }
            SwimBenchError::CsvError(_) => "Make sure the reference table is a CSV file with a header row".to_string(),
            SwimBenchError::ApiError(_) => "Check network connectivity and the reference base_url, then try again".to_string(),
            SwimBenchError::IoError(_) => "Check that the data directory exists and is readable".to_string(),
            SwimBenchError::SerializationError(_) => "Report rendering failed; retry with markdown output".to_string(),
            SwimBenchError::ConfigError { .. }
            | SwimBenchError::ConfigValidationError { .. }
            | SwimBenchError::InvalidConfigValueError { .. }
            | SwimBenchError::MissingConfigError { .. } => {
                "Review the configuration file and command-line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SwimBenchError::ValidationError { field, message } => {
                format!("The {} you entered is not valid: {}", field, message)
            }
            SwimBenchError::NotFoundError { what } => {
                format!("Insufficient data to benchmark {}", what)
            }
            SwimBenchError::AmbiguousDataError { key, .. } => {
                format!("The reference standards for {} are inconsistent", key)
            }
            SwimBenchError::ReferenceDataError { source_name, line, .. } => {
                format!("The reference table {} has an invalid row at line {}", source_name, line)
            }
            SwimBenchError::ApiError(_) => "Could not download the reference tables".to_string(),
            SwimBenchError::IoError(e) => format!("Could not read or write a file: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwimBenchError>;
