use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MultiplesError {
    #[error("None or too few gpx files found ({found}). You need at least {required} files")]
    InsufficientFiles { found: usize, required: usize },

    #[error("GPX parse error: {message}")]
    Parse { message: String },

    #[error("Track point is missing required attribute '{field}'")]
    MissingField { field: String },

    #[error("Failed to load '{}': {source}", .path.display())]
    BatchLoad {
        path: PathBuf,
        #[source]
        source: Box<MultiplesError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid file pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Rendering failed: {message}")]
    RenderError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MultiplesError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn render(message: impl ToString) -> Self {
        Self::RenderError {
            message: message.to_string(),
        }
    }

    /// The innermost error, looking through `BatchLoad` wrappers.
    pub fn root_cause(&self) -> &MultiplesError {
        match self {
            Self::BatchLoad { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InsufficientFiles { .. } | Self::PatternError(_) => ErrorCategory::Input,
            Self::Parse { .. } | Self::MissingField { .. } => ErrorCategory::Data,
            Self::BatchLoad { source, .. } => source.category(),
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
            Self::CsvError(_) | Self::SerializationError(_) | Self::RenderError { .. } => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IoError(_) => ErrorSeverity::Critical,
            Self::BatchLoad { source, .. } => source.severity(),
            Self::CsvError(_) | Self::SerializationError(_) | Self::RenderError { .. } => {
                ErrorSeverity::Medium
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InsufficientFiles { found, required } => format!(
                "Only {} GPX file(s) found, at least {} are needed to build a grid",
                found, required
            ),
            Self::BatchLoad { path, source } => {
                format!("Could not read track '{}': {}", path.display(), source)
            }
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' is not set", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.root_cause() {
            Self::InsufficientFiles { .. } => {
                "Point the input at a directory or glob that matches more .gpx files, or lower --min-files".to_string()
            }
            Self::Parse { .. } => {
                "Check that the file is complete, well-formed GPX (try opening it in a GPX viewer)".to_string()
            }
            Self::MissingField { .. } => {
                "Every <trkpt> needs numeric lat and lon attributes".to_string()
            }
            Self::PatternError(_) => "Quote the glob pattern and check its syntax".to_string(),
            Self::IoError(_) => "Check file permissions and that the paths exist".to_string(),
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => "Review the command line flags or the TOML configuration".to_string(),
            _ => "Check the output directory is writable and retry".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MultiplesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_load_delegates_to_source() {
        let err = MultiplesError::BatchLoad {
            path: PathBuf::from("a.gpx"),
            source: Box::new(MultiplesError::missing_field("lat")),
        };

        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(matches!(err.root_cause(), MultiplesError::MissingField { .. }));
        assert!(err.to_string().contains("a.gpx"));
        assert!(err.recovery_suggestion().contains("lat and lon"));
    }

    #[test]
    fn test_insufficient_files_message() {
        let err = MultiplesError::InsufficientFiles {
            found: 3,
            required: 5,
        };

        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.to_string().contains("at least 5 files"));
        assert!(err.user_friendly_message().contains("Only 3"));
    }
}
