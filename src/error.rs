//! Error handling for the ATS analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartAtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Linguistic resource error: {0}")]
    LinguisticResource(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

/// Coarse classification callers map onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Extraction,
    Unexpected,
}

impl SmartAtsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SmartAtsError::Validation(_) | SmartAtsError::InvalidInput(_) => ErrorKind::Validation,
            SmartAtsError::PdfExtraction(_)
            | SmartAtsError::Extraction(_)
            | SmartAtsError::UnsupportedFormat(_)
            | SmartAtsError::FileTooLarge { .. } => ErrorKind::Extraction,
            _ => ErrorKind::Unexpected,
        }
    }
}

pub type Result<T> = std::result::Result<T, SmartAtsError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for SmartAtsError {
    fn from(err: anyhow::Error) -> Self {
        SmartAtsError::AnalysisFailed(format!("{:#}", err))
    }
}

impl From<toml::de::Error> for SmartAtsError {
    fn from(err: toml::de::Error) -> Self {
        SmartAtsError::Configuration(format!("Failed to parse TOML: {}", err))
    }
}

impl From<toml::ser::Error> for SmartAtsError {
    fn from(err: toml::ser::Error) -> Self {
        SmartAtsError::Configuration(format!("Failed to serialize TOML: {}", err))
    }
}
