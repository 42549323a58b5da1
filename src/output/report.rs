//! Report structures wrapping an analysis result with run metadata

use crate::config::{ExtractionStrategy, SimilarityStrategy};
use crate::processing::analyzer::AnalysisResult;
use crate::processing::scoring::Grade;
use crate::processing::sections::ResumeSection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub metadata: ReportMetadata,
    /// Resume split on its section headers, shown in detailed output.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline: Vec<ResumeSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub resume_file: String,
    /// `None` when the job description was passed inline.
    pub job_file: Option<String>,
    pub processing_time_ms: u64,
    pub extraction_strategy: ExtractionStrategy,
    pub similarity_strategy: SimilarityStrategy,
}

impl AnalysisReport {
    pub fn new(result: AnalysisResult, metadata: ReportMetadata) -> Self {
        Self {
            result,
            metadata,
            outline: Vec::new(),
        }
    }

    pub fn with_outline(mut self, outline: Vec<ResumeSection>) -> Self {
        self.outline = outline;
        self
    }

    /// One-line verdict for the grade, so it follows configured thresholds.
    pub fn verdict(&self) -> &'static str {
        match self.result.grade {
            Grade::A => "Excellent match - your resume is well aligned with this role",
            Grade::B => "Good match - a few targeted changes will strengthen it",
            Grade::C => "Fair match - tailor your resume further for this role",
            Grade::D => "Weak match - significant gaps against the job description",
            Grade::F => "Poor match - this resume is unlikely to pass ATS screening",
        }
    }
}

impl ReportMetadata {
    pub fn new(
        resume_file: impl Into<String>,
        job_file: Option<String>,
        processing_time_ms: u64,
        extraction_strategy: ExtractionStrategy,
        similarity_strategy: SimilarityStrategy,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.into(),
            job_file,
            processing_time_ms,
            extraction_strategy,
            similarity_strategy,
        }
    }
}
