//! Configuration management for the ATS analyzer

use crate::error::{Result, SmartAtsError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub analysis: AnalysisConfig,
    pub linguistics: LinguisticsConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub thresholds: GradeThresholds,
}

/// Component weights of the overall score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keyword: f64,
    pub similarity: f64,
    pub skills: f64,
    pub structure: f64,
}

/// Lower bounds of the A, B, C and D grades. Anything below `poor` is an F.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub extraction_strategy: ExtractionStrategy,
    pub similarity_strategy: SimilarityStrategy,
    pub max_missing_keywords: usize,
    pub max_suggestions: usize,
    pub min_resume_chars: usize,
    pub min_job_chars: usize,
    pub max_features: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinguisticsConfig {
    /// Lexicon file for the tagger; the embedded lexicon is used when unset.
    pub lexicon_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub min_extracted_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    Linguistic,
    Lexical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityStrategy {
    TfIdf,
    Jaccard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl ScoringWeights {
    pub fn new(keyword: f64, similarity: f64, skills: f64, structure: f64) -> Result<Self> {
        let weights = Self {
            keyword,
            similarity,
            skills,
            structure,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<()> {
        let parts = [self.keyword, self.similarity, self.skills, self.structure];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0 || *w > 1.0) {
            return Err(SmartAtsError::Configuration(
                "Scoring weights must each lie in [0, 1]".to_string(),
            ));
        }

        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(SmartAtsError::Configuration(format!(
                "Scoring weights must sum to 1.0, got {:.4}",
                sum
            )));
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: 0.40,
            similarity: 0.30,
            skills: 0.20,
            structure: 0.10,
        }
    }
}

impl GradeThresholds {
    pub fn new(excellent: f64, good: f64, fair: f64, poor: f64) -> Result<Self> {
        let thresholds = Self {
            excellent,
            good,
            fair,
            poor,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        let ordered = self.excellent > self.good && self.good > self.fair && self.fair > self.poor;
        if !ordered || self.poor < 0.0 || self.excellent > 100.0 {
            return Err(SmartAtsError::Configuration(
                "Grade thresholds must be strictly descending within [0, 100]".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            excellent: 85.0,
            good: 70.0,
            fair: 55.0,
            poor: 40.0,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extraction_strategy: ExtractionStrategy::Linguistic,
            similarity_strategy: SimilarityStrategy::TfIdf,
            max_missing_keywords: 20,
            max_suggestions: 8,
            min_resume_chars: 50,
            min_job_chars: 20,
            max_features: 5000,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024,
            allowed_extensions: ["pdf", "txt", "md", "markdown"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_extracted_chars: 50,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Linguistic => write!(f, "linguistic"),
            ExtractionStrategy::Lexical => write!(f, "lexical"),
        }
    }
}

impl fmt::Display for SimilarityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityStrategy::TfIdf => write!(f, "tfidf"),
            SimilarityStrategy::Jaccard => write!(f, "jaccard"),
        }
    }
}

impl Config {
    /// Load the configuration from the default location, writing defaults on first use.
    pub fn load() -> Result<Self> {
        Self::load_or_init(&Self::config_path())
    }

    /// Load from `path`, writing the defaults there first if the file does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Input limits for job description files, which have their own minimum length.
    pub fn job_input(&self) -> InputConfig {
        InputConfig {
            min_extracted_chars: self.analysis.min_job_chars,
            ..self.input.clone()
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("smart-ats")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.weights.validate()?;
        self.scoring.thresholds.validate()?;

        if self.analysis.max_suggestions == 0 {
            return Err(SmartAtsError::Configuration(
                "analysis.max_suggestions must be at least 1".to_string(),
            ));
        }
        if self.analysis.max_features == 0 {
            return Err(SmartAtsError::Configuration(
                "analysis.max_features must be at least 1".to_string(),
            ));
        }
        if self.input.allowed_extensions.is_empty() {
            return Err(SmartAtsError::Configuration(
                "input.allowed_extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
