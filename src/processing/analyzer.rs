//! Main analysis engine combining keyword, similarity, skill and structure analysis

use crate::config::{Config, ExtractionStrategy, SimilarityStrategy};
use crate::error::{Result, SmartAtsError};
use crate::processing::catalog::{SectionCatalog, SkillCatalog};
use crate::processing::keywords::{self, KeywordExtractor};
use crate::processing::scoring::{Grade, ScoringEngine};
use crate::processing::sections::SectionDetector;
use crate::processing::similarity::{self, SimilarityScorer};
use crate::processing::skill_gap::{round_to, SkillGapAnalysis, SkillGapAnalyzer};
use crate::processing::suggestions::SuggestionGenerator;
use crate::processing::text_processor::TextNormalizer;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub keyword_score: f64,
    pub similarity_score: f64,
    pub skills_score: f64,
    pub structure_score: f64,
    pub grade: Grade,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub sections_found: Vec<String>,
    pub sections_missing: Vec<String>,
    pub suggestions: Vec<String>,
    pub skill_gap_analysis: SkillGapAnalysis,
}

/// Coordinates the analysis components. Stateless between calls.
pub struct AnalysisEngine {
    normalizer: TextNormalizer,
    extractor: Box<dyn KeywordExtractor>,
    scorer: Box<dyn SimilarityScorer>,
    section_detector: SectionDetector,
    skill_gap: SkillGapAnalyzer,
    scoring: ScoringEngine,
    suggestions: SuggestionGenerator,
    min_resume_chars: usize,
    min_job_chars: usize,
    max_missing_keywords: usize,
}

impl AnalysisEngine {
    /// Build the engine with the built-in catalogs and the configured strategies.
    ///
    /// The linguistic strategy requires `tagger::initialize` to have run.
    pub fn from_config(config: &Config) -> Result<Self> {
        let skills = Arc::new(SkillCatalog::default());
        let extractor = keywords::extractor_for(config.analysis.extraction_strategy, skills.clone())?;
        Self::with_components(config, extractor, skills, Arc::new(SectionCatalog::default()))
    }

    pub fn with_components(
        config: &Config,
        extractor: Box<dyn KeywordExtractor>,
        skills: Arc<SkillCatalog>,
        sections: Arc<SectionCatalog>,
    ) -> Result<Self> {
        config.validate()?;

        let analysis = &config.analysis;
        Ok(Self {
            normalizer: TextNormalizer::new(),
            extractor,
            scorer: similarity::scorer_for(analysis.similarity_strategy, analysis.max_features),
            section_detector: SectionDetector::new(sections),
            skill_gap: SkillGapAnalyzer::new(skills),
            scoring: ScoringEngine::new(config.scoring.weights, config.scoring.thresholds),
            suggestions: SuggestionGenerator::new(analysis.max_suggestions),
            min_resume_chars: analysis.min_resume_chars,
            min_job_chars: analysis.min_job_chars,
            max_missing_keywords: analysis.max_missing_keywords,
        })
    }

    pub fn extraction_strategy(&self) -> ExtractionStrategy {
        self.extractor.strategy()
    }

    pub fn similarity_strategy(&self) -> SimilarityStrategy {
        self.scorer.strategy()
    }

    /// Score `resume_text` against `job_description`.
    ///
    /// Fails with a validation error, before any scoring, when either trimmed
    /// input is shorter than its configured minimum.
    pub fn analyze(&self, resume_text: &str, job_description: &str) -> Result<AnalysisResult> {
        let start_time = Instant::now();

        let resume_text = resume_text.trim();
        let job_description = job_description.trim();
        self.validate(resume_text, job_description)?;

        let stage = Instant::now();
        let resume = self.normalizer.normalize(resume_text, true);
        let jd = self.normalizer.normalize(job_description, true);
        debug!(
            "Normalized inputs ({} / {} chars) in {:?}",
            resume.char_count(),
            jd.char_count(),
            stage.elapsed()
        );

        let stage = Instant::now();
        let resume_terms = self.extractor.extract(&resume);
        let jd_terms = self.extractor.extract(&jd);
        debug!(
            "Extracted {} resume and {} job terms with {} strategy in {:?}",
            resume_terms.len(),
            jd_terms.len(),
            self.extractor.strategy(),
            stage.elapsed()
        );

        let stage = Instant::now();
        let similarity = self.scorer.similarity(&resume, &jd);
        debug!(
            "{} similarity {:.2} in {:?}",
            self.scorer.strategy(),
            similarity,
            stage.elapsed()
        );

        let stage = Instant::now();
        let keyword_analysis =
            keywords::analyze_keywords(&resume_terms, &jd_terms, self.max_missing_keywords);
        let section_analysis = self.section_detector.detect(&resume);
        let skill_gap = self.skill_gap.analyze(&resume, &jd);
        debug!(
            "Keyword ratio {:.3}, skill ratio {:.3}, sections {:?} in {:?}",
            keyword_analysis.match_ratio,
            skill_gap.match_ratio,
            section_analysis.found,
            stage.elapsed()
        );

        let breakdown = self.scoring.score(
            keyword_analysis.match_ratio,
            similarity,
            skill_gap.match_ratio,
            &section_analysis.found,
        );

        let suggestions = self.suggestions.generate(
            &keyword_analysis,
            &section_analysis,
            &skill_gap,
            breakdown.overall,
        );

        debug!("Analysis completed in {:?}\n{}", start_time.elapsed(), breakdown);

        Ok(AnalysisResult {
            overall_score: round_to(breakdown.overall, 1),
            keyword_score: round_to(breakdown.keyword, 1),
            similarity_score: round_to(breakdown.similarity, 1),
            skills_score: round_to(breakdown.skills, 1),
            structure_score: round_to(breakdown.structure, 1),
            grade: breakdown.grade,
            matched_keywords: keyword_analysis.matched,
            missing_keywords: keyword_analysis.missing,
            sections_found: section_analysis.found,
            sections_missing: section_analysis.missing,
            suggestions,
            skill_gap_analysis: skill_gap,
        })
    }

    fn validate(&self, resume_text: &str, job_description: &str) -> Result<()> {
        if resume_text.chars().count() < self.min_resume_chars {
            return Err(SmartAtsError::Validation(
                "Resume text is too short for analysis".to_string(),
            ));
        }
        if job_description.chars().count() < self.min_job_chars {
            return Err(SmartAtsError::Validation(
                "Job description is too short for analysis".to_string(),
            ));
        }
        Ok(())
    }
}
