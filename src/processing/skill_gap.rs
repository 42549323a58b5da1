//! Skill gap between the job description and the resume, scoped to the skill catalog

use crate::processing::catalog::SkillCatalog;
use crate::processing::text_processor::NormalizedText;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapAnalysis {
    pub required_skills: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub additional_skills: Vec<String>,
    pub match_ratio: f64,
    pub coverage_percentage: f64,
}

pub struct SkillGapAnalyzer {
    skills: Arc<SkillCatalog>,
}

impl SkillGapAnalyzer {
    pub fn new(skills: Arc<SkillCatalog>) -> Self {
        Self { skills }
    }

    /// A job description without any catalog skill is a full match.
    pub fn analyze(&self, resume: &NormalizedText, jd: &NormalizedText) -> SkillGapAnalysis {
        let jd_skills = self.skills.find_in(jd.as_str());
        let resume_skills = self.skills.find_in(resume.as_str());

        let matched_skills: Vec<String> = jd_skills.intersection(&resume_skills).cloned().collect();
        let missing_skills: Vec<String> = jd_skills.difference(&resume_skills).cloned().collect();
        let additional_skills: Vec<String> =
            resume_skills.difference(&jd_skills).cloned().collect();

        let match_ratio = if jd_skills.is_empty() {
            1.0
        } else {
            matched_skills.len() as f64 / jd_skills.len() as f64
        };

        SkillGapAnalysis {
            required_skills: jd_skills.into_iter().collect(),
            matched_skills,
            missing_skills,
            additional_skills,
            match_ratio,
            coverage_percentage: round_to(match_ratio * 100.0, 1),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
