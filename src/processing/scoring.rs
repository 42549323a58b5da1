//! Weighted ATS score aggregation

use crate::config::{GradeThresholds, ScoringWeights};
use serde::{Deserialize, Serialize};
use std::fmt;

const REQUIRED_SECTIONS: &[&str] = &["Skills", "Experience", "Education"];
const BONUS_SECTIONS: &[&str] = &["Projects", "Summary", "Certifications", "Achievements"];

const REQUIRED_SECTION_POINTS: f64 = 70.0;
const BONUS_SECTION_POINTS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Component scores on a 0-100 scale and their weighted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword: f64,
    pub similarity: f64,
    pub skills: f64,
    pub structure: f64,
    pub overall: f64,
    pub grade: Grade,
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
    thresholds: GradeThresholds,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights, thresholds: GradeThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(
        &self,
        keyword_ratio: f64,
        similarity_pct: f64,
        skill_ratio: f64,
        sections_found: &[String],
    ) -> ScoreBreakdown {
        let keyword = clamp_score(keyword_ratio * 100.0);
        let similarity = clamp_score(similarity_pct);
        let skills = clamp_score(skill_ratio * 100.0);
        let structure = clamp_score(Self::structure_score(sections_found));

        let overall = clamp_score(
            keyword * self.weights.keyword
                + similarity * self.weights.similarity
                + skills * self.weights.skills
                + structure * self.weights.structure,
        );

        ScoreBreakdown {
            keyword,
            similarity,
            skills,
            structure,
            overall,
            grade: self.grade(overall),
            weights: self.weights,
        }
    }

    /// 70 points prorated over the required sections, up to 30 over the bonus ones.
    pub fn structure_score(sections_found: &[String]) -> f64 {
        let count = |names: &[&str]| {
            names
                .iter()
                .filter(|name| sections_found.iter().any(|found| found.as_str() == **name))
                .count() as f64
        };

        let base = count(REQUIRED_SECTIONS) / REQUIRED_SECTIONS.len() as f64 * REQUIRED_SECTION_POINTS;
        let bonus = (count(BONUS_SECTIONS) / BONUS_SECTIONS.len() as f64 * BONUS_SECTION_POINTS)
            .min(BONUS_SECTION_POINTS);

        base + bonus
    }

    pub fn grade(&self, score: f64) -> Grade {
        if score >= self.thresholds.excellent {
            Grade::A
        } else if score >= self.thresholds.good {
            Grade::B
        } else if score >= self.thresholds.fair {
            Grade::C
        } else if score >= self.thresholds.poor {
            Grade::D
        } else {
            Grade::F
        }
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "═".repeat(39);
        writeln!(f, "ATS Compatibility Analysis:")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Overall Score: {:.1}% (Grade: {})", self.overall, self.grade)?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;
        writeln!(f, "Score Breakdown:")?;
        writeln!(
            f,
            "├─ Keyword Match ({:.0}%):      {:.1}%",
            self.weights.keyword * 100.0,
            self.keyword
        )?;
        writeln!(
            f,
            "├─ Content Similarity ({:.0}%): {:.1}%",
            self.weights.similarity * 100.0,
            self.similarity
        )?;
        writeln!(
            f,
            "├─ Skills Coverage ({:.0}%):    {:.1}%",
            self.weights.skills * 100.0,
            self.skills
        )?;
        write!(
            f,
            "└─ Structure ({:.0}%):          {:.1}%",
            self.weights.structure * 100.0,
            self.structure
        )
    }
}
