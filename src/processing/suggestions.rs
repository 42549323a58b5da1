//! Improvement suggestions derived from the component analyses

use crate::processing::keywords::KeywordAnalysis;
use crate::processing::sections::SectionAnalysis;
use crate::processing::skill_gap::SkillGapAnalysis;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;

const LOW_SCORE_MESSAGE: &str = "Your resume needs significant improvements to pass ATS screening";
const FAIR_SCORE_MESSAGE: &str = "Consider tailoring your resume more closely to this job description";
const GOOD_SCORE_MESSAGE: &str = "Good foundation! A few optimizations could improve your chances";

pub struct SuggestionGenerator {
    max_suggestions: usize,
}

impl Default for SuggestionGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUGGESTIONS)
    }
}

impl SuggestionGenerator {
    pub fn new(max_suggestions: usize) -> Self {
        Self { max_suggestions }
    }

    /// Rules run in a fixed order; the score tier message always leads.
    pub fn generate(
        &self,
        keywords: &KeywordAnalysis,
        sections: &SectionAnalysis,
        skill_gap: &SkillGapAnalysis,
        overall_score: f64,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        let missing_keywords = &keywords.missing;
        if missing_keywords.len() > 5 {
            suggestions.push(format!(
                "Add these important keywords from the job description: {}",
                missing_keywords[..5].join(", ")
            ));
        } else if !missing_keywords.is_empty() {
            suggestions.push(format!(
                "Consider adding these keywords: {}",
                missing_keywords.join(", ")
            ));
        }

        let missing_skills = &skill_gap.missing_skills;
        if missing_skills.len() > 3 {
            let shown = &missing_skills[..missing_skills.len().min(5)];
            suggestions.push(format!(
                "Critical: Add these required skills to your resume: {}",
                shown.join(", ")
            ));
        } else if !missing_skills.is_empty() {
            suggestions.push(format!("Add missing skills: {}", missing_skills.join(", ")));
        }

        for section in &sections.missing {
            let message = match section.as_str() {
                "Skills" => "Add a dedicated 'Skills' section with relevant technical and soft skills",
                "Experience" => "Include a 'Work Experience' section with quantified achievements",
                "Education" => "Add an 'Education' section with your degrees and certifications",
                _ => continue,
            };
            suggestions.push(message.to_string());
        }

        if let Some(tier) = Self::tier_message(overall_score) {
            suggestions.insert(0, tier.to_string());
        }

        if !sections.found.iter().any(|s| s == "Projects") {
            suggestions.push("Consider adding a 'Projects' section to showcase relevant work".to_string());
        }
        if !sections.found.iter().any(|s| s == "Summary") {
            suggestions.push(
                "Add a professional summary at the top highlighting key qualifications".to_string(),
            );
        }

        if overall_score >= 70.0 {
            suggestions.push("Tip: Use specific metrics and numbers to quantify your achievements".to_string());
        }

        suggestions.truncate(self.max_suggestions);
        suggestions
    }

    fn tier_message(overall_score: f64) -> Option<&'static str> {
        if overall_score < 40.0 {
            Some(LOW_SCORE_MESSAGE)
        } else if overall_score < 55.0 {
            Some(FAIR_SCORE_MESSAGE)
        } else if overall_score < 70.0 {
            Some(GOOD_SCORE_MESSAGE)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn keywords(missing: &[&str]) -> KeywordAnalysis {
        KeywordAnalysis {
            matched: Vec::new(),
            missing: strings(missing),
            extra: Vec::new(),
            match_ratio: 0.0,
            total_jd_keywords: missing.len(),
            total_resume_keywords: 0,
        }
    }

    fn sections(found: &[&str], missing: &[&str]) -> SectionAnalysis {
        SectionAnalysis {
            found: strings(found),
            missing: strings(missing),
            structure_ratio: 0.0,
            has_all_required: missing.is_empty(),
        }
    }

    fn skill_gap(missing: &[&str]) -> SkillGapAnalysis {
        SkillGapAnalysis {
            required_skills: strings(missing),
            matched_skills: Vec::new(),
            missing_skills: strings(missing),
            additional_skills: Vec::new(),
            match_ratio: 0.0,
            coverage_percentage: 0.0,
        }
    }

    #[test]
    fn test_low_score_order_and_cap() {
        let suggestions = SuggestionGenerator::default().generate(
            &keywords(&["a1", "a2", "a3", "a4", "a5", "a6"]),
            &sections(&[], &["Skills", "Experience", "Education"]),
            &skill_gap(&["aws", "docker", "go", "kubernetes", "rust", "sql"]),
            20.0,
        );

        assert_eq!(suggestions.len(), 8);
        assert_eq!(suggestions[0], LOW_SCORE_MESSAGE);
        assert_eq!(
            suggestions[1],
            "Add these important keywords from the job description: a1, a2, a3, a4, a5"
        );
        assert_eq!(
            suggestions[2],
            "Critical: Add these required skills to your resume: aws, docker, go, kubernetes, rust"
        );
        assert!(suggestions[3].contains("'Skills'"));
        assert!(suggestions[4].contains("'Work Experience'"));
        assert!(suggestions[5].contains("'Education'"));
        assert!(suggestions[6].contains("'Projects'"));
        assert!(suggestions[7].contains("professional summary"));
    }

    #[test]
    fn test_few_missing_items() {
        let suggestions = SuggestionGenerator::default().generate(
            &keywords(&["kubernetes"]),
            &sections(&["Skills", "Experience", "Education", "Projects", "Summary"], &[]),
            &skill_gap(&["kubernetes", "terraform"]),
            60.0,
        );

        assert_eq!(
            suggestions,
            vec![
                GOOD_SCORE_MESSAGE.to_string(),
                "Consider adding these keywords: kubernetes".to_string(),
                "Add missing skills: kubernetes, terraform".to_string(),
            ]
        );
    }

    #[test]
    fn test_high_score_tip() {
        let suggestions = SuggestionGenerator::default().generate(
            &keywords(&[]),
            &sections(&["Skills", "Experience", "Education", "Projects", "Summary"], &[]),
            &skill_gap(&[]),
            88.0,
        );

        assert_eq!(
            suggestions,
            vec!["Tip: Use specific metrics and numbers to quantify your achievements".to_string()]
        );
    }

    #[test]
    fn test_tier_bands() {
        assert_eq!(SuggestionGenerator::tier_message(39.9), Some(LOW_SCORE_MESSAGE));
        assert_eq!(SuggestionGenerator::tier_message(40.0), Some(FAIR_SCORE_MESSAGE));
        assert_eq!(SuggestionGenerator::tier_message(55.0), Some(GOOD_SCORE_MESSAGE));
        assert_eq!(SuggestionGenerator::tier_message(70.0), None);
    }

    #[test]
    fn test_custom_cap() {
        let suggestions = SuggestionGenerator::new(2).generate(
            &keywords(&["x"]),
            &sections(&[], &["Skills"]),
            &skill_gap(&["aws"]),
            10.0,
        );
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0], LOW_SCORE_MESSAGE);
    }
}
