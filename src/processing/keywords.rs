//! Keyword extraction and keyword overlap analysis

use crate::config::ExtractionStrategy;
use crate::error::Result;
use crate::processing::catalog::SkillCatalog;
use crate::processing::stopwords;
use crate::processing::tagger::{self, EntityLabel, PartOfSpeech, Tagger};
use crate::processing::text_processor::NormalizedText;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Lower-cased canonical terms.
pub type TermSet = BTreeSet<String>;

const MAX_PHRASE_TOKENS: usize = 3;

/// Strategy for turning normalized text into a [`TermSet`].
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &NormalizedText) -> TermSet;

    fn strategy(&self) -> ExtractionStrategy;
}

/// Entities, nouns and short noun phrases from the tagger plus catalog skills.
pub struct LinguisticExtractor {
    tagger: Arc<Tagger>,
    skills: Arc<SkillCatalog>,
}

/// Word-pattern tokens minus a short stop list plus catalog skills.
pub struct LexicalExtractor {
    skills: Arc<SkillCatalog>,
    token_regex: Regex,
    stop_words: HashSet<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub match_ratio: f64,
    pub total_jd_keywords: usize,
    pub total_resume_keywords: usize,
}

impl LinguisticExtractor {
    pub fn new(tagger: Arc<Tagger>, skills: Arc<SkillCatalog>) -> Self {
        Self { tagger, skills }
    }

    /// Use the process-wide tagger; fails if it was never initialized.
    pub fn from_shared(skills: Arc<SkillCatalog>) -> Result<Self> {
        Ok(Self::new(tagger::shared()?, skills))
    }
}

impl KeywordExtractor for LinguisticExtractor {
    fn extract(&self, text: &NormalizedText) -> TermSet {
        // Tagged in original case so mid-sentence capitals read as proper nouns.
        let doc = self.tagger.tag(text.as_str());
        let mut terms = TermSet::new();

        for entity in &doc.entities {
            if matches!(
                entity.label,
                EntityLabel::Org | EntityLabel::Product | EntityLabel::WorkOfArt | EntityLabel::Law
            ) {
                terms.insert(entity.text.to_lowercase());
            }
        }

        for token in &doc.tokens {
            if matches!(token.pos, PartOfSpeech::Noun | PartOfSpeech::Propn)
                && token.text.chars().count() > 2
                && !token.is_stop
                && token.is_alpha
            {
                terms.insert(token.lemma.to_lowercase());
            }
        }

        for chunk in &doc.noun_chunks {
            let phrase = chunk.trim().to_lowercase();
            if phrase.chars().count() > 3 && phrase.split_whitespace().count() <= MAX_PHRASE_TOKENS {
                terms.insert(phrase);
            }
        }

        terms.extend(self.skills.find_in(text.as_str()));
        terms
    }

    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Linguistic
    }
}

impl LexicalExtractor {
    pub fn new(skills: Arc<SkillCatalog>) -> Self {
        let token_regex = Regex::new(r"\b[a-z][a-z+#.]+\b").expect("Invalid token regex");

        Self {
            skills,
            token_regex,
            stop_words: stopwords::lexical(),
        }
    }
}

impl KeywordExtractor for LexicalExtractor {
    fn extract(&self, text: &NormalizedText) -> TermSet {
        let lowered = text.to_lowercase();

        let mut terms: TermSet = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() > 2 && !self.stop_words.contains(w))
            .map(str::to_string)
            .collect();

        terms.extend(self.skills.find_in(&lowered));
        terms
    }

    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Lexical
    }
}

/// Build the extractor for `strategy`. The linguistic one needs the shared tagger.
pub fn extractor_for(
    strategy: ExtractionStrategy,
    skills: Arc<SkillCatalog>,
) -> Result<Box<dyn KeywordExtractor>> {
    Ok(match strategy {
        ExtractionStrategy::Linguistic => Box::new(LinguisticExtractor::from_shared(skills)?),
        ExtractionStrategy::Lexical => Box::new(LexicalExtractor::new(skills)),
    })
}

/// Set algebra between resume and job description terms.
///
/// `missing` is sorted and capped at `max_missing`; `match_ratio` is 0 when
/// the job description produced no terms.
pub fn analyze_keywords(resume: &TermSet, jd: &TermSet, max_missing: usize) -> KeywordAnalysis {
    let matched: Vec<String> = resume.intersection(jd).cloned().collect();
    let missing: Vec<String> = jd.difference(resume).take(max_missing).cloned().collect();
    let extra: Vec<String> = resume.difference(jd).cloned().collect();

    let match_ratio = if jd.is_empty() {
        0.0
    } else {
        matched.len() as f64 / jd.len() as f64
    };

    KeywordAnalysis {
        matched,
        missing,
        extra,
        match_ratio,
        total_jd_keywords: jd.len(),
        total_resume_keywords: resume.len(),
    }
}

/// Most frequent meaningful lemmas, ties broken alphabetically.
pub fn keyword_frequency(tagger: &Tagger, text: &str, limit: usize) -> Vec<(String, usize)> {
    let doc = tagger.tag(text);
    let mut counts: HashMap<String, usize> = HashMap::new();

    for token in &doc.tokens {
        if !token.is_stop && !token.is_punct && token.is_alpha && token.text.chars().count() > 2 {
            *counts.entry(token.lemma.clone()).or_insert(0) += 1;
        }
    }

    let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequencies.truncate(limit);
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::text_processor::TextNormalizer;

    fn normalized(text: &str) -> NormalizedText {
        TextNormalizer::new().normalize(text, true)
    }

    fn linguistic() -> LinguisticExtractor {
        LinguisticExtractor::new(
            Arc::new(Tagger::embedded().unwrap()),
            Arc::new(SkillCatalog::default()),
        )
    }

    #[test]
    fn test_linguistic_extraction() {
        let text = normalized("Looking for a Python developer with AWS, Docker, and Kubernetes experience at Google.");
        let terms = linguistic().extract(&text);

        assert!(terms.contains("developer"));
        assert!(terms.contains("experience"));
        assert!(terms.contains("a python developer"));
        assert!(terms.contains("google"));
        assert!(terms.contains("kubernetes"));
        assert!(terms.contains("docker"));
        assert!(!terms.contains("for"));
        assert!(terms.iter().all(|t| *t == t.to_lowercase()));
    }

    #[test]
    fn test_lexical_extraction() {
        let extractor = LexicalExtractor::new(Arc::new(SkillCatalog::default()));
        let text = normalized("The team uses C++ and Node.js with Machine Learning for an API.");

        let terms = extractor.extract(&text);

        assert!(terms.contains("team"));
        assert!(terms.contains("uses"));
        assert!(terms.contains("node.js"));
        assert!(terms.contains("machine learning"));
        assert!(terms.contains("c++"));
        assert!(!terms.contains("the"));
        assert!(!terms.contains("with"));
        assert!(!terms.contains("an"));
    }

    #[test]
    fn test_strategies_share_catalog_hits() {
        let skills = Arc::new(SkillCatalog::default());
        let lexical = LexicalExtractor::new(Arc::clone(&skills));
        let text = normalized("Deep learning with PyTorch and TensorFlow on GCP");

        let catalog_hits = skills.find_in(text.as_str());
        let lexical_terms = lexical.extract(&text);
        let linguistic_terms = linguistic().extract(&text);

        assert!(catalog_hits.is_subset(&lexical_terms));
        assert!(catalog_hits.is_subset(&linguistic_terms));
        assert_eq!(lexical.strategy(), ExtractionStrategy::Lexical);
    }

    #[test]
    fn test_keyword_analysis_partition() {
        let resume: TermSet = ["python", "docker", "leadership"].iter().map(|s| s.to_string()).collect();
        let jd: TermSet = ["python", "docker", "kubernetes", "aws"].iter().map(|s| s.to_string()).collect();

        let analysis = analyze_keywords(&resume, &jd, 20);

        assert_eq!(analysis.matched, vec!["docker", "python"]);
        assert_eq!(analysis.missing, vec!["aws", "kubernetes"]);
        assert_eq!(analysis.extra, vec!["leadership"]);
        assert_eq!(analysis.match_ratio, 0.5);
        assert_eq!(analysis.total_jd_keywords, 4);
        assert_eq!(analysis.total_resume_keywords, 3);
        assert!(analysis.matched.iter().all(|m| !analysis.missing.contains(m)));
    }

    #[test]
    fn test_missing_keywords_are_capped() {
        let resume = TermSet::new();
        let jd: TermSet = (0..30).map(|i| format!("term{:02}", i)).collect();

        let analysis = analyze_keywords(&resume, &jd, 20);

        assert_eq!(analysis.missing.len(), 20);
        assert_eq!(analysis.missing[0], "term00");
        assert_eq!(analysis.match_ratio, 0.0);
    }

    #[test]
    fn test_empty_jd_ratio_is_zero() {
        let resume: TermSet = ["python".to_string()].into_iter().collect();
        let analysis = analyze_keywords(&resume, &TermSet::new(), 20);
        assert_eq!(analysis.match_ratio, 0.0);
    }

    #[test]
    fn test_keyword_frequency() {
        let tagger = Tagger::embedded().unwrap();
        let text = "Rust services. Rust tooling and rust services for the team.";

        let frequencies = keyword_frequency(&tagger, text, 2);

        assert_eq!(frequencies[0], ("rust".to_string(), 3));
        assert_eq!(frequencies[1], ("service".to_string(), 2));
    }

    #[test]
    fn test_capitalized_names_are_kept_as_terms() {
        let text = normalized("Consulted for Bentley and Oakley on logistics.");

        let terms = linguistic().extract(&text);
        assert!(terms.contains("bentley"));
        assert!(terms.contains("oakley"));
        assert!(terms.contains("logistic"));

        let lowered = normalized("consulted for bentley and oakley on logistics.");
        assert!(!linguistic().extract(&lowered).contains("bentley"));

        let tagger = Tagger::embedded().unwrap();
        let frequencies = keyword_frequency(&tagger, "Consulted for Bentley. Bentley renewed.", 5);
        assert!(frequencies.contains(&("bentley".to_string(), 2)));
    }
}
