//! Document similarity between a resume and a job description

use crate::config::SimilarityStrategy;
use crate::error::{Result, SmartAtsError};
use crate::processing::stopwords;
use crate::processing::text_processor::NormalizedText;
use log::{debug, warn};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Similarity as a percentage in `[0, 100]`.
pub trait SimilarityScorer: Send + Sync {
    fn similarity(&self, resume: &NormalizedText, jd: &NormalizedText) -> f64;

    fn strategy(&self) -> SimilarityStrategy;
}

/// Cosine similarity of TF-IDF vectors over unigrams and bigrams.
pub struct TfIdfScorer {
    max_features: usize,
    token_regex: Regex,
    stop_words: HashSet<&'static str>,
}

/// Jaccard overlap of whitespace-separated word sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct JaccardScorer;

// Ordered so that float sums are reproducible across runs.
type SparseVector = BTreeMap<usize, f64>;

impl TfIdfScorer {
    pub fn new(max_features: usize) -> Self {
        let token_regex = Regex::new(r"\b\w\w+\b").expect("Invalid token regex");

        Self {
            max_features: max_features.max(1),
            token_regex,
            stop_words: stopwords::english(),
        }
    }

    /// Unigrams and bigrams of the stop-word-filtered tokens.
    fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
        terms
    }

    /// L2-normalized TF-IDF rows, one per document.
    fn vectorize(&self, documents: &[&str]) -> Result<Vec<SparseVector>> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| self.analyze(d)).collect();

        let mut corpus_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &analyzed {
            for term in terms {
                *corpus_counts.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if corpus_counts.is_empty() {
            return Err(SmartAtsError::TextProcessing(
                "Empty vocabulary; documents contain only stop words".to_string(),
            ));
        }

        // Most frequent terms win; BTreeMap order breaks ties alphabetically.
        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.max_features);

        let mut vocabulary: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        vocabulary.sort_unstable();
        let index: HashMap<&str, usize> =
            vocabulary.iter().enumerate().map(|(i, term)| (*term, i)).collect();

        let counts: Vec<HashMap<usize, f64>> = analyzed
            .iter()
            .map(|terms| {
                let mut row = HashMap::new();
                for term in terms {
                    if let Some(&i) = index.get(term.as_str()) {
                        *row.entry(i).or_insert(0.0) += 1.0;
                    }
                }
                row
            })
            .collect();

        let n_docs = documents.len() as f64;
        let mut doc_freq = vec![0usize; vocabulary.len()];
        for row in &counts {
            for &i in row.keys() {
                doc_freq[i] += 1;
            }
        }
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        debug!("TF-IDF vocabulary size: {}", vocabulary.len());

        Ok(counts
            .into_iter()
            .map(|row| {
                let mut weighted: SparseVector =
                    row.into_iter().map(|(i, tf)| (i, tf * idf[i])).collect();
                let norm = weighted.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    weighted.values_mut().for_each(|w| *w /= norm);
                }
                weighted
            })
            .collect())
    }

    fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        small
            .iter()
            .filter_map(|(i, w)| large.get(i).map(|v| w * v))
            .sum()
    }
}

impl SimilarityScorer for TfIdfScorer {
    fn similarity(&self, resume: &NormalizedText, jd: &NormalizedText) -> f64 {
        match self.vectorize(&[resume.as_str(), jd.as_str()]) {
            Ok(vectors) => (Self::cosine(&vectors[0], &vectors[1]) * 100.0).clamp(0.0, 100.0),
            Err(e) => {
                warn!("Similarity calculation degraded to 0: {}", e);
                0.0
            }
        }
    }

    fn strategy(&self) -> SimilarityStrategy {
        SimilarityStrategy::TfIdf
    }
}

impl SimilarityScorer for JaccardScorer {
    fn similarity(&self, resume: &NormalizedText, jd: &NormalizedText) -> f64 {
        let resume_lower = resume.to_lowercase();
        let jd_lower = jd.to_lowercase();
        let resume_words: HashSet<&str> = resume_lower.split_whitespace().collect();
        let jd_words: HashSet<&str> = jd_lower.split_whitespace().collect();

        if jd_words.is_empty() {
            return 0.0;
        }

        let union = resume_words.union(&jd_words).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = resume_words.intersection(&jd_words).count();

        intersection as f64 / union as f64 * 100.0
    }

    fn strategy(&self) -> SimilarityStrategy {
        SimilarityStrategy::Jaccard
    }
}

pub fn scorer_for(strategy: SimilarityStrategy, max_features: usize) -> Box<dyn SimilarityScorer> {
    match strategy {
        SimilarityStrategy::TfIdf => Box::new(TfIdfScorer::new(max_features)),
        SimilarityStrategy::Jaccard => Box::new(JaccardScorer),
    }
}
