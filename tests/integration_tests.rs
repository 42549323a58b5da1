//! Integration tests for the ATS analyzer

use smart_ats::config::{ExtractionStrategy, SimilarityStrategy};
use smart_ats::input::{upload_extract, InputManager};
use smart_ats::output::{AnalysisReport, ReportGenerator, ReportMetadata};
use smart_ats::processing::tagger;
use smart_ats::{AnalysisEngine, Config, ErrorKind, SmartAtsError};
use std::path::Path;

fn engine_with(extraction: ExtractionStrategy, similarity: SimilarityStrategy) -> AnalysisEngine {
    tagger::initialize(None).unwrap();
    let mut config = Config::default();
    config.analysis.extraction_strategy = extraction;
    config.analysis.similarity_strategy = similarity;
    AnalysisEngine::from_config(&config).unwrap()
}

async fn fixture_text(name: &str) -> String {
    let mut manager = InputManager::new(Config::default().input);
    manager
        .extract_file(&Path::new("tests/fixtures").join(name))
        .await
        .unwrap()
        .text
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let text = fixture_text("sample_resume.txt").await;

    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let text = fixture_text("sample_resume.md").await;

    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new(Config::default().input);
    let err = manager
        .extract_file(Path::new("tests/fixtures/unsupported.xyz"))
        .await
        .unwrap_err();

    assert!(matches!(err, SmartAtsError::UnsupportedFormat(_)));
    assert_eq!(err.kind(), ErrorKind::Extraction);
}

#[test]
fn test_upload_extract_counts() {
    let bytes = std::fs::read("tests/fixtures/sample_resume.txt").unwrap();
    let doc = upload_extract(&bytes, "txt", &Config::default().input).unwrap();

    assert_eq!(doc.character_count, doc.text.chars().count());
    assert!(doc.word_count > 50);
}

#[tokio::test]
async fn test_full_analysis_of_fixtures() {
    let resume = fixture_text("sample_resume.txt").await;
    let job = fixture_text("sample_job.txt").await;

    let engine = engine_with(ExtractionStrategy::Linguistic, SimilarityStrategy::TfIdf);
    let result = engine.analyze(&resume, &job).unwrap();

    let gap = &result.skill_gap_analysis;
    for skill in ["python", "aws", "docker", "postgresql", "redis"] {
        assert!(gap.matched_skills.contains(&skill.to_string()), "{} not matched", skill);
    }
    assert!(gap.missing_skills.contains(&"kubernetes".to_string()));
    assert!(gap.missing_skills.contains(&"terraform".to_string()));
    assert!(result.skills_score < 100.0);

    assert_eq!(
        result.sections_found,
        vec!["Skills", "Experience", "Education", "Projects", "Summary"]
    );
    assert!(result.sections_missing.is_empty());
    assert_eq!(result.structure_score, 85.0);

    assert!(result.suggestions.len() <= 8);
    assert!(!result.suggestions.iter().any(|s| s.contains("'Projects'")));
    for keyword in &result.matched_keywords {
        assert!(!result.missing_keywords.contains(keyword));
    }
}

#[tokio::test]
async fn test_strategies_agree_on_skills_and_sections() {
    let resume = fixture_text("sample_resume.md").await;
    let job = fixture_text("sample_job.txt").await;

    let linguistic = engine_with(ExtractionStrategy::Linguistic, SimilarityStrategy::TfIdf)
        .analyze(&resume, &job)
        .unwrap();
    let lexical = engine_with(ExtractionStrategy::Lexical, SimilarityStrategy::Jaccard)
        .analyze(&resume, &job)
        .unwrap();

    assert_eq!(linguistic.skill_gap_analysis, lexical.skill_gap_analysis);
    assert_eq!(linguistic.sections_found, lexical.sections_found);
    assert_eq!(linguistic.structure_score, lexical.structure_score);
    for result in [&linguistic, &lexical] {
        assert!((0.0..=100.0).contains(&result.overall_score));
    }
}

#[test]
fn test_short_resume_is_rejected() {
    let engine = engine_with(ExtractionStrategy::Lexical, SimilarityStrategy::TfIdf);
    let err = engine
        .analyze("Rust developer", "Looking for a Rust developer with async experience")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_json_report_shape() {
    let resume = fixture_text("sample_resume.txt").await;
    let job = fixture_text("sample_job.txt").await;
    let engine = engine_with(ExtractionStrategy::Linguistic, SimilarityStrategy::TfIdf);
    let result = engine.analyze(&resume, &job).unwrap();

    let report = AnalysisReport::new(
        result,
        ReportMetadata::new(
            "tests/fixtures/sample_resume.txt",
            Some("tests/fixtures/sample_job.txt".to_string()),
            5,
            engine.extraction_strategy(),
            engine.similarity_strategy(),
        ),
    );
    let json = ReportGenerator::new()
        .generate_report(&report, smart_ats::config::OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    for field in [
        "overall_score",
        "keyword_score",
        "similarity_score",
        "skills_score",
        "structure_score",
        "grade",
        "matched_keywords",
        "missing_keywords",
        "sections_found",
        "sections_missing",
        "suggestions",
        "skill_gap_analysis",
    ] {
        assert!(value["result"].get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(value["metadata"]["similarity_strategy"], "tfidf");
}

#[test]
fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.analysis.similarity_strategy = SimilarityStrategy::Jaccard;
    config.analysis.max_suggestions = 5;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.analysis.similarity_strategy, SimilarityStrategy::Jaccard);
    assert_eq!(loaded.analysis.max_suggestions, 5);
    assert_eq!(loaded.scoring.weights, config.scoring.weights);
}

#[test]
fn test_invalid_weights_in_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut content = toml::to_string_pretty(&Config::default()).unwrap();
    content = content.replace("keyword = 0.4", "keyword = 0.6");
    std::fs::write(&path, content).unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, SmartAtsError::Configuration(_)));
}
