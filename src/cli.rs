//! CLI interface for the ATS analyzer

use crate::config::{ExtractionStrategy, OutputFormat, SimilarityStrategy};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "smart-ats")]
#[command(version)]
#[command(about = "Score a resume against a job description the way an ATS would")]
#[command(long_about = "Analyze resume compatibility with a job description using keyword overlap, TF-IDF similarity, skill coverage and section structure")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description passed inline
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        format: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include keyword lists and the resume outline
        #[arg(short, long)]
        detailed: bool,

        /// Keyword extraction strategy: linguistic, lexical
        #[arg(long)]
        strategy: Option<String>,

        /// Similarity strategy: tfidf, jaccard
        #[arg(long)]
        similarity: Option<String>,
    },

    /// Extract and normalize the text of a document
    Extract {
        /// Path to the document (PDF, TXT, MD)
        #[arg(short, long)]
        file: PathBuf,

        /// Replace emails, phone numbers and URLs with placeholders
        #[arg(long)]
        redact: bool,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_extraction_strategy(strategy: &str) -> Result<ExtractionStrategy, String> {
    match strategy.to_lowercase().as_str() {
        "linguistic" => Ok(ExtractionStrategy::Linguistic),
        "lexical" => Ok(ExtractionStrategy::Lexical),
        _ => Err(format!(
            "Invalid extraction strategy: {}. Supported: linguistic, lexical",
            strategy
        )),
    }
}

pub fn parse_similarity_strategy(strategy: &str) -> Result<SimilarityStrategy, String> {
    match strategy.to_lowercase().as_str() {
        "tfidf" | "tf-idf" => Ok(SimilarityStrategy::TfIdf),
        "jaccard" => Ok(SimilarityStrategy::Jaccard),
        _ => Err(format!(
            "Invalid similarity strategy: {}. Supported: tfidf, jaccard",
            strategy
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[String]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            if allowed_extensions.iter().any(|allowed| *allowed == ext) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_requires_job_source() {
        assert!(Cli::try_parse_from(["smart-ats", "analyze", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "smart-ats", "analyze", "--resume", "cv.pdf", "--job", "jd.txt", "--job-text", "Rust dev"
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "smart-ats", "--verbose", "analyze", "-r", "cv.pdf", "--job-text", "Rust developer wanted",
            "--similarity", "jaccard",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze { job, job_text, similarity, .. } => {
                assert!(job.is_none());
                assert_eq!(job_text.as_deref(), Some("Rust developer wanted"));
                assert_eq!(similarity.as_deref(), Some("jaccard"));
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
        assert_eq!(parse_extraction_strategy("Lexical"), Ok(ExtractionStrategy::Lexical));
        assert_eq!(parse_similarity_strategy("tf-idf"), Ok(SimilarityStrategy::TfIdf));
        assert!(parse_similarity_strategy("bm25").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = vec!["pdf".to_string(), "txt".to_string()];
        assert!(validate_file_extension(Path::new("cv.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("cv"), &allowed).is_err());
    }
}
