//! Smart ATS: score a resume against a job description from the command line

use clap::Parser;
use log::{error, info};
use smart_ats::cli::{self, Cli, Commands, ConfigAction};
use smart_ats::input::InputManager;
use smart_ats::output::{
    resolve_save_path, save_report_to_file, AnalysisReport, ReportGenerator, ReportMetadata,
};
use smart_ats::processing::catalog::SectionCatalog;
use smart_ats::processing::sections::SectionDetector;
use smart_ats::processing::keywords;
use smart_ats::processing::tagger;
use smart_ats::processing::text_processor::TextNormalizer;
use smart_ats::{AnalysisEngine, Config, Result, SmartAtsError};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

const TOP_TERMS: usize = 15;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_or_init(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            format,
            save,
            detailed,
            strategy,
            similarity,
        } => {
            let start_time = Instant::now();
            info!("Starting ATS analysis");

            cli::validate_file_extension(&resume, &config.input.allowed_extensions)
                .map_err(|e| SmartAtsError::InvalidInput(format!("Resume file: {}", e)))?;

            if let Some(strategy) = strategy {
                config.analysis.extraction_strategy =
                    cli::parse_extraction_strategy(&strategy).map_err(SmartAtsError::InvalidInput)?;
            }
            if let Some(similarity) = similarity {
                config.analysis.similarity_strategy =
                    cli::parse_similarity_strategy(&similarity).map_err(SmartAtsError::InvalidInput)?;
            }
            let output_format = match format {
                Some(format) => cli::parse_output_format(&format).map_err(SmartAtsError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;

            tagger::initialize(config.linguistics.lexicon_path.as_deref())?;
            let engine = AnalysisEngine::from_config(&config)?;

            let mut input_manager = InputManager::new(config.input.clone());
            let resume_doc = input_manager.extract_file(&resume).await?;
            let job_description = match (&job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(path, &config.input.allowed_extensions)
                        .map_err(|e| SmartAtsError::InvalidInput(format!("Job description file: {}", e)))?;
                    let mut job_manager = InputManager::new(config.job_input()).with_cache(false);
                    job_manager.extract_file(path).await?.text
                }
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(SmartAtsError::InvalidInput(
                        "Provide a job description with --job or --job-text".to_string(),
                    ));
                }
            };

            info!(
                "Resume: {} characters, {} words",
                resume_doc.character_count, resume_doc.word_count
            );

            let result = engine.analyze(&resume_doc.text, &job_description)?;

            let metadata = ReportMetadata::new(
                resume.to_string_lossy(),
                job.as_ref().map(|p| p.to_string_lossy().into_owned()),
                start_time.elapsed().as_millis() as u64,
                engine.extraction_strategy(),
                engine.similarity_strategy(),
            );
            let mut report = AnalysisReport::new(result, metadata);
            if detailed {
                let detector = SectionDetector::new(Arc::new(SectionCatalog::default()));
                report = report.with_outline(detector.split_sections(&resume_doc.text));
            }

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
            let rendered = generator.generate_report(&report, output_format)?;

            match save {
                Some(path) => {
                    let path = resolve_save_path(&path, output_format, &resume.to_string_lossy());
                    save_report_to_file(&rendered, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Extract { file, redact } => {
            let mut input_manager = InputManager::new(config.input.clone()).with_cache(false);
            let document = input_manager.extract_file(&file).await?;
            let normalizer = TextNormalizer::new();

            let contact = normalizer.extract_contact_info(&document.text);
            let text = if redact {
                normalizer.redact_pii(&document.text)
            } else {
                document.text
            };

            println!("{}", text);
            println!();
            println!("Characters: {} | Words: {}", document.character_count, document.word_count);
            if !redact {
                println!("Contact info: {}", serde_json::to_string_pretty(&contact)?);
            }

            let tagger = tagger::initialize(config.linguistics.lexicon_path.as_deref())?;
            let top_terms = keywords::keyword_frequency(&tagger, &text, TOP_TERMS);
            if !top_terms.is_empty() {
                let listed: Vec<String> = top_terms
                    .iter()
                    .map(|(term, count)| format!("{} ({})", term, count))
                    .collect();
                println!("Top terms: {}", listed.join(", "));
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("Configuration ({})\n", path.display());
                    let content = toml::to_string_pretty(&config)?;
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset to defaults at {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
