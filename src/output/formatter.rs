//! Output formatters for console, JSON and Markdown reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::AnalysisReport;
use crate::processing::scoring::Grade;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

const PREVIEW_CHARS: usize = 80;

/// Trait for rendering analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors and a detailed mode
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for machine consumption
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the formatter for each format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_grade_badge(&self, grade: Grade) -> String {
        let color = match grade {
            Grade::A => Color::Green,
            Grade::B => Color::BrightGreen,
            Grade::C => Color::Yellow,
            Grade::D => Color::BrightRed,
            Grade::F => Color::Red,
        };

        let badge = format!("[Grade {}]", grade);
        if self.use_colors {
            badge.as_str().color(color).bold().to_string()
        } else {
            badge
        }
    }

    fn format_list(&self, label: &str, items: &[String], color: Color) -> String {
        if items.is_empty() {
            format!("{}: none\n", label)
        } else {
            format!("{}: {}\n", label, self.colorize(&items.join(", "), color))
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.format_header("ATS COMPATIBILITY ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Overall Score: {:.1}% {}\n",
            result.overall_score,
            self.format_grade_badge(result.grade)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(report.verdict(), Color::Cyan)));

        output.push_str(&self.format_header("Score Breakdown", 3));
        output.push_str(&format!("├─ Keyword Match:      {:.1}%\n", result.keyword_score));
        output.push_str(&format!("├─ Content Similarity: {:.1}%\n", result.similarity_score));
        output.push_str(&format!("├─ Skills Coverage:    {:.1}%\n", result.skills_score));
        output.push_str(&format!("└─ Structure:          {:.1}%\n", result.structure_score));

        output.push_str(&self.format_header("Sections", 3));
        output.push_str(&self.format_list("Found", &result.sections_found, Color::Green));
        output.push_str(&self.format_list("Missing", &result.sections_missing, Color::Red));

        let gap = &result.skill_gap_analysis;
        output.push_str(&self.format_header("Skill Gap", 3));
        output.push_str(&format!(
            "Coverage: {:.1}% ({} of {} required skills)\n",
            gap.coverage_percentage,
            gap.matched_skills.len(),
            gap.required_skills.len()
        ));
        output.push_str(&self.format_list("Missing skills", &gap.missing_skills, Color::Red));

        if self.detailed {
            output.push_str(&self.format_list("Matched skills", &gap.matched_skills, Color::Green));
            output.push_str(&self.format_list("Additional skills", &gap.additional_skills, Color::Blue));

            output.push_str(&self.format_header("Keywords", 3));
            output.push_str(&self.format_list("Matched", &result.matched_keywords, Color::Green));
            output.push_str(&self.format_list("Missing", &result.missing_keywords, Color::Red));

            if !report.outline.is_empty() {
                output.push_str(&self.format_header("Resume Outline", 3));
                for section in &report.outline {
                    output.push_str(&format!(
                        "• {}: {}\n",
                        self.colorize(&section.name, Color::Magenta),
                        preview(&section.content, PREVIEW_CHARS)
                    ));
                }
            }
        }

        output.push_str(&self.format_header("Suggestions", 2));
        if result.suggestions.is_empty() {
            output.push_str("No suggestions - nice work!\n");
        }
        for (i, suggestion) in result.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn bullet_list(items: &[String]) -> String {
        if items.is_empty() {
            return "_None_\n".to_string();
        }
        items.iter().map(|item| format!("- {}\n", item)).collect()
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let metadata = &report.metadata;
        let mut output = String::new();

        output.push_str("# ATS Compatibility Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Version:** {}\n\n",
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                metadata.processing_time_ms,
                metadata.version
            ));
            output.push_str(&format!("**Resume:** `{}`", file_name(&metadata.resume_file)));
            if let Some(job_file) = &metadata.job_file {
                output.push_str(&format!(" | **Job:** `{}`", file_name(job_file)));
            }
            output.push_str(&format!(
                " | **Strategies:** {} / {}\n\n",
                metadata.extraction_strategy, metadata.similarity_strategy
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Overall Score:** {:.1}% (Grade {})\n\n",
            result.overall_score, result.grade
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict()));

        output.push_str("### Score Breakdown\n\n");
        output.push_str("| Component | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| Keyword Match | {:.1}% |\n", result.keyword_score));
        output.push_str(&format!("| Content Similarity | {:.1}% |\n", result.similarity_score));
        output.push_str(&format!("| Skills Coverage | {:.1}% |\n", result.skills_score));
        output.push_str(&format!("| Structure | {:.1}% |\n\n", result.structure_score));

        output.push_str("## Sections\n\n");
        output.push_str("**Found**\n\n");
        output.push_str(&Self::bullet_list(&result.sections_found));
        output.push_str("\n**Missing**\n\n");
        output.push_str(&Self::bullet_list(&result.sections_missing));

        let gap = &result.skill_gap_analysis;
        output.push_str(&format!(
            "\n## Skill Gap ({:.1}% coverage)\n\n",
            gap.coverage_percentage
        ));
        output.push_str("| Matched | Missing | Additional |\n");
        output.push_str("|---------|---------|------------|\n");
        output.push_str(&format!(
            "| {} | {} | {} |\n\n",
            gap.matched_skills.join(", "),
            gap.missing_skills.join(", "),
            gap.additional_skills.join(", ")
        ));

        output.push_str("## Keywords\n\n");
        output.push_str("**Matched**\n\n");
        output.push_str(&Self::bullet_list(&result.matched_keywords));
        output.push_str("\n**Missing**\n\n");
        output.push_str(&Self::bullet_list(&result.missing_keywords));

        output.push_str("\n## Suggestions\n\n");
        for (i, suggestion) in result.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let truncated: String = flat.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Where `--save` writes: the path itself, or a generated file name inside it
/// when it names an existing directory.
pub fn resolve_save_path(save: &Path, format: OutputFormat, resume_name: &str) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, resume_name, true))
    } else {
        save.to_path_buf()
    }
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ats{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ats{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ats{}.md", base_name, timestamp_suffix),
    }
}
