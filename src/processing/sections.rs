//! Resume section detection

use crate::processing::catalog::{title_case, SectionCatalog};
use crate::processing::text_processor::NormalizedText;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub structure_ratio: f64,
    pub has_all_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub name: String,
    pub content: String,
}

pub struct SectionDetector {
    catalog: Arc<SectionCatalog>,
}

impl SectionDetector {
    pub fn new(catalog: Arc<SectionCatalog>) -> Self {
        Self { catalog }
    }

    /// A section counts as present when any of its aliases occurs anywhere in the text.
    pub fn detect(&self, resume: &NormalizedText) -> SectionAnalysis {
        let text = resume.to_lowercase();
        let mut found = Vec::new();
        let mut missing = Vec::new();
        let mut required_found = 0;

        for entry in self.catalog.entries() {
            let present = entry.aliases.iter().any(|alias| text.contains(alias.as_str()));
            let required = self.catalog.is_required(&entry.name);

            if present {
                found.push(title_case(&entry.name));
                if required {
                    required_found += 1;
                }
            } else if required {
                missing.push(title_case(&entry.name));
            }
        }

        let required_total = self.catalog.required().len();
        let structure_ratio = if required_total == 0 {
            1.0
        } else {
            required_found as f64 / required_total as f64
        };

        SectionAnalysis {
            has_all_required: missing.is_empty(),
            found,
            missing,
            structure_ratio,
        }
    }

    /// Split text into sections on lines that start with a known header.
    ///
    /// Lines before the first header belong to `header`. Section names are the
    /// matched header with spaces replaced by underscores.
    pub fn split_sections(&self, text: &str) -> Vec<ResumeSection> {
        let aliases = self.catalog.all_aliases();
        let mut sections: Vec<ResumeSection> = Vec::new();
        let mut current = "header".to_string();
        let mut content: Vec<&str> = Vec::new();

        for line in text.lines() {
            let lowered = line.trim().to_lowercase();
            let header = aliases
                .iter()
                .map(|(alias, _)| *alias)
                .find(|alias| lowered.starts_with(alias));

            match header {
                Some(alias) => {
                    if !content.is_empty() {
                        sections.push(ResumeSection {
                            name: current,
                            content: content.join("\n"),
                        });
                        content.clear();
                    }
                    current = alias.replace(' ', "_");
                }
                None => content.push(line),
            }
        }

        if !content.is_empty() {
            sections.push(ResumeSection {
                name: current,
                content: content.join("\n"),
            });
        }

        sections
    }
}
