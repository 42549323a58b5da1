//! Skill and section catalogs shared read-only by every analysis

use crate::error::{Result, SmartAtsError};
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::BTreeSet;

const DEFAULT_SKILLS: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust",
    "php", "swift", "kotlin", "scala", "r", "matlab", "perl", "sql", "bash", "shell",
    // Web technologies
    "html", "css", "react", "angular", "vue", "nodejs", "node.js", "express",
    "django", "flask", "fastapi", "spring", "nextjs", "next.js", "nuxt",
    "tailwind", "bootstrap", "sass", "less", "webpack", "vite",
    // Databases
    "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "cassandra",
    "oracle", "sqlite", "dynamodb", "firebase", "supabase",
    // Cloud and devops
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "terraform",
    "ansible", "ci/cd", "github actions", "gitlab", "circleci", "linux",
    // Data science and ML
    "machine learning", "deep learning", "tensorflow", "pytorch", "keras",
    "scikit-learn", "pandas", "numpy", "matplotlib", "nlp", "computer vision",
    "data analysis", "data science", "statistics", "ai", "neural networks",
    // Tooling and practices
    "git", "jira", "agile", "scrum", "rest api", "graphql", "microservices",
    "api", "testing", "unit testing", "selenium", "cypress", "figma",
];

const DEFAULT_SECTIONS: &[(&str, &[&str])] = &[
    ("skills", &["skills", "technical skills", "core competencies", "technologies"]),
    ("experience", &["experience", "work experience", "professional experience", "employment"]),
    ("education", &["education", "academic", "qualification", "degree"]),
    ("projects", &["projects", "personal projects", "academic projects"]),
    ("certifications", &["certifications", "certificates", "credentials"]),
    ("summary", &["summary", "objective", "profile", "about me", "professional summary"]),
    ("achievements", &["achievements", "accomplishments", "awards", "honors"]),
];

const DEFAULT_REQUIRED_SECTIONS: &[&str] = &["skills", "experience", "education"];

/// Known technology and skill terms, matched as raw substrings.
pub struct SkillCatalog {
    skills: Vec<String>,
    matcher: AhoCorasick,
}

impl SkillCatalog {
    pub fn new<I, S>(skills: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = skills
            .into_iter()
            .map(|s| s.into().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        let skills: Vec<String> = unique.into_iter().collect();

        // Standard semantics are required for overlapping search: every skill
        // contained anywhere in the text must be reported, not just the longest.
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&skills)
            .map_err(|e| {
                SmartAtsError::TextProcessing(format!("Failed to build skill matcher: {}", e))
            })?;

        Ok(Self { skills, matcher })
    }

    /// Every catalog skill that appears as a substring of `text` (compared lower-cased).
    pub fn find_in(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.matcher
            .find_overlapping_iter(&lowered)
            .map(|m| self.skills[m.pattern().as_usize()].clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.as_str())
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied()).expect("Failed to build default skill catalog")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    pub name: String,
    pub aliases: Vec<String>,
}

/// Canonical resume sections with the header aliases that identify them.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    entries: Vec<SectionEntry>,
    required: Vec<String>,
}

impl SectionCatalog {
    pub fn new(entries: Vec<SectionEntry>, required: Vec<String>) -> Result<Self> {
        for name in &required {
            if !entries.iter().any(|e| &e.name == name) {
                return Err(SmartAtsError::Configuration(format!(
                    "Required section '{}' is not part of the section catalog",
                    name
                )));
            }
        }

        let entries = entries
            .into_iter()
            .map(|e| SectionEntry {
                name: e.name.to_lowercase(),
                aliases: e.aliases.into_iter().map(|a| a.to_lowercase()).collect(),
            })
            .collect();

        Ok(Self {
            entries,
            required: required.into_iter().map(|r| r.to_lowercase()).collect(),
        })
    }

    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// All aliases across sections, longest first.
    pub fn all_aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<(&str, &str)> = self
            .entries
            .iter()
            .flat_map(|e| e.aliases.iter().map(move |a| (a.as_str(), e.name.as_str())))
            .collect();
        aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
        aliases
    }
}

impl Default for SectionCatalog {
    fn default() -> Self {
        let entries = DEFAULT_SECTIONS
            .iter()
            .map(|(name, aliases)| SectionEntry {
                name: name.to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();
        let required = DEFAULT_REQUIRED_SECTIONS.iter().map(|s| s.to_string()).collect();

        Self::new(entries, required).expect("Failed to build default section catalog")
    }
}

/// Title-case a canonical name (`"skills"` becomes `"Skills"`).
pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_size() {
        let catalog = SkillCatalog::default();
        assert!(catalog.len() >= 90);
        let skills: Vec<&str> = catalog.iter().collect();
        assert!(skills.contains(&"kubernetes"));
        assert!(skills.contains(&"c++"));
        assert!(!skills.contains(&"cobol"));
    }

    #[test]
    fn test_substring_hits() {
        let catalog = SkillCatalog::default();
        let hits = catalog.find_in("Built REST API services with Node.js and Machine Learning");

        assert!(hits.contains("rest api"));
        assert!(hits.contains("api"));
        assert!(hits.contains("node.js"));
        assert!(hits.contains("machine learning"));
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = SkillCatalog::new(vec!["Haskell", "  elm ", "haskell"]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find_in("I write HASKELL daily").len(), 1);
    }

    #[test]
    fn test_section_catalog_rejects_unknown_required() {
        let entries = vec![SectionEntry {
            name: "skills".into(),
            aliases: vec!["skills".into()],
        }];
        assert!(SectionCatalog::new(entries, vec!["education".into()]).is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("skills"), "Skills");
        assert_eq!(title_case("work experience"), "Work Experience");
    }
}
