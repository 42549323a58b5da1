//! Text normalization and privacy scrubbing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unicode punctuation folded to ASCII before anything else runs.
const UNICODE_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2019}', "'"),
    ('\u{2018}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2022}', "*"),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\t', " "),
];

/// Text that went through [`TextNormalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

pub struct TextNormalizer {
    disallowed_regex: Regex,
    whitespace_regex: Regex,
    newlines_regex: Regex,
    email_regex: Regex,
    phone_regex: Regex,
    url_regex: Regex,
    linkedin_regex: Regex,
    github_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let disallowed_regex = Regex::new(r#"[^\w\s\-.,;:!?()\[\]{}/&+#@'"|]"#)
            .expect("Invalid disallowed-character regex");

        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        let newlines_regex = Regex::new(r"\n{3,}").expect("Invalid newline regex");

        let email_regex = Regex::new(r"[\w.+-]+@[\w.-]+\.\w+").expect("Invalid email regex");

        let phone_regex =
            Regex::new(r"(?:\+\d{1,3}[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b")
                .expect("Invalid phone regex");

        let url_regex = Regex::new(r"https?://[^\s]+").expect("Invalid URL regex");

        let linkedin_regex =
            Regex::new(r"(?i)linkedin\.com/in/[\w-]+").expect("Invalid LinkedIn regex");

        let github_regex = Regex::new(r"(?i)github\.com/[\w-]+").expect("Invalid GitHub regex");

        Self {
            disallowed_regex,
            whitespace_regex,
            newlines_regex,
            email_regex,
            phone_regex,
            url_regex,
            linkedin_regex,
            github_regex,
        }
    }

    /// Normalize raw text. With `preserve_structure` paragraph breaks survive;
    /// without it the result is a single line.
    pub fn normalize(&self, text: &str, preserve_structure: bool) -> NormalizedText {
        if text.is_empty() {
            return NormalizedText(String::new());
        }

        let folded = Self::fold_unicode(text);
        let stripped = self.disallowed_regex.replace_all(&folded, " ");

        let collapsed = if preserve_structure {
            let lines: Vec<String> = stripped
                .split('\n')
                .map(|line| self.whitespace_regex.replace_all(line, " ").trim().to_string())
                .collect();
            self.newlines_regex
                .replace_all(&lines.join("\n"), "\n\n")
                .into_owned()
        } else {
            self.whitespace_regex.replace_all(&stripped, " ").into_owned()
        };

        NormalizedText(collapsed.trim().to_string())
    }

    /// Replace emails, phone numbers and URLs with placeholder tokens.
    pub fn redact_pii(&self, text: &str) -> String {
        let cleaned = self.url_regex.replace_all(text, "[URL]");
        let cleaned = self.email_regex.replace_all(&cleaned, "[EMAIL]");
        self.phone_regex.replace_all(&cleaned, "[PHONE]").into_owned()
    }

    pub fn extract_contact_info(&self, text: &str) -> ContactInfo {
        let first = |regex: &Regex| regex.find(text).map(|m| m.as_str().to_string());

        ContactInfo {
            email: first(&self.email_regex),
            phone: first(&self.phone_regex),
            linkedin: first(&self.linkedin_regex),
            github: first(&self.github_regex),
        }
    }

    fn fold_unicode(text: &str) -> String {
        let mut folded = String::with_capacity(text.len());
        for c in text.chars() {
            match UNICODE_REPLACEMENTS.iter().find(|(from, _)| *from == c) {
                Some((_, to)) => folded.push_str(to),
                None => folded.push(c),
            }
        }
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let normalizer = TextNormalizer::new();
        assert!(normalizer.normalize("", true).is_empty());
        assert!(normalizer.normalize("   \n\n  ", false).is_empty());
    }

    #[test]
    fn test_unicode_folding() {
        let normalizer = TextNormalizer::new();
        let text = "\u{201C}Rust\u{201D} \u{2014} it\u{2019}s fast\u{2026}";

        let normalized = normalizer.normalize(text, false);

        assert_eq!(normalized.as_str(), "\"Rust\" - it's fast...");
    }

    #[test]
    fn test_special_characters_stripped() {
        let normalizer = TextNormalizer::new();
        let text = "C++ & C# \u{2022} Node.js ~ 100% <fast> $money";

        let normalized = normalizer.normalize(text, false);

        assert_eq!(normalized.as_str(), "C++ & C# Node.js 100 fast money");
    }

    #[test]
    fn test_structure_preserved() {
        let normalizer = TextNormalizer::new();
        let text = "Skills:   Rust,\tGo\n\n\n\n\nExperience:\n  Engineer   at Acme  ";

        let normalized = normalizer.normalize(text, true);

        assert_eq!(normalized.as_str(), "Skills: Rust, Go\n\nExperience:\nEngineer at Acme");
    }

    #[test]
    fn test_flattening() {
        let normalizer = TextNormalizer::new();
        let text = "Skills:\nRust\n\nExperience:\n  Engineer";

        let normalized = normalizer.normalize(text, false);

        assert_eq!(normalized.as_str(), "Skills: Rust Experience: Engineer");
        assert!(!normalized.as_str().contains('\n'));
    }

    #[test]
    fn test_control_characters_removed() {
        let normalizer = TextNormalizer::new();
        let normalized = normalizer.normalize("Rust\u{0007}Python\u{0000}", true);
        assert_eq!(normalized.as_str(), "Rust Python");
    }

    #[test]
    fn test_pii_redaction() {
        let normalizer = TextNormalizer::new();
        let text = "Mail john.doe@company.com, call (555) 123-4567 or see https://johndoe.dev/cv";

        let redacted = normalizer.redact_pii(text);

        assert!(redacted.contains("[EMAIL]"));
        assert!(redacted.contains("[PHONE]"));
        assert!(redacted.contains("[URL]"));
        assert!(!redacted.contains("john.doe@company.com"));
        assert!(!redacted.contains("123-4567"));
        assert!(!redacted.contains("johndoe.dev"));
    }

    #[test]
    fn test_contact_info() {
        let normalizer = TextNormalizer::new();
        let text = "Jane Roe | jane@roe.io | +1 415-555-0199\nlinkedin.com/in/jane-roe | GitHub.com/janeroe";

        let contact = normalizer.extract_contact_info(text);

        assert_eq!(contact.email.as_deref(), Some("jane@roe.io"));
        assert_eq!(contact.phone.as_deref(), Some("+1 415-555-0199"));
        assert_eq!(contact.linkedin.as_deref(), Some("linkedin.com/in/jane-roe"));
        assert_eq!(contact.github.as_deref(), Some("GitHub.com/janeroe"));
    }
}
