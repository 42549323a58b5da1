//! Text extraction from various file formats

use crate::error::{Result, SmartAtsError};
use pulldown_cmark::{Event, Parser, Tag};

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            SmartAtsError::PdfExtraction(format!("Failed to extract text from PDF: {}", e))
        })
    }
}

/// UTF-8 text; invalid sequences are replaced rather than rejected.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Markdown rendered to plain text, one line per block element.
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = String::from_utf8_lossy(bytes);
        let mut text = String::new();

        for event in Parser::new(&markdown_content) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                    text.push('\n')
                }
                _ => {}
            }
        }

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text() {
        let markdown = b"# Jane Doe\n\n## Skills\n\n- **Rust**\n- `tokio`\n\nShipped [a CLI](https://example.com).";
        let text = MarkdownExtractor.extract(markdown).unwrap();

        assert_eq!(text, "Jane Doe\nSkills\nRust\ntokio\nShipped a CLI.");
    }

    #[test]
    fn test_plain_text_is_lossy() {
        let text = PlainTextExtractor.extract(b"caf\xff resume").unwrap();
        assert!(text.starts_with("caf"));
        assert!(text.ends_with("resume"));
    }

    #[test]
    fn test_invalid_pdf() {
        let err = PdfExtractor.extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, SmartAtsError::PdfExtraction(_)));
    }
}
