//! Input manager for handling different file types

use crate::config::InputConfig;
use crate::error::{Result, SmartAtsError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::text_processor::TextNormalizer;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Normalized text pulled out of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub character_count: usize,
    pub word_count: usize,
}

/// Extract and normalize the text of an in-memory document.
///
/// The extension is checked against the allow-list and the payload against the
/// size limit before any parsing happens.
pub fn upload_extract(bytes: &[u8], extension: &str, config: &InputConfig) -> Result<ExtractedDocument> {
    let extension = extension.trim_start_matches('.').to_lowercase();
    if !config.allowed_extensions.iter().any(|allowed| *allowed == extension) {
        return Err(SmartAtsError::UnsupportedFormat(format!(
            "Invalid file type '{}'. Allowed types: {}",
            extension,
            config.allowed_extensions.join(", ")
        )));
    }

    if bytes.len() > config.max_file_size_bytes {
        return Err(SmartAtsError::FileTooLarge {
            size: bytes.len(),
            limit: config.max_file_size_bytes,
        });
    }

    let raw = match FileType::from_extension(&extension) {
        FileType::Pdf => PdfExtractor.extract(bytes)?,
        FileType::Text => PlainTextExtractor.extract(bytes)?,
        FileType::Markdown => MarkdownExtractor.extract(bytes)?,
        FileType::Unknown => {
            return Err(SmartAtsError::UnsupportedFormat(format!(
                "No extractor available for '{}'",
                extension
            )));
        }
    };

    if raw.trim().chars().count() < config.min_extracted_chars {
        return Err(SmartAtsError::Extraction(
            "Could not extract sufficient text from the document. Please ensure the file is not empty or corrupted."
                .to_string(),
        ));
    }

    let text = TextNormalizer::new().normalize(&raw, true);
    Ok(ExtractedDocument {
        character_count: text.char_count(),
        word_count: text.word_count(),
        text: text.into_inner(),
    })
}

pub struct InputManager {
    config: InputConfig,
    cache: HashMap<PathBuf, ExtractedDocument>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_file(&mut self, path: &Path) -> Result<ExtractedDocument> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(SmartAtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                SmartAtsError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
            })?;

        let metadata = fs::metadata(path).await?;
        if metadata.len() > self.config.max_file_size_bytes as u64 {
            return Err(SmartAtsError::FileTooLarge {
                size: metadata.len() as usize,
                limit: self.config.max_file_size_bytes,
            });
        }

        info!("Extracting text from {:?} file: {}", FileType::from_extension(extension), path.display());
        let bytes = fs::read(path).await?;
        let document = upload_extract(&bytes, extension, &self.config)?;

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), document.clone());
        }

        Ok(document)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    const RESUME: &str = "Jane Doe\nSoftware engineer with seven years of Rust and Python experience.\n";

    #[test]
    fn test_upload_plain_text() {
        let doc = upload_extract(RESUME.as_bytes(), "txt", &InputConfig::default()).unwrap();

        assert!(doc.text.starts_with("Jane Doe"));
        assert_eq!(doc.character_count, doc.text.chars().count());
        assert_eq!(doc.word_count, doc.text.split_whitespace().count());
    }

    #[test]
    fn test_upload_rejects_extension() {
        let err = upload_extract(RESUME.as_bytes(), "docx", &InputConfig::default()).unwrap_err();
        assert!(matches!(err, SmartAtsError::UnsupportedFormat(_)));
        assert_eq!(err.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn test_upload_rejects_large_payload() {
        let config = InputConfig {
            max_file_size_bytes: 16,
            ..InputConfig::default()
        };
        let err = upload_extract(RESUME.as_bytes(), ".TXT", &config).unwrap_err();
        assert!(matches!(err, SmartAtsError::FileTooLarge { limit: 16, .. }));
    }

    #[test]
    fn test_upload_rejects_sparse_text() {
        let err = upload_extract(b"   tiny   ", "md", &InputConfig::default()).unwrap_err();
        assert!(matches!(err, SmartAtsError::Extraction(_)));
        assert!(err.to_string().contains("Could not extract sufficient text"));
    }

    #[test]
    fn test_short_job_file_uses_job_minimum() {
        let job = b"Senior Rust engineer, remote role";
        let config = crate::config::Config::default();

        assert!(upload_extract(job, "txt", &config.input).is_err());
        let doc = upload_extract(job, "txt", &config.job_input()).unwrap();
        assert_eq!(doc.text, "Senior Rust engineer, remote role");
    }

    #[tokio::test]
    async fn test_extract_file_with_cache() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "# Jane Doe\n\n{}", RESUME).unwrap();

        let mut manager = InputManager::new(InputConfig::default());
        let first = manager.extract_file(file.path()).await.unwrap();
        assert_eq!(manager.cache_size(), 1);

        let second = manager.extract_file(file.path()).await.unwrap();
        assert_eq!(first, second);

        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let mut manager = InputManager::new(InputConfig::default()).with_cache(false);
        let err = manager.extract_file(Path::new("/nonexistent/resume.txt")).await.unwrap_err();
        assert!(matches!(err, SmartAtsError::InvalidInput(_)));
    }
}
