//! Text processing and analysis module

pub mod analyzer;
pub mod catalog;
pub mod keywords;
pub mod scoring;
pub mod sections;
pub mod similarity;
pub mod skill_gap;
pub mod stopwords;
pub mod suggestions;
pub mod tagger;
pub mod text_processor;
