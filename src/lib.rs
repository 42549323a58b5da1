//! Smart ATS: resume and job description compatibility analysis

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{ErrorKind, Result, SmartAtsError};
pub use processing::analyzer::{AnalysisEngine, AnalysisResult};
