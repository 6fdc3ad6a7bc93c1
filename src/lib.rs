//! Client for a remote data-governance analysis service.
//!
//! Stage a CSV or Excel file, pick a sample size, submit it, and turn the
//! service's report into display-ready sections.

pub mod clients;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod views;

pub use config::Config;
pub use error::{ExportError, PipelineError};
pub use models::AnalysisResult;
pub use services::{PipelineSession, RunState};
