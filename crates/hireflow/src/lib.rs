//! Recruiting backend: candidate pipeline, resume screening, job postings and
//! interview scheduling.

pub mod config;
pub mod documents;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
