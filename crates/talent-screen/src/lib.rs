//! Screening-question authoring and candidate evaluation for job postings.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
