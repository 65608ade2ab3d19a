//! # Assessment Common Library
//!
//! Shared code for the self-assessment service:
//! - Error type and configuration resolution
//! - Questionnaire definition and Typeform payload model
//! - Scoring engine and recommendation generation
//! - Assessment result model and store

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod outcome;
pub mod questionnaire;
pub mod recommendations;
pub mod scoring;
pub mod typeform;

pub use error::{Error, Result};
pub use models::{AssessmentResult, MasteryLevel, Recommendations};
pub use outcome::Outcome;
pub use questionnaire::Questionnaire;
