//! Error types for the date index and path templates.

use chrono::NaiveDate;
use thiserror::Error;

/// Input validation failures raised by the date index and the planner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("invalid range: begin {begin} is after end {end}")]
    InvalidRange { begin: NaiveDate, end: NaiveDate },

    #[error("invalid interval: {0}")]
    InvalidInterval(String),
}

/// Failures while parsing a path template or matching a file name against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown template token `{{{0}}}`")]
    UnknownToken(String),

    #[error("unterminated token in template `{0}`")]
    Unterminated(String),

    #[error("template `{0}` has no {{YYYY}} token")]
    MissingYear(String),

    #[error("`{name}` does not match template `{template}`")]
    Mismatch { name: String, template: String },

    #[error("`{0}` does not encode a valid calendar date")]
    InvalidDate(String),
}
