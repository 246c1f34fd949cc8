//! SQL post-processing: casing normalization, guardrail validation, and
//! markdown fence stripping for model-generated SQL

mod fences;
mod formatter;
mod guardrails;

pub use fences::strip_sql_fences;
pub use formatter::format_casing;
pub use guardrails::{validate_input, validate_syntax, ValidationReport, MAX_QUESTION_LENGTH};
