//! Rule-based SQL guardrails
//!
//! Validates generated SQL without parsing it: a denylist of mutating
//! keywords, a handful of structural checks, and advisory warnings. Also
//! provides the cheap pre-generation check applied to user questions before
//! any model call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::DomainError;

/// Maximum accepted question length, in characters
pub const MAX_QUESTION_LENGTH: usize = 500;

/// Keywords that mutate or destroy data; only read-only SELECTs pass
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "CREATE", "TRUNCATE", "GRANT", "REVOKE",
];

/// Fused multi-word keywords that usually indicate a missing space
const FUSED_KEYWORDS: &[(&str, &str)] = &[
    ("GROUPBY", "GROUP BY"),
    ("ORDERBY", "ORDER BY"),
    ("INNERJOIN", "INNER JOIN"),
    ("LEFTJOIN", "LEFT JOIN"),
    ("RIGHTJOIN", "RIGHT JOIN"),
    ("OUTERJOIN", "OUTER JOIN"),
    ("FETCHFIRST", "FETCH FIRST"),
];

static FORBIDDEN_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    FORBIDDEN_KEYWORDS
        .iter()
        .map(|keyword| {
            let pattern = format!(r"(?i)\b{}\b", keyword);
            (Regex::new(&pattern).unwrap(), *keyword)
        })
        .collect()
});

static FUSED_PATTERNS: Lazy<Vec<(Regex, &'static str, &'static str)>> = Lazy::new(|| {
    FUSED_KEYWORDS
        .iter()
        .map(|(fused, expected)| {
            let pattern = format!(r"(?i)\b{}\b", fused);
            (Regex::new(&pattern).unwrap(), *fused, *expected)
        })
        .collect()
});

static SELECT_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*SELECT\b").unwrap());
static FROM_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFROM\b").unwrap());
static ROW_LIMIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(FETCH|LIMIT|TOP)\b").unwrap());

/// Outcome of guardrail validation
///
/// Invalid iff at least one error was recorded; warnings are advisory and
/// never affect validity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Validate generated SQL against the guardrail rules.
///
/// Empty input short-circuits with a single error; otherwise every rule runs
/// and each violation appends its own error or warning.
pub fn validate_syntax(sql: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let sql = sql.trim();

    if sql.is_empty() {
        report.error("SQL query is empty");
        return report;
    }

    for (pattern, keyword) in FORBIDDEN_PATTERNS.iter() {
        if pattern.is_match(sql) {
            report.error(format!("Prohibited keyword '{}' detected", keyword));
        }
    }

    if !SELECT_START.is_match(sql) {
        report.error("Query must begin with SELECT");
    }

    if !FROM_CLAUSE.is_match(sql) {
        report.error("Query must contain a FROM clause");
    }

    let opening = sql.matches('(').count();
    let closing = sql.matches(')').count();
    if opening != closing {
        report.error(format!(
            "Unbalanced parentheses: {} opening, {} closing",
            opening, closing
        ));
    }

    if sql.matches('\'').count() % 2 != 0 {
        report.error("Unbalanced single quotes");
    }

    if sql.matches('"').count() % 2 != 0 {
        report.error("Unbalanced double quotes");
    }

    if sql.matches(';').count() > 1 {
        report.error("Multiple SQL statements are not allowed");
    }

    if !ROW_LIMIT.is_match(sql) {
        report.warning("No row-limiting clause found, the query may return a large result set");
    }

    for (pattern, fused, expected) in FUSED_PATTERNS.iter() {
        if pattern.is_match(sql) {
            report.warning(format!(
                "Possible missing space: '{}' should likely be '{}'",
                fused, expected
            ));
        }
    }

    report
}

/// Cheap pre-generation check on the user question.
///
/// Rejects empty or oversized questions and questions that ask for a
/// mutating operation outright. Advisory only: generated SQL still goes
/// through [`validate_syntax`].
pub fn validate_input(question: &str) -> Result<(), DomainError> {
    let question = question.trim();

    if question.is_empty() {
        return Err(DomainError::validation("Question must not be empty"));
    }

    if question.chars().count() > MAX_QUESTION_LENGTH {
        return Err(DomainError::validation(format!(
            "Question exceeds the maximum length of {} characters",
            MAX_QUESTION_LENGTH
        )));
    }

    for (pattern, keyword) in FORBIDDEN_PATTERNS.iter() {
        if pattern.is_match(question) {
            return Err(DomainError::validation(format!(
                "Question contains prohibited operation '{}'",
                keyword
            )));
        }
    }

    Ok(())
}
