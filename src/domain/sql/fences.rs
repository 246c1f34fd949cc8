//! Markdown fence stripping for model-generated SQL

/// Remove a surrounding markdown code fence from generated SQL.
///
/// Language models often wrap SQL in ```` ```sql ````/```` ``` ```` fences
/// even when asked not to. Non-fenced input passes through trimmed.
pub fn strip_sql_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // The opening fence line may carry a language tag; drop the whole line
    let body = match rest.split_once('\n') {
        Some((_, after)) => after,
        None => rest,
    };

    match body.rfind("```") {
        Some(idx) => body[..idx].trim(),
        None => body.trim(),
    }
}
