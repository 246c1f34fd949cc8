//! SQL casing normalization
//!
//! Uppercases keywords and lowercases identifiers without parsing the
//! statement. The result is stable: formatting already-formatted SQL is a
//! no-op.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Canonical keywords; multi-word forms are normalized as a unit
const SQL_KEYWORDS: &[&str] = &[
    "GROUP BY",
    "ORDER BY",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "OUTER JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "FETCH FIRST",
    "ROWS ONLY",
    "UNION ALL",
    "SELECT",
    "FROM",
    "WHERE",
    "JOIN",
    "ON",
    "AND",
    "OR",
    "NOT",
    "IN",
    "IS",
    "NULL",
    "LIKE",
    "BETWEEN",
    "AS",
    "DISTINCT",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "EXISTS",
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "ASC",
    "DESC",
    "WITH",
    "TOP",
];

static KEYWORD_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    SQL_KEYWORDS
        .iter()
        .map(|keyword| {
            // Internal whitespace in multi-word keywords matches any run
            let pattern = format!(r"(?i)\b{}\b", keyword.replace(' ', r"\s+"));
            (Regex::new(&pattern).unwrap(), *keyword)
        })
        .collect()
});

/// Every individual word of every keyword, so the identifier pass can
/// recognize keyword occurrences the first pass produced
static KEYWORD_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    SQL_KEYWORDS
        .iter()
        .flat_map(|keyword| keyword.split(' '))
        .collect()
});

/// Normalize keyword and identifier casing in a SQL string.
///
/// Keywords become uppercase, identifiers (including qualified
/// `table.column` references) become lowercase. Numeric literals and tokens
/// beginning with a quote are left untouched. Whitespace and punctuation are
/// preserved, except that multi-word keywords collapse internal whitespace
/// to a single space.
pub fn format_casing(sql: &str) -> String {
    let uppercased = uppercase_keywords(sql);
    recase_identifiers(&uppercased)
}

fn uppercase_keywords(sql: &str) -> String {
    let mut result = sql.to_string();

    for (pattern, keyword) in KEYWORD_PATTERNS.iter() {
        result = pattern.replace_all(&result, NoExpand(keyword)).into_owned();
    }

    result
}

fn recase_identifiers(sql: &str) -> String {
    let mut result = String::with_capacity(sql.len());
    let mut word = String::new();

    for c in sql.chars() {
        if c.is_whitespace() || is_token_punctuation(c) {
            flush_word(&mut result, &mut word);
            result.push(c);
        } else {
            word.push(c);
        }
    }
    flush_word(&mut result, &mut word);

    result
}

fn is_token_punctuation(c: char) -> bool {
    matches!(c, ',' | '(' | ')' | ';')
}

fn flush_word(result: &mut String, word: &mut String) {
    if word.is_empty() {
        return;
    }

    let keep_as_is = KEYWORD_WORDS.contains(word.to_ascii_uppercase().as_str())
        || is_numeric_literal(word)
        || word.starts_with('\'')
        || word.starts_with('"');

    if keep_as_is {
        result.push_str(word);
    } else {
        result.push_str(&word.to_ascii_lowercase());
    }

    word.clear();
}

fn is_numeric_literal(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_digit() || c == '.')
        && word.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercases_keywords() {
        let formatted = format_casing("select name from users where age > 30");

        assert_eq!(formatted, "SELECT name FROM users WHERE age > 30");
    }

    #[test]
    fn test_lowercases_identifiers() {
        let formatted = format_casing("SELECT NAME FROM USERS");

        assert_eq!(formatted, "SELECT name FROM users");
    }

    #[test]
    fn test_multi_word_keywords_normalized_as_unit() {
        let formatted = format_casing("select dept from emp group   by dept order by dept desc");

        assert_eq!(
            formatted,
            "SELECT dept FROM emp GROUP BY dept ORDER BY dept DESC"
        );
    }

    #[test]
    fn test_qualified_names_lowercased_whole() {
        let formatted = format_casing("SELECT U.Name FROM Users U");

        assert_eq!(formatted, "SELECT u.name FROM users u");
    }

    #[test]
    fn test_numeric_literals_untouched() {
        let formatted = format_casing("select price from item fetch first 10 rows only");

        assert_eq!(formatted, "SELECT price FROM item FETCH FIRST 10 ROWS ONLY");

        let formatted = format_casing("select 10.5 from dual");

        assert_eq!(formatted, "SELECT 10.5 FROM dual");
    }

    #[test]
    fn test_quoted_tokens_untouched() {
        let formatted = format_casing("select name from city where name = 'Boston'");

        assert_eq!(formatted, "SELECT name FROM city WHERE name = 'Boston'");
    }

    #[test]
    fn test_punctuation_and_spacing_preserved() {
        let formatted = format_casing("select a,b , c from t;");

        assert_eq!(formatted, "SELECT a,b , c FROM t;");
    }

    #[test]
    fn test_keyword_substring_in_identifier_untouched() {
        let formatted = format_casing("SELECT created_by, selector FROM audit_log");

        assert_eq!(formatted, "SELECT created_by, selector FROM audit_log");
    }

    #[test]
    fn test_aggregate_functions_uppercased() {
        let formatted = format_casing("select count(*), max(total) from orders");

        assert_eq!(formatted, "SELECT COUNT(*), MAX(total) FROM orders");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "select name from users where age > 30",
            "select dept, count(*) from emp group by dept order by 2 desc",
            "SELECT U.Name FROM Users U INNER JOIN Orders O ON O.user_id = U.id",
            "select * from t where city = 'New York' fetch first 5 rows only;",
            "select a,b , c from t",
        ];

        for input in inputs {
            let once = format_casing(input);
            let twice = format_casing(&once);

            assert_eq!(once, twice, "formatting is not stable for {:?}", input);
        }
    }
}
