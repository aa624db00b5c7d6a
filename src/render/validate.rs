//! Lightweight syntax check for generated DOT text.
//!
//! Not a DOT parser: it checks the shape the renderer emits and reports every problem with
//! a 1-based line and column. Checked: the `digraph` header, balanced braces and brackets,
//! closed quoted strings, characters allowed in unquoted IDs and `;`-terminated statements.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ValidationIssue {
    fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Returns every issue found; an empty list means the text looks well-formed.
pub fn validate_dot(text: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match text.lines().enumerate().find(|(_, l)| !l.trim().is_empty()) {
        Some((idx, line)) => {
            let header = line.trim_start();
            if !(header.starts_with("digraph ") && header.trim_end().ends_with('{')) {
                issues.push(ValidationIssue::new(
                    idx + 1,
                    line.len() - header.len() + 1,
                    "expected `digraph <name> {` header",
                ));
            }
        }
        None => {
            issues.push(ValidationIssue::new(1, 1, "empty diagram"));
            return issues;
        }
    }

    // (open char, line, column)
    let mut open: Vec<(char, usize, usize)> = Vec::new();
    let mut quote_start: Option<(usize, usize)> = None;
    let mut escaped = false;
    let mut body_closed_at: Option<(usize, usize)> = None;
    let mut trailing_reported = false;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        for (col, c) in line.chars().enumerate() {
            let column = col + 1;
            if quote_start.is_some() {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => quote_start = None,
                    _ => {}
                }
                continue;
            }

            if let Some((closed_line, _)) = body_closed_at {
                if !c.is_whitespace() && !trailing_reported {
                    issues.push(ValidationIssue::new(
                        line_no,
                        column,
                        format!("content after the graph closed on line {}", closed_line),
                    ));
                    trailing_reported = true;
                }
                continue;
            }

            match c {
                '"' => quote_start = Some((line_no, column)),
                '{' | '[' => open.push((c, line_no, column)),
                '}' | ']' => {
                    let expected = if c == '}' { '{' } else { '[' };
                    match open.pop() {
                        Some((o, _, _)) if o == expected => {
                            if c == '}' && open.is_empty() {
                                body_closed_at = Some((line_no, column));
                            }
                        }
                        Some((o, l, col)) => issues.push(ValidationIssue::new(
                            line_no,
                            column,
                            format!("`{}` closes `{}` opened at {}:{}", c, o, l, col),
                        )),
                        None => issues.push(ValidationIssue::new(
                            line_no,
                            column,
                            format!("unmatched `{}`", c),
                        )),
                    }
                }
                _ if !is_unquoted_char(c) => issues.push(ValidationIssue::new(
                    line_no,
                    column,
                    format!("`{}` is not allowed in an unquoted ID", c),
                )),
                _ => {}
            }
        }

        if quote_start.is_none() && body_closed_at.is_none() {
            check_terminated(line, line_no, &open, &mut issues);
        }
    }

    if let Some((line, column)) = quote_start {
        issues.push(ValidationIssue::new(line, column, "unterminated string"));
    }
    for (c, line, column) in open {
        issues.push(ValidationIssue::new(line, column, format!("unclosed `{}`", c)));
    }
    if body_closed_at.is_none() && issues.is_empty() {
        issues.push(ValidationIssue::new(
            text.lines().count().max(1),
            1,
            "missing closing `}`",
        ));
    }
    issues
}

/// Characters that may appear outside quoted strings: ID characters, numerals, the `->`
/// edge operator, whitespace and statement punctuation.
fn is_unquoted_char(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '_' | '.' | '-' | '>' | ';' | ',' | '=')
}

/// A statement line inside the graph body must end with `;` unless it opens a block.
fn check_terminated(
    line: &str,
    line_no: usize,
    open: &[(char, usize, usize)],
    issues: &mut Vec<ValidationIssue>,
) {
    let trimmed = line.trim_end();
    let inside_body = open.len() == 1 && open[0].0 == '{' && open[0].1 != line_no;
    if !inside_body || trimmed.trim_start().is_empty() {
        return;
    }
    if !(trimmed.ends_with(';') || trimmed.ends_with('{')) {
        issues.push(ValidationIssue::new(
            line_no,
            trimmed.chars().count(),
            "statement is not terminated with `;`",
        ));
    }
}
