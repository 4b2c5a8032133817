//! Problem file parser and validator
//!
//! File layout, one item per line:
//!
//! ```text
//! 2            number of template lines (k)
//! catdog       target string
//! Adog         k template lines
//! cAt
//! A:cat,xyz    one candidate line per symbol
//! ```
//!
//! Every symbol used in a template needs a candidate line. Candidate lines
//! for symbols no template uses are accepted; those symbols are unused.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::model::{Problem, Symbol, Template};

/// Parse error with location information
#[derive(Debug, Clone)]
pub struct ParseError {
    pub line_number: usize,
    pub column: Option<usize>,
    pub message: String,
    pub line_content: String,
}

impl ParseError {
    pub fn new(
        line_number: usize,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            column: None,
            message: message.into(),
            line_content: line_content.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = self.column {
            write!(
                f,
                "line {}, column {}: {}\n  | {}\n  | {}^",
                self.line_number,
                col,
                self.message,
                self.line_content,
                " ".repeat(col.saturating_sub(1))
            )
        } else {
            write!(
                f,
                "line {}: {}\n  | {}",
                self.line_number, self.message, self.line_content
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// Validated contents of a problem file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemInput {
    /// Number of template lines declared on line 1
    pub declared_templates: usize,
    /// Target string
    pub target: String,
    /// Templates in file order, duplicates included
    pub templates: Vec<Template>,
    /// Candidates per symbol, unfiltered, in file order
    pub candidates: BTreeMap<Symbol, Vec<String>>,
}

impl ProblemInput {
    /// Build the search problem (deduplicates templates, filters candidates)
    pub fn into_problem(self) -> Problem {
        Problem::new(self.target, self.templates, &self.candidates)
    }
}

/// Parse and validate a problem file
pub fn parse_problem_file(path: &Path) -> Result<ProblemInput, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ParseError::new(
            0,
            format!("failed to read file: {}", e),
            path.display().to_string(),
        )
    })?;

    parse_problem_str(&content)
}

/// Parse and validate problem text
pub fn parse_problem_str(content: &str) -> Result<ProblemInput, ParseError> {
    let mut lines: Vec<&str> = content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let count_line = lines
        .first()
        .ok_or_else(|| ParseError::new(1, "missing template count", ""))?;
    let declared_templates = parse_count(count_line).map_err(|e| e.at_line(1, count_line))?;

    let target_line = lines
        .get(1)
        .ok_or_else(|| ParseError::new(2, "missing target string", ""))?;
    let target = parse_target(target_line).map_err(|e| e.at_line(2, target_line))?;

    let mut templates = Vec::new();
    let mut first_use: BTreeMap<Symbol, usize> = BTreeMap::new();

    for i in 0..declared_templates {
        let line_number = i + 3;
        let line = lines.get(i + 2).ok_or_else(|| {
            ParseError::new(
                line_number,
                format!(
                    "expected {} template lines, found {}",
                    declared_templates,
                    lines.len().saturating_sub(2)
                ),
                "",
            )
        })?;

        let template = parse_template(line).map_err(|e| e.at_line(line_number, line))?;
        for sym in template.symbols() {
            first_use.entry(sym).or_insert(line_number);
        }
        templates.push(template);
    }

    let mut candidates: BTreeMap<Symbol, Vec<String>> = BTreeMap::new();
    let first_candidate_line = declared_templates.saturating_add(2);
    for (offset, line) in lines.iter().enumerate().skip(first_candidate_line) {
        let line_number = offset + 1;
        let (sym, list) = parse_candidate_line(line).map_err(|e| e.at_line(line_number, line))?;

        if candidates.contains_key(&sym) {
            return Err(ParseError::new(
                line_number,
                format!("duplicate candidate line for symbol {}", sym),
                *line,
            )
            .with_column(1));
        }
        candidates.insert(sym, list);
    }

    if let Some((sym, &line_number)) = first_use
        .iter()
        .find(|(sym, _)| !candidates.contains_key(*sym))
    {
        return Err(ParseError::new(
            line_number,
            format!("symbol {} has no candidate line", sym),
            lines[line_number - 1],
        ));
    }

    Ok(ProblemInput {
        declared_templates,
        target,
        templates,
        candidates,
    })
}

/// Error from a single-line parser, before the line number is known
#[derive(Debug)]
struct LineError {
    message: String,
    column: Option<usize>,
}

impl LineError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            column: None,
        }
    }

    fn at_column(message: impl Into<String>, column: usize) -> Self {
        Self {
            message: message.into(),
            column: Some(column),
        }
    }

    fn at_line(self, line_number: usize, line: &str) -> ParseError {
        let error = ParseError::new(line_number, self.message, line);
        match self.column {
            Some(col) => error.with_column(col),
            None => error,
        }
    }
}

/// First character (1-based column) that fails `valid`
fn first_invalid(s: &str, valid: impl Fn(char) -> bool) -> Option<(usize, char)> {
    s.chars()
        .enumerate()
        .find(|(_, c)| !valid(*c))
        .map(|(i, c)| (i + 1, c))
}

fn parse_count(line: &str) -> Result<usize, LineError> {
    if line.is_empty() {
        return Err(LineError::new("empty template count"));
    }
    if let Some((col, c)) = first_invalid(line, |c| c.is_ascii_digit()) {
        return Err(LineError::at_column(
            format!("template count must be an unsigned integer, found '{}'", c),
            col,
        ));
    }
    line.parse::<usize>()
        .map_err(|e| LineError::new(format!("invalid template count '{}': {}", line, e)))
}

fn parse_target(line: &str) -> Result<String, LineError> {
    if line.is_empty() {
        return Err(LineError::new("empty target string"));
    }
    if let Some((col, c)) = first_invalid(line, |c| c.is_ascii_lowercase()) {
        return Err(LineError::at_column(
            format!("target must contain only lowercase letters, found '{}'", c),
            col,
        ));
    }
    Ok(line.to_string())
}

fn parse_template(line: &str) -> Result<Template, LineError> {
    if line.is_empty() {
        return Err(LineError::new("empty template"));
    }
    if let Some((col, c)) = first_invalid(line, |c| c.is_ascii_alphabetic()) {
        return Err(LineError::at_column(
            format!("template must contain only letters, found '{}'", c),
            col,
        ));
    }
    Template::parse(line).map_err(LineError::new)
}

/// Parse `S:cand1,cand2,...`
fn parse_candidate_line(line: &str) -> Result<(Symbol, Vec<String>), LineError> {
    if line.trim().is_empty() {
        return Err(LineError::new("blank line where a candidate line was expected"));
    }

    let sym = line
        .chars()
        .next()
        .and_then(Symbol::new)
        .ok_or_else(|| LineError::at_column("candidate line must start with a symbol", 1))?;

    let Some(list) = line[1..].strip_prefix(':') else {
        return Err(LineError::at_column("expected ':' after symbol", 2));
    };

    let mut candidates = Vec::new();
    let mut column = 3;
    for candidate in list.split(',') {
        if candidate.is_empty() {
            return Err(LineError::at_column("empty candidate", column));
        }
        if let Some((col, c)) = first_invalid(candidate, |c| c.is_ascii_lowercase()) {
            return Err(LineError::at_column(
                format!("candidates must contain only lowercase letters, found '{}'", c),
                column + col - 1,
            ));
        }
        column += candidate.len() + 1;
        candidates.push(candidate.to_string());
    }

    Ok((sym, candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::new(c).unwrap()
    }

    #[test]
    fn test_parse_valid_file() {
        let input = parse_problem_str("2\ncatdog\nAdog\ncAt\nA:cat,xyz,at\n").unwrap();

        assert_eq!(input.declared_templates, 2);
        assert_eq!(input.target, "catdog");
        assert_eq!(input.templates.len(), 2);
        assert_eq!(
            input.candidates.get(&sym('A')),
            Some(&vec!["cat".to_string(), "xyz".to_string(), "at".to_string()])
        );
    }

    #[test]
    fn test_parse_keeps_duplicate_templates_until_problem() {
        let input = parse_problem_str("3\ncatdog\nAdog\nAdog\ncat\nA:cat\n").unwrap();
        assert_eq!(input.templates.len(), 3);

        let problem = input.into_problem();
        assert_eq!(problem.templates().len(), 2);
    }

    #[test]
    fn test_parse_unused_symbol_accepted() {
        let input = parse_problem_str("1\ncatdog\nAdog\nA:cat\nZ:q\n").unwrap();
        let problem = input.into_problem();
        assert!(!problem.candidates().is_participating(sym('Z')));
    }

    #[test]
    fn test_parse_crlf_and_trailing_blank_lines() {
        let input = parse_problem_str("1\r\ncatdog\r\nAdog\r\nA:cat\r\n\r\n\n").unwrap();
        assert_eq!(input.target, "catdog");
        assert_eq!(input.candidates.len(), 1);
    }

    #[test]
    fn test_parse_zero_templates() {
        let input = parse_problem_str("0\nabc\n").unwrap();
        assert!(input.templates.is_empty());
        assert!(input.candidates.is_empty());
    }

    #[test]
    fn test_parse_invalid_count() {
        let err = parse_problem_str("x\ncatdog\n").unwrap_err();
        assert_eq!(err.line_number, 1);
        assert_eq!(err.column, Some(1));

        assert!(parse_problem_str("-1\ncatdog\n").is_err());
        assert!(parse_problem_str("").is_err());
    }

    #[test]
    fn test_parse_huge_template_count() {
        let err = parse_problem_str("1000000000000000000\nabc\nA\nA:a\n").unwrap_err();
        assert_eq!(err.line_number, 4);

        let err = parse_problem_str("1000000000000000000\nabc\nA\n").unwrap_err();
        assert_eq!(err.line_number, 4);
        assert!(err.message.contains("expected 1000000000000000000 template lines"));

        let max = format!("{}\nabc\nA\nA:a\n", usize::MAX);
        assert!(parse_problem_str(&max).is_err());
    }

    #[test]
    fn test_parse_invalid_target() {
        let err = parse_problem_str("0\ncatDog\n").unwrap_err();
        assert_eq!(err.line_number, 2);
        assert_eq!(err.column, Some(4));

        let err = parse_problem_str("0\n").unwrap_err();
        assert_eq!(err.line_number, 2);
    }

    #[test]
    fn test_parse_missing_template_lines() {
        let err = parse_problem_str("3\ncatdog\nAdog\n").unwrap_err();
        assert_eq!(err.line_number, 4);
        assert!(err.message.contains("expected 3 template lines"));
    }

    #[test]
    fn test_parse_invalid_template() {
        let err = parse_problem_str("1\ncatdog\nA-dog\nA:cat\n").unwrap_err();
        assert_eq!(err.line_number, 3);
        assert_eq!(err.column, Some(2));
    }

    #[test]
    fn test_parse_invalid_candidate_lines() {
        let cases = [
            "1\ncatdog\nAdog\na:cat\n",
            "1\ncatdog\nAdog\nA=cat\n",
            "1\ncatdog\nAdog\nA:\n",
            "1\ncatdog\nAdog\nA:cat,\n",
            "1\ncatdog\nAdog\nA:cat,,dog\n",
            "1\ncatdog\nAdog\nA:Cat\n",
            "1\ncatdog\nAdog\nA: cat\n",
            "1\ncatdog\nAdog\n\nA:cat\n",
        ];
        for case in cases {
            let err = parse_problem_str(case);
            assert!(err.is_err(), "should reject {:?}", case);
        }
    }

    #[test]
    fn test_parse_candidate_error_column() {
        let err = parse_problem_str("1\ncatdog\nAdog\nA:cat,dOg\n").unwrap_err();
        assert_eq!(err.line_number, 4);
        assert_eq!(err.column, Some(8));
    }

    #[test]
    fn test_parse_duplicate_symbol_line() {
        let err = parse_problem_str("1\ncatdog\nAdog\nA:cat\nA:dog\n").unwrap_err();
        assert_eq!(err.line_number, 5);
        assert!(err.message.contains("duplicate"));
    }

    #[test]
    fn test_parse_missing_candidate_line() {
        let err = parse_problem_str("2\ncatdog\nAdog\nBcat\nA:cat\n").unwrap_err();
        assert_eq!(err.line_number, 4);
        assert!(err.message.contains("symbol B"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(4, "bad thing", "A:cat").with_column(3);
        let text = err.to_string();
        assert!(text.starts_with("line 4, column 3: bad thing"));
        assert!(text.ends_with("  ^"));

        let err = ParseError::new(2, "missing", "");
        assert_eq!(err.to_string(), "line 2: missing\n  | ");
    }

    #[test]
    fn test_parse_problem_file_missing() {
        let err = parse_problem_file(Path::new("/nonexistent/problem.SWE")).unwrap_err();
        assert_eq!(err.line_number, 0);
        assert!(err.message.contains("failed to read file"));
    }
}
