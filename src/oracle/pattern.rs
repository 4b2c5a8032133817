//! Substituted patterns: literal runs separated by wildcard runs
//!
//! A wildcard run stands for one or more lowercase letters. Adjacent wildcard
//! runs collapse into one run and adjacent literals concatenate, so a pattern
//! always alternates between the two segment kinds.

use std::fmt;
use std::str::FromStr;

use crate::model::{Template, TemplatePart};
use crate::search::assignment::{Assignment, Value};

/// Character used for a wildcard run in pattern keys
pub const WILDCARD_MARKER: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Wildcard,
}

/// A template after substitution, ready to be matched against a target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitute `assignment` into `template`.
    ///
    /// Concrete values become literal text; unassigned symbols become
    /// wildcard runs.
    pub fn substitute(template: &Template, assignment: &Assignment) -> Self {
        let mut pattern = Pattern::new();
        for part in template.parts() {
            match part {
                TemplatePart::Literal(text) => pattern.push_literal(text),
                TemplatePart::Symbol(sym) => match assignment.get(*sym) {
                    Some(Value::Concrete(text)) => pattern.push_literal(text),
                    // Unused symbols never occur in templates
                    _ => pattern.push_wildcard(),
                },
            }
        }
        pattern
    }

    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Literal(text.to_string()));
        }
    }

    pub fn push_wildcard(&mut self) {
        if !matches!(self.segments.last(), Some(Segment::Wildcard)) {
            self.segments.push(Segment::Wildcard);
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Canonical text of the pattern, used as the memoization key
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Does the pattern occur as a substring of `target`?
    ///
    /// `target` must consist of lowercase ASCII letters. Each literal is placed
    /// at its earliest possible position; a pending wildcard run forces at
    /// least one letter between the previous literal and the next one.
    pub fn matches(&self, target: &str) -> bool {
        let mut pos = 0;
        let mut gap = false;

        for segment in &self.segments {
            match segment {
                Segment::Wildcard => gap = true,
                Segment::Literal(text) => {
                    let from = pos + usize::from(gap);
                    let Some(rest) = target.get(from..) else {
                        return false;
                    };

                    // Adjacent literals are merged, so any literal after the
                    // first follows a wildcard run and may start anywhere
                    let Some(offset) = rest.find(text.as_str()) else {
                        return false;
                    };

                    pos = from + offset + text.len();
                    gap = false;
                }
            }
        }

        !gap || pos < target.len()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "{}", text)?,
                Segment::Wildcard => write!(f, "{}", WILDCARD_MARKER)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = String;

    /// Parse a pattern key such as `*xy*`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pattern = Pattern::new();
        for c in s.chars() {
            if c == WILDCARD_MARKER {
                pattern.push_wildcard();
            } else if c.is_ascii_lowercase() {
                let mut buf = [0u8; 4];
                pattern.push_literal(c.encode_utf8(&mut buf));
            } else {
                return Err(format!("invalid pattern character '{}'", c));
            }
        }
        Ok(pattern)
    }
}
