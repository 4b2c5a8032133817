//! Placeholder symbols (`A`-`Z`)

use std::fmt;

/// An uppercase placeholder letter inside a template.
///
/// Ordering is by code point, which is the canonical order the search visits
/// symbols in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u8);

impl Symbol {
    /// Create a symbol from an uppercase ASCII letter
    pub fn new(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Some(Symbol(c as u8))
        } else {
            None
        }
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }
}

impl TryFrom<char> for Symbol {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Symbol::new(c).ok_or_else(|| format!("not a symbol: '{}'", c))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
