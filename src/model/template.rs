//! Templates: strings mixing symbols and literal lowercase letters

use std::fmt;
use std::str::FromStr;

use super::symbol::Symbol;

/// One run of a template: either literal lowercase text or a single symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplatePart {
    /// A maximal run of lowercase letters
    Literal(String),
    /// An uppercase placeholder
    Symbol(Symbol),
}

/// A parsed template such as `AxyB`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    text: String,
    parts: Vec<TemplatePart>,
}

impl Template {
    /// Parse a template. It must be non-empty and contain only ASCII letters.
    pub fn parse(text: &str) -> Result<Self, String> {
        if text.is_empty() {
            return Err("empty template".to_string());
        }

        let mut parts = Vec::new();
        let mut literal = String::new();

        for c in text.chars() {
            if c.is_ascii_lowercase() {
                literal.push(c);
            } else if let Some(sym) = Symbol::new(c) {
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(TemplatePart::Symbol(sym));
            } else {
                return Err(format!("invalid character '{}' in template '{}'", c, text));
            }
        }

        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }

        Ok(Self {
            text: text.to_string(),
            parts,
        })
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Symbols referenced by this template, in order of occurrence (may repeat)
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Symbol(sym) => Some(*sym),
            TemplatePart::Literal(_) => None,
        })
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::new(c).unwrap()
    }

    #[test]
    fn test_parse_mixed_template() {
        let t = Template::parse("AxyB").unwrap();
        assert_eq!(
            t.parts(),
            &[
                TemplatePart::Symbol(sym('A')),
                TemplatePart::Literal("xy".to_string()),
                TemplatePart::Symbol(sym('B')),
            ]
        );
        assert_eq!(t.as_str(), "AxyB");
    }

    #[test]
    fn test_parse_adjacent_symbols() {
        let t = Template::parse("abAB").unwrap();
        assert_eq!(t.parts().len(), 3);
        assert_eq!(t.symbols().collect::<Vec<_>>(), vec![sym('A'), sym('B')]);
    }

    #[test]
    fn test_parse_repeated_symbol() {
        let t = Template::parse("AaA").unwrap();
        assert_eq!(t.symbols().collect::<Vec<_>>(), vec![sym('A'), sym('A')]);
    }

    #[test]
    fn test_ground_template() {
        let t: Template = "dog".parse().unwrap();
        assert_eq!(t.symbols().count(), 0);
        assert_eq!(t.parts(), &[TemplatePart::Literal("dog".to_string())]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Template::parse("").is_err());
        assert!(Template::parse("a1").is_err());
        assert!(Template::parse("a b").is_err());
        assert!(Template::parse("A,b").is_err());
    }
}
