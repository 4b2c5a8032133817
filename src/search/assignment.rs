//! Symbol assignments explored by the search

use std::collections::BTreeMap;

use crate::model::Symbol;
use crate::search::candidate::CandidateStore;
use crate::search::result::{Solution, SolutionValue};

/// Current value of one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Not yet chosen; matches one or more lowercase letters
    Wildcard,
    /// A chosen candidate
    Concrete(String),
    /// Symbol takes part in no template
    Unused,
}

/// Mapping from every known symbol to its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<Symbol, Value>,
}

impl Assignment {
    /// Initial assignment: participating symbols unassigned, the rest unused
    pub fn new(store: &CandidateStore) -> Self {
        let values = store
            .iter()
            .map(|(sym, list)| {
                let value = if list.is_unused() {
                    Value::Unused
                } else {
                    Value::Wildcard
                };
                (sym, value)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, sym: Symbol) -> Option<&Value> {
        self.values.get(&sym)
    }

    /// Give `sym` a concrete value. Unused symbols are left untouched.
    pub fn set(&mut self, sym: Symbol, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(&sym)
            && *slot != Value::Unused
        {
            *slot = Value::Concrete(value.into());
        }
    }

    /// Undo an assignment, returning `sym` to the wildcard state
    pub fn clear(&mut self, sym: Symbol) {
        if let Some(slot) = self.values.get_mut(&sym)
            && *slot != Value::Unused
        {
            *slot = Value::Wildcard;
        }
    }

    /// First unassigned participating symbol in canonical order
    pub fn next_unassigned(&self) -> Option<Symbol> {
        self.values
            .iter()
            .find(|(_, value)| **value == Value::Wildcard)
            .map(|(&sym, _)| sym)
    }

    pub fn is_complete(&self) -> bool {
        self.next_unassigned().is_none()
    }

    /// Number of symbols holding a concrete value (the search depth)
    pub fn assigned_count(&self) -> usize {
        self.values
            .values()
            .filter(|value| matches!(value, Value::Concrete(_)))
            .count()
    }

    /// Snapshot as a solution; `None` while any symbol is still unassigned
    pub fn to_solution(&self) -> Option<Solution> {
        let mut values = BTreeMap::new();
        for (&sym, value) in &self.values {
            let entry = match value {
                Value::Wildcard => return None,
                Value::Concrete(text) => SolutionValue::Value(text.clone()),
                Value::Unused => SolutionValue::Unused,
            };
            values.insert(sym, entry);
        }
        Some(Solution::new(values))
    }
}
