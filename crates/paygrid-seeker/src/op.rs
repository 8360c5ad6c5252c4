//! Comparison operators for query clauses.

use std::cmp::Ordering;

/// Comparison operator for a [`Clause`](crate::Clause).
///
/// - **Any kind**: `Eq`, `Ne`
/// - **Text**: `StartsWith`, `EndsWith`, `Contains`, `ContainsFold`, `Regex`
/// - **Number/Timestamp**: `Gt`, `Gte`, `Lt`, `Lte`, plus `Before`/`After`
/// - **Enum**: `In`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    StartsWith,
    EndsWith,
    Contains,
    /// Case-insensitive substring match, as used by keyword search boxes.
    ContainsFold,
    Regex,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Alias for `Lt`.
    Before,
    /// Alias for `Gt`.
    After,
    In,
}

impl Op {
    /// Folds the timestamp aliases onto their canonical operators.
    pub fn normalize(self) -> Op {
        match self {
            Op::Before => Op::Lt,
            Op::After => Op::Gt,
            other => other,
        }
    }

    /// Evaluates an ordering-based operator. Text-only operators yield `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self.normalize() {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Contains => "contains",
            Op::ContainsFold => "icontains",
            Op::Regex => "regex",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Before => "before",
            Op::After => "after",
            Op::In => "in",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
