//! Single filter predicates.

use regex::Regex;

use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// A field, an operator and the value to compare against.
#[derive(Debug, Clone)]
pub struct Clause {
    pub field: String,
    pub op: Op,
    pub value: ClauseValue,
}

impl Clause {
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates the clause against one field value.
    ///
    /// Kind mismatches and absent fields never match.
    pub fn matches(&self, field: &Value<'_>) -> bool {
        match (&self.value, field) {
            (ClauseValue::Regex(re), Value::Text(s)) => re.is_match(s),
            (ClauseValue::Text(pattern), Value::Text(s)) => self.match_text(s, pattern),
            (ClauseValue::Number(want), Value::Number(got)) => got
                .compare(*want)
                .is_some_and(|o| self.op.eval_ordering(o)),
            (ClauseValue::Timestamp(want), Value::Timestamp(got)) => {
                self.op.eval_ordering(got.cmp(want))
            }
            (ClauseValue::Enum(want), Value::Enum(got)) => match self.op {
                Op::Eq => got == want,
                Op::Ne => got != want,
                _ => false,
            },
            (ClauseValue::EnumSet(set), Value::Enum(got)) => {
                self.op == Op::In && set.contains(got)
            }
            (ClauseValue::TextSet(set), Value::Text(got)) => {
                self.op == Op::In && set.iter().any(|s| s == got.as_ref())
            }
            (ClauseValue::Bool(want), Value::Bool(got)) => match self.op {
                Op::Eq => got == want,
                Op::Ne => got != want,
                _ => false,
            },
            _ => false,
        }
    }

    fn match_text(&self, field: &str, pattern: &str) -> bool {
        match self.op {
            Op::Eq => field == pattern,
            Op::Ne => field != pattern,
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            Op::ContainsFold => field.to_lowercase().contains(&pattern.to_lowercase()),
            _ => false,
        }
    }
}

/// Owned comparison value stored in a clause.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    Text(String),
    Number(Number),
    Timestamp(Timestamp),
    Enum(u32),
    EnumSet(Vec<u32>),
    TextSet(Vec<String>),
    Bool(bool),
    Regex(Regex),
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::Text(s.to_string())
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::Text(s)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(re: Regex) -> Self {
        ClauseValue::Regex(re)
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

macro_rules! clause_number_from {
    ($($t:ty),+) => {
        $(
            impl From<$t> for ClauseValue {
                fn from(n: $t) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )+
    };
}

clause_number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_ops() {
        let id = Value::text("TXN-20240103-001");
        assert!(Clause::new("id", Op::StartsWith, "TXN-").matches(&id));
        assert!(Clause::new("id", Op::EndsWith, "-001").matches(&id));
        assert!(Clause::new("id", Op::Contains, "0103").matches(&id));
        assert!(!Clause::new("id", Op::Contains, "txn").matches(&id));
        assert!(Clause::new("id", Op::ContainsFold, "txn").matches(&id));
    }

    #[test]
    fn number_range() {
        let amount = Value::Number(Number::I64(125_000));
        assert!(Clause::new("amount", Op::Gte, 100_000i64).matches(&amount));
        assert!(Clause::new("amount", Op::Lte, 125_000u32).matches(&amount));
        assert!(!Clause::new("amount", Op::Gt, 125_000.0f64).matches(&amount));
    }

    #[test]
    fn text_set_membership() {
        let status = Value::text("pending");
        let clause = Clause::new(
            "status",
            Op::In,
            ClauseValue::TextSet(vec!["approved".into(), "pending".into()]),
        );
        assert!(clause.matches(&status));
        assert!(!clause.matches(&Value::text("failed")));
    }

    #[test]
    fn absent_never_matches() {
        assert!(!Clause::new("card", Op::Ne, "x").matches(&Value::None));
        assert!(!Clause::new("card", Op::Eq, true).matches(&Value::None));
    }

    #[test]
    fn timestamps_before_after() {
        let at = Value::Timestamp(Timestamp(5_000));
        assert!(Clause::new("date", Op::After, Timestamp(1_000)).matches(&at));
        assert!(Clause::new("date", Op::Before, Timestamp(9_000)).matches(&at));
        assert!(!Clause::new("date", Op::Before, Timestamp(5_000)).matches(&at));
    }
}
