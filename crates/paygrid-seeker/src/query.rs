//! Query builder and executor.

use regex::Regex;

use crate::clause::{Clause, ClauseValue};
use crate::error::{Result, SeekerError};
use crate::op::Op;
use crate::ordering::{sort_stable, Dir, OrderBy};
use crate::value::{Timestamp, Value};

/// A filter over an in-memory collection.
///
/// ```text
/// match = (every AND clause matches)
///       ∧ (some OR clause matches, or there are none)
///       ∧ (no NOT clause matches)
/// ```
///
/// Matching rows are stably sorted by the orderings, then `offset` and
/// `limit` are applied.
///
/// # Example
///
/// ```
/// use paygrid_seeker::{Query, Value, Number};
///
/// struct Txn { id: String, status: String, amount: i64 }
///
/// fn accessor<'a>(t: &'a Txn, field: &str) -> Value<'a> {
///     match field {
///         "id" => Value::text(&t.id),
///         "status" => Value::text(&t.status),
///         "amount" => Value::Number(Number::I64(t.amount)),
///         _ => Value::None,
///     }
/// }
///
/// let txns = vec![
///     Txn { id: "TXN-1".into(), status: "approved".into(), amount: 125_000 },
///     Txn { id: "TXN-2".into(), status: "failed".into(), amount: 55_000 },
///     Txn { id: "TXN-3".into(), status: "approved".into(), amount: 89_000 },
/// ];
///
/// let approved = Query::new()
///     .and_eq("status", "approved")
///     .and_gte("amount", 80_000i64)
///     .order_desc("amount")
///     .filter(&txns, accessor);
/// assert_eq!(approved.len(), 2);
/// assert_eq!(approved[0].id, "TXN-1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    and_clauses: Vec<Clause>,
    or_clauses: Vec<Clause>,
    not_clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    offset: usize,
    limit: Option<usize>,
}

impl Query {
    /// An empty query matches every row.
    pub fn new() -> Self {
        Query::default()
    }

    pub fn and(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and_clauses.push(Clause::new(field, op, value));
        self
    }

    pub fn or(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.or_clauses.push(Clause::new(field, op, value));
        self
    }

    pub fn not(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not_clauses.push(Clause::new(field, op, value));
        self
    }

    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Eq, value)
    }

    pub fn and_ne(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Ne, value)
    }

    pub fn and_gte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gte, value)
    }

    pub fn and_lte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lte, value)
    }

    pub fn and_contains(self, field: &str, value: &str) -> Self {
        self.and(field, Op::Contains, value)
    }

    /// Case-insensitive substring match.
    pub fn and_contains_fold(self, field: &str, value: &str) -> Self {
        self.and(field, Op::ContainsFold, value)
    }

    pub fn and_in<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = values.into_iter().map(Into::into).collect();
        self.and(field, Op::In, ClauseValue::TextSet(set))
    }

    /// Inclusive timestamp window.
    pub fn and_between(self, field: &str, start: Timestamp, end: Timestamp) -> Self {
        self.and(field, Op::Gte, start).and(field, Op::Lte, end)
    }

    pub fn and_regex(self, field: &str, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)?;
        Ok(self.and(field, Op::Regex, re))
    }

    /// Case-insensitive substring match in the OR group.
    ///
    /// A keyword box searching several columns adds one of these per column.
    pub fn or_contains_fold(self, field: &str, value: &str) -> Self {
        self.or(field, Op::ContainsFold, value)
    }

    pub fn or_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.or(field, Op::Eq, value)
    }

    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Eq, value)
    }

    pub fn order_by(mut self, field: &str, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    pub fn offset(mut self, n: usize) -> Self {
        self.offset = n;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Restricts results to one zero-based page.
    pub fn page(self, index: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SeekerError::InvalidPageSize);
        }
        Ok(self.offset(index.saturating_mul(size)).limit(size))
    }

    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.and_clauses
            .iter()
            .chain(&self.or_clauses)
            .chain(&self.not_clauses)
    }

    /// True when the query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.and_clauses.is_empty() && self.or_clauses.is_empty() && self.not_clauses.is_empty()
    }

    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let hit = |c: &Clause| c.matches(&accessor(item, &c.field));
        self.and_clauses.iter().all(hit)
            && (self.or_clauses.is_empty() || self.or_clauses.iter().any(hit))
            && !self.not_clauses.iter().any(hit)
    }

    /// Matching rows, sorted and windowed.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let mut rows: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect();
        sort_stable(&mut rows, &self.orderings, &accessor);
        rows.into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }

    pub fn filter_cloned<T, F>(&self, items: &[T], accessor: F) -> Vec<T>
    where
        T: Clone,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.filter(items, accessor).into_iter().cloned().collect()
    }

    /// Number of matching rows, ignoring offset and limit.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }

    pub fn any<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().any(|item| self.matches(item, &accessor))
    }

    /// True when every row matches. Vacuously true for no rows.
    pub fn all<T, F>(&self, items: &[T], accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items.iter().all(|item| self.matches(item, &accessor))
    }

    pub fn first<'a, T, F>(&self, items: &'a [T], accessor: F) -> Option<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items.iter().find(|item| self.matches(*item, &accessor))
    }
}
