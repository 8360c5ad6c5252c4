//! Table state: sorting, filters, pinning, visibility and sizing.
//!
//! Sort and filter state are either owned by the table or by the caller,
//! never a mix. See [`Ownership`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use paygrid_seeker::{Dir, OrderBy};
use serde::{Deserialize, Serialize};

use crate::column::{MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};

/// Ordered sort keys. Header interaction only ever produces one key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState(Vec<OrderBy>);

impl SortState {
    pub fn new(keys: Vec<OrderBy>) -> Self {
        SortState(keys)
    }

    pub fn single(id: impl Into<String>, dir: Dir) -> Self {
        SortState(vec![OrderBy::new(id, dir)])
    }

    pub fn keys(&self) -> &[OrderBy] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Direction of the column, if it is a sort key.
    pub fn direction_of(&self, id: &str) -> Option<Dir> {
        self.0.iter().find(|k| k.field == id).map(|k| k.dir)
    }

    /// The state after a header click on `id`.
    ///
    /// ```text
    /// other/none -> asc -> desc -> none   (removal)
    /// other/none -> asc -> desc -> asc    (no removal)
    /// ```
    pub fn toggled(&self, id: &str, removal: bool) -> SortState {
        match self.direction_of(id) {
            None => SortState::single(id, Dir::Asc),
            Some(Dir::Asc) => SortState::single(id, Dir::Desc),
            Some(Dir::Desc) if removal => SortState::default(),
            Some(Dir::Desc) => SortState::single(id, Dir::Asc),
        }
    }
}

/// Column id to opaque filter value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, serde_json::Value>);

impl FilterState {
    pub fn new() -> Self {
        FilterState::default()
    }

    pub fn get(&self, id: &str) -> Option<&serde_json::Value> {
        self.0.get(id)
    }

    /// Sets a column filter. `Null` clears it.
    pub fn set(&mut self, id: impl Into<String>, value: serde_json::Value) {
        let id = id.into();
        if value.is_null() {
            self.0.remove(&id);
        } else {
            self.0.insert(id, value);
        }
    }

    pub fn with(mut self, id: impl Into<String>, value: serde_json::Value) -> Self {
        self.set(id, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Side a column is pinned to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinSide {
    #[default]
    None,
    Left,
    Right,
}

/// Ordered pin lists. A column id appears in at most one list, once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPinning {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl ColumnPinning {
    pub fn pin(&mut self, id: &str, side: PinSide) {
        self.left.retain(|c| c != id);
        self.right.retain(|c| c != id);
        match side {
            PinSide::Left => self.left.push(id.to_string()),
            PinSide::Right => self.right.push(id.to_string()),
            PinSide::None => {}
        }
    }

    pub fn side_of(&self, id: &str) -> PinSide {
        if self.left.iter().any(|c| c == id) {
            PinSide::Left
        } else if self.right.iter().any(|c| c == id) {
            PinSide::Right
        } else {
            PinSide::None
        }
    }
}

/// Per-column presentation: visibility and width overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSettings {
    pub visibility: HashMap<String, bool>,
    pub sizing: HashMap<String, u32>,
    pub pinning: ColumnPinning,
}

impl ColumnSettings {
    /// Columns are visible unless explicitly hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        self.visibility.get(id).copied().unwrap_or(true)
    }

    pub fn resize(&mut self, id: &str, px: u32) -> u32 {
        let px = px.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        self.sizing.insert(id.to_string(), px);
        px
    }
}

type SortCallback = Box<dyn FnMut(&SortState)>;
type FilterCallback = Box<dyn FnMut(&FilterState)>;

/// Who owns sort and filter state, fixed at construction.
pub enum Ownership {
    /// The table keeps the state and sorts/filters rows itself.
    Internal,
    /// The caller keeps the state. Interactions only report the proposed
    /// next state; rows are shown in the order given.
    Controlled {
        sorting: SortState,
        filters: FilterState,
        on_sorting_change: SortCallback,
        on_filters_change: FilterCallback,
    },
}

impl Ownership {
    pub fn controlled<S, F>(
        sorting: SortState,
        filters: FilterState,
        on_sorting_change: S,
        on_filters_change: F,
    ) -> Self
    where
        S: FnMut(&SortState) + 'static,
        F: FnMut(&FilterState) + 'static,
    {
        Ownership::Controlled {
            sorting,
            filters,
            on_sorting_change: Box::new(on_sorting_change),
            on_filters_change: Box::new(on_filters_change),
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Ownership::Controlled { .. })
    }
}

impl fmt::Debug for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Internal => f.write_str("Internal"),
            Ownership::Controlled {
                sorting, filters, ..
            } => f
                .debug_struct("Controlled")
                .field("sorting", sorting)
                .field("filters", filters)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toggle_cycles_with_removal() {
        let s = SortState::default();
        let s = s.toggled("amount", true);
        assert_eq!(s.direction_of("amount"), Some(Dir::Asc));
        let s = s.toggled("amount", true);
        assert_eq!(s.direction_of("amount"), Some(Dir::Desc));
        let s = s.toggled("amount", true);
        assert!(s.is_empty());
    }

    #[test]
    fn toggle_without_removal_flips() {
        let s = SortState::single("amount", Dir::Desc).toggled("amount", false);
        assert_eq!(s.direction_of("amount"), Some(Dir::Asc));
    }

    #[test]
    fn toggle_other_column_replaces_key() {
        let s = SortState::single("amount", Dir::Desc).toggled("date", true);
        assert_eq!(s.keys(), &[OrderBy::asc("date")]);
    }

    #[test]
    fn null_filter_clears() {
        let mut f = FilterState::new().with("status", json!("approved"));
        assert_eq!(f.get("status"), Some(&json!("approved")));
        f.set("status", serde_json::Value::Null);
        assert!(f.is_empty());
    }

    #[test]
    fn pinning_moves_between_sides() {
        let mut p = ColumnPinning::default();
        p.pin("id", PinSide::Left);
        p.pin("id", PinSide::Right);
        assert!(p.left.is_empty());
        assert_eq!(p.right, ["id"]);
        p.pin("id", PinSide::Right);
        assert_eq!(p.right, ["id"]);
        p.pin("id", PinSide::None);
        assert_eq!(p.side_of("id"), PinSide::None);
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let mut s = ColumnSettings::default();
        assert_eq!(s.resize("id", 3), MIN_COLUMN_WIDTH);
        assert_eq!(s.sizing["id"], MIN_COLUMN_WIDTH);
    }

    #[test]
    fn sort_state_serializes_as_list() {
        let s = SortState::single("date", Dir::Desc);
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            json!([{"field": "date", "dir": "desc"}])
        );
    }
}
