//! Field values, ordering and filter queries for in-memory payment records.
//!
//! Console pages keep their data in plain vectors and filter them locally
//! before handing the result to a table. This crate gives them a common
//! vocabulary:
//!
//! - [`Value`]: what an accessor returns for one field of one row
//! - [`compare_values`] and [`sort_stable`]: the ordering used by table sorting
//! - [`Query`]: AND / OR / NOT clause groups, orderings and paging
//! - [`Seekable`]: field access by name for row types
//!
//! # Query Semantics
//!
//! ```text
//! match = (all AND clauses match)
//!       ∧ (at least one OR clause matches, OR no OR clauses exist)
//!       ∧ (no NOT clause matches)
//! ```
//!
//! # Operators
//!
//! | Kind | Operators |
//! |------|-----------|
//! | Text | `Eq`, `Ne`, `StartsWith`, `EndsWith`, `Contains`, `ContainsFold`, `Regex`, `In` |
//! | Number | `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Timestamp | the number operators plus `Before`, `After` |
//! | Enum | `Eq`, `Ne`, `In` |
//! | Bool | `Eq`, `Ne` |

mod clause;
mod error;
mod op;
mod ordering;
mod query;
mod traits;
mod value;

pub use clause::{Clause, ClauseValue};
pub use error::{Result, SeekerError};
pub use op::Op;
pub use ordering::{compare_by_orderings, compare_values, sort_stable, Dir, OrderBy};
pub use query::Query;
pub use traits::Seekable;
pub use value::{Number, Timestamp, Value};
