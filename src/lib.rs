//! # boiling — parameterized WHERE / ORDER BY compiler
//!
//! Build filters from typed combinators, compile them to a SQL fragment with
//! positional `$n` placeholders, and hand the text and parameters to the
//! database layer. Values never end up inside the SQL text.
//!
//! ## Quick Example
//!
//! ```
//! use boiling::prelude::*;
//!
//! let mut query = Query::new(and(
//!     eq("a", "test"),
//!     or(eq("b", 3), neq("c", true)),
//! ));
//! query.set_sorter(sort_descending("b"));
//!
//! let (sql, params) = query.build();
//! assert_eq!(
//!     sql,
//!     r#"( "a" = $1 AND ( "b" = $2 OR "c" != $3 ) ) ORDER BY "b" DESC"#
//! );
//! assert_eq!(params, vec![Value::from("test"), Value::Int(3), Value::Bool(true)]);
//! ```
//!
//! ## Output format
//!
//! | Node            | Renders as                    |
//! |-----------------|-------------------------------|
//! | `eq(c, v)`      | `"c" = $n`                    |
//! | `neq(c, v)`     | `"c" != $n`                   |
//! | `and(l, r)`     | `( l AND r )`                 |
//! | `or(l, r)`      | `( l OR r )`                  |
//! | sorter          | `ORDER BY "c" ASC` / `DESC`   |
//!
//! Column names are double-quoted but not escaped; see [`column`].

pub mod column;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod parser;
pub mod query;
pub mod schema;
pub mod sort;
pub mod token;
pub mod transpiler;
pub mod value;

pub mod prelude {
    pub use crate::column::{Column, ColumnSelector, ColumnType};
    pub use crate::config::Config;
    pub use crate::engine::Database;
    pub use crate::error::*;
    pub use crate::expr::{and, compare, eq, gt, gte, lt, lte, neq, or, Boolean, Comparator, Conjunction};
    pub use crate::parser::{parse_filter, parse_release_group_filter};
    pub use crate::query::Query;
    pub use crate::schema::{search_release_groups_sql, ReleaseGroup, ReleaseGroupColumn};
    pub use crate::sort::{sort_ascending, sort_descending, SortOrder, Sorter};
    pub use crate::token::Token;
    pub use crate::value::Value;
}

/// Parse a release-group filter into a [`query::Query`].
///
/// # Example
///
/// ```
/// let query = boiling::parse("name = 'Kid A' & type != 2").unwrap();
/// assert_eq!(query.build().0, r#"( "name" = $1 AND "type" != $2 )"#);
/// ```
pub fn parse(input: &str) -> Result<query::Query, error::BoilingError> {
    parser::parse_release_group_filter(input).map(query::Query::new)
}
