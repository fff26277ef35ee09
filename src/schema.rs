//! Column registry and search SQL for the `release_groups` table.
//!
//! Filters built from text (the CLI, search forms) must resolve their column
//! names through [`ReleaseGroupColumn`], which keeps every identifier that
//! reaches the compiler inside a closed, trusted set.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::column::{ColumnSelector, ColumnType};
use crate::error::{BoilingError, BoilingResult};
use crate::query::Query;
use crate::value::Value;

pub const RELEASE_GROUPS_TABLE: &str = "release_groups";

/// Searchable columns of `release_groups`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseGroupColumn {
    Id,
    Name,
    Type,
    ReleaseDate,
}

impl ReleaseGroupColumn {
    pub const ALL: [ReleaseGroupColumn; 4] = [
        ReleaseGroupColumn::Id,
        ReleaseGroupColumn::Name,
        ReleaseGroupColumn::Type,
        ReleaseGroupColumn::ReleaseDate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReleaseGroupColumn::Id => "id",
            ReleaseGroupColumn::Name => "name",
            ReleaseGroupColumn::Type => "type",
            ReleaseGroupColumn::ReleaseDate => "release_date",
        }
    }

    pub fn column_type(self) -> ColumnType {
        match self {
            ReleaseGroupColumn::Id | ReleaseGroupColumn::Type => ColumnType::Integer,
            ReleaseGroupColumn::Name => ColumnType::Text,
            ReleaseGroupColumn::ReleaseDate => ColumnType::Timestamp,
        }
    }

    /// SQL type, for `boiling columns`.
    pub fn sql_type(self) -> &'static str {
        self.column_type().sql_name()
    }
}

impl ColumnSelector for ReleaseGroupColumn {
    fn column(&self) -> &str {
        self.name()
    }

    fn column_type(&self) -> Option<ColumnType> {
        Some(ReleaseGroupColumn::column_type(*self))
    }
}

impl FromStr for ReleaseGroupColumn {
    type Err = BoilingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| BoilingError::UnknownColumn(s.to_string()))
    }
}

impl std::fmt::Display for ReleaseGroupColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A row of `release_groups`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReleaseGroup {
    pub id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub release_type: i32,
    pub release_date: DateTime<Utc>,
}

/// Wrap a compiled query into a paginated `release_groups` SELECT.
///
/// `LIMIT` and `OFFSET` take the two placeholders after the filter's own,
/// and their values are appended to the parameters in that order.
pub fn search_release_groups_sql(
    query: &Query,
    offset: i64,
    limit: i64,
) -> BoilingResult<(String, Vec<Value>)> {
    if offset < 0 {
        return Err(BoilingError::InvalidValue(format!(
            "offset must not be negative, got {}",
            offset
        )));
    }
    if limit < 0 {
        return Err(BoilingError::InvalidValue(format!(
            "limit must not be negative, got {}",
            limit
        )));
    }

    let (filter, mut params) = query.build();
    let columns: Vec<String> = ReleaseGroupColumn::ALL
        .iter()
        .map(|c| format!("\"{}\"", c.name()))
        .collect();

    let sql = format!(
        "SELECT {} FROM \"{}\" WHERE {} LIMIT ${} OFFSET ${}",
        columns.join(", "),
        RELEASE_GROUPS_TABLE,
        filter,
        params.len() + 1,
        params.len() + 2
    );
    params.push(Value::Int(limit));
    params.push(Value::Int(offset));

    Ok((sql, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{and, eq, neq};
    use crate::sort::sort_descending;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_names_round_trip() {
        for column in ReleaseGroupColumn::ALL {
            assert_eq!(column.name().parse::<ReleaseGroupColumn>().unwrap(), column);
        }
    }

    #[test]
    fn test_unknown_column() {
        let err = "password".parse::<ReleaseGroupColumn>().unwrap_err();
        assert!(matches!(err, BoilingError::UnknownColumn(name) if name == "password"));
    }

    #[test]
    fn test_search_sql_numbers_pagination_after_filter() {
        let q = Query::new(and(
            eq(ReleaseGroupColumn::Name, "Kid A"),
            neq(ReleaseGroupColumn::Type, 2),
        ))
        .with_sorter(sort_descending(ReleaseGroupColumn::ReleaseDate));

        let (sql, params) = search_release_groups_sql(&q, 20, 10).unwrap();
        assert_eq!(
            sql,
            r#"SELECT "id", "name", "type", "release_date" FROM "release_groups" WHERE ( "name" = $1 AND "type" != $2 ) ORDER BY "release_date" DESC LIMIT $3 OFFSET $4"#
        );
        assert_eq!(
            params,
            vec![
                Value::from("Kid A"),
                Value::Int(2),
                Value::Int(10),
                Value::Int(20)
            ]
        );
    }

    #[test]
    fn test_search_sql_rejects_negative_pagination() {
        let q = Query::new(eq(ReleaseGroupColumn::Id, 1));
        assert!(matches!(
            search_release_groups_sql(&q, -1, 10),
            Err(BoilingError::InvalidValue(_))
        ));
        assert!(matches!(
            search_release_groups_sql(&q, 0, -5),
            Err(BoilingError::InvalidValue(_))
        ));
    }
}
