//! Column selectors.
//!
//! Identifiers are double-quoted when rendered but never escaped or
//! validated. Only pass names from a closed, trusted set: `&'static str`
//! constants, [`Column`] values built from them, or a registry enum such as
//! [`crate::schema::ReleaseGroupColumn`]. Never build a selector from user
//! input.

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// SQL type of a column, used to type literals parsed from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
    Timestamp,
}

impl ColumnType {
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "double precision",
            ColumnType::Bool => "boolean",
            ColumnType::Text => "text",
            ColumnType::Timestamp => "timestamptz",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_name())
    }
}

/// Anything that can name a column.
pub trait ColumnSelector {
    /// The unquoted column name.
    fn column(&self) -> &str;

    /// Table qualifier, if the column should render as `"table"."column"`.
    fn table(&self) -> Option<&str> {
        None
    }

    /// Declared type, when known. Text literals compared against a typed
    /// column are converted to it.
    fn column_type(&self) -> Option<ColumnType> {
        None
    }
}

impl ColumnSelector for str {
    fn column(&self) -> &str {
        self
    }
}

impl<C: ColumnSelector + ?Sized> ColumnSelector for &C {
    fn column(&self) -> &str {
        (**self).column()
    }

    fn table(&self) -> Option<&str> {
        (**self).table()
    }

    fn column_type(&self) -> Option<ColumnType> {
        (**self).column_type()
    }
}

/// A column name, optionally qualified by its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    table: Option<&'static str>,
    name: &'static str,
}

impl Column {
    pub const fn new(name: &'static str) -> Self {
        Self { table: None, name }
    }

    pub const fn qualified(table: &'static str, name: &'static str) -> Self {
        Self {
            table: Some(table),
            name,
        }
    }
}

impl ColumnSelector for Column {
    fn column(&self) -> &str {
        self.name
    }

    fn table(&self) -> Option<&str> {
        self.table
    }
}

/// Resolved column reference stored inside expression trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    table: Option<String>,
    name: String,
}

impl ColumnRef {
    /// Empty reference used when tearing down expression trees.
    pub(crate) fn detached() -> Self {
        Self {
            table: None,
            name: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub(crate) fn from_selector(selector: &impl ColumnSelector) -> Self {
        Self {
            table: selector.table().map(str::to_string),
            name: selector.column().to_string(),
        }
    }

    pub(crate) fn lower_into(&self, out: &mut Vec<Token>) {
        if let Some(table) = &self.table {
            out.push(Token::Table(table.clone()));
            out.push(Token::Dot);
        }
        out.push(Token::Column(self.name.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_column_lowers_to_one_token() {
        let mut out = Vec::new();
        ColumnRef::from_selector(&"a").lower_into(&mut out);
        assert_eq!(out, vec![Token::Column("a".into())]);
    }

    #[test]
    fn test_qualified_column_lowers_to_triple() {
        const RG_NAME: Column = Column::qualified("rg", "name");
        let mut out = Vec::new();
        ColumnRef::from_selector(&RG_NAME).lower_into(&mut out);
        assert_eq!(
            out,
            vec![
                Token::Table("rg".into()),
                Token::Dot,
                Token::Column("name".into())
            ]
        );
    }
}
