//! Single-column ORDER BY directives.

use crate::column::{ColumnRef, ColumnSelector};
use crate::token::Token;

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// `ORDER BY <column> <ASC|DESC>`
#[derive(Debug, Clone, PartialEq)]
pub struct Sorter {
    column: ColumnRef,
    order: SortOrder,
}

impl Sorter {
    pub fn new(column: impl ColumnSelector, order: SortOrder) -> Self {
        Self {
            column: ColumnRef::from_selector(&column),
            order,
        }
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    pub fn tokens(&self) -> Vec<Token> {
        let mut out = Vec::with_capacity(3);
        self.lower_into(&mut out);
        out
    }

    pub(crate) fn lower_into(&self, out: &mut Vec<Token>) {
        out.push(Token::OrderBy);
        self.column.lower_into(out);
        out.push(match self.order {
            SortOrder::Asc => Token::Ascending,
            SortOrder::Desc => Token::Descending,
        });
    }
}

pub fn sort_ascending(column: impl ColumnSelector) -> Sorter {
    Sorter::new(column, SortOrder::Asc)
}

pub fn sort_descending(column: impl ColumnSelector) -> Sorter {
    Sorter::new(column, SortOrder::Desc)
}
