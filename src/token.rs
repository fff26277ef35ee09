//! Intermediate token stream between expression trees and SQL text.

use crate::value::Value;

/// One lexical unit of a compiled query.
///
/// Structural tokens render to a fixed literal. `Table`, `Column` and
/// `Placeholder` carry caller data and are rendered by the compiler itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,
    RightParen,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Comma,
    Dot,
    And,
    Or,
    Where,
    OrderBy,
    Ascending,
    Descending,
    /// Table name; must be followed by `Dot` and `Column`.
    Table(String),
    Column(String),
    Placeholder(Value),
}

impl Token {
    /// Fixed SQL text of a structural token, `None` for carriers.
    pub fn literal(&self) -> Option<&'static str> {
        let s = match self {
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Eq => "=",
            Token::Neq => "!=",
            Token::Lt => "<",
            Token::Lte => "<=",
            Token::Gt => ">",
            Token::Gte => ">=",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::And => "AND",
            Token::Or => "OR",
            Token::Where => "WHERE",
            Token::OrderBy => "ORDER BY",
            Token::Ascending => "ASC",
            Token::Descending => "DESC",
            Token::Table(_) | Token::Column(_) | Token::Placeholder(_) => return None,
        };
        Some(s)
    }

    /// True for `Table`, `Column` and `Placeholder`.
    pub fn is_carrier(&self) -> bool {
        self.literal().is_none()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Table(name) => write!(f, "Table({})", name),
            Token::Column(name) => write!(f, "Column({})", name),
            Token::Placeholder(v) => write!(f, "Placeholder({})", v),
            structural => write!(f, "{}", structural.literal().unwrap_or_default()),
        }
    }
}
