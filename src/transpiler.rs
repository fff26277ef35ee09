//! Token stream → parameterized SQL.
//!
//! Walks the tokens once, left to right. Structural tokens contribute their
//! literal, columns are double-quoted, placeholders become `$1, $2, …` and
//! their values are collected in the same order.

use crate::token::Token;
use crate::value::Value;

/// Placeholder numbering for a single compile call.
#[derive(Debug, Default)]
struct ParamContext {
    /// Current parameter index (1-based for Postgres $1, $2, etc.)
    index: usize,
    params: Vec<Value>,
}

impl ParamContext {
    /// Add a value and return the placeholder for it.
    fn add_param(&mut self, value: Value) -> String {
        self.index += 1;
        self.params.push(value);
        format!("${}", self.index)
    }
}

/// Compiled SQL fragment and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TranspileResult {
    pub sql: String,
    pub params: Vec<Value>,
}

impl TranspileResult {
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Render a token stream.
///
/// Every token is written followed by one space and the final space is
/// trimmed. A `Table` token must be followed by `Dot` and `Column`; only
/// the expression and sort lowerings produce tokens, and they uphold that.
pub(crate) fn transpile(tokens: &[Token]) -> TranspileResult {
    let mut ctx = ParamContext::default();
    let mut sql = String::new();

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Column(name) => {
                sql.push_str(&quote_identifier(name));
                sql.push(' ');
            }
            Token::Placeholder(value) => {
                sql.push_str(&ctx.add_param(value.clone()));
                sql.push(' ');
            }
            Token::Table(table) => {
                debug_assert!(
                    matches!(tokens.get(i + 1), Some(Token::Dot))
                        && matches!(tokens.get(i + 2), Some(Token::Column(_))),
                    "table token '{}' not followed by a dot and a column",
                    table
                );
                sql.push_str(&quote_identifier(table));
                sql.push('.');
                // the dot is already written
                if matches!(tokens.get(i + 1), Some(Token::Dot)) {
                    i += 1;
                }
            }
            structural => {
                sql.push_str(structural.literal().unwrap_or_default());
                sql.push(' ');
            }
        }
        i += 1;
    }

    if sql.ends_with(' ') {
        sql.pop();
    }

    TranspileResult {
        sql,
        params: ctx.params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_stream() {
        let result = transpile(&[]);
        assert_eq!(result.sql, "");
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_single_comparison() {
        let result = transpile(&[
            Token::Column("a".into()),
            Token::Eq,
            Token::Placeholder(Value::from("test")),
        ]);
        assert_eq!(result.sql, r#""a" = $1"#);
        assert_eq!(result.params, vec![Value::from("test")]);
    }

    #[test]
    fn test_table_dot_column() {
        let result = transpile(&[
            Token::Table("rg".into()),
            Token::Dot,
            Token::Column("name".into()),
            Token::Neq,
            Token::Placeholder(Value::Int(1)),
        ]);
        assert_eq!(result.sql, r#""rg"."name" != $1"#);
    }

    #[test]
    fn test_order_by_is_one_literal() {
        let result = transpile(&[
            Token::OrderBy,
            Token::Column("b".into()),
            Token::Ascending,
        ]);
        assert_eq!(result.sql, r#"ORDER BY "b" ASC"#);
    }

    #[test]
    fn test_every_structural_token_is_followed_by_a_space() {
        let result = transpile(&[Token::Where, Token::LeftParen, Token::Comma, Token::RightParen]);
        assert_eq!(result.sql, "WHERE ( , )");
    }

    #[test]
    fn test_identifiers_are_not_escaped() {
        let result = transpile(&[Token::Column("we\"ird".into())]);
        assert_eq!(result.sql, "\"we\"ird\"");
    }

    #[test]
    fn test_numbering_restarts_per_call() {
        let tokens = [
            Token::Column("a".into()),
            Token::Eq,
            Token::Placeholder(Value::Int(1)),
        ];
        assert_eq!(transpile(&tokens), transpile(&tokens));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not followed by a dot and a column")]
    fn test_dangling_table_panics() {
        transpile(&[Token::Table("rg".into()), Token::Eq]);
    }
}
