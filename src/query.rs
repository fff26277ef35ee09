//! The `Query` facade: one boolean expression plus an optional sorter.

use tracing::debug;

use crate::error::{BoilingError, BoilingResult};
use crate::expr::Boolean;
use crate::sort::Sorter;
use crate::token::Token;
use crate::transpiler::{transpile, TranspileResult};
use crate::value::Value;

/// A compilable filter with optional ordering.
///
/// Building is a pure function of the current expression and sorter; it can
/// be repeated and always numbers placeholders from `$1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    expression: Boolean,
    sorter: Option<Sorter>,
}

impl Query {
    pub fn new(expression: Boolean) -> Self {
        Self {
            expression,
            sorter: None,
        }
    }

    /// Build from a dynamically assembled expression.
    ///
    /// There is no "match everything" expression, so `None` is rejected;
    /// callers wanting an unfiltered listing must omit the WHERE clause
    /// themselves.
    pub fn try_new(expression: Option<Boolean>) -> BoilingResult<Self> {
        expression.map(Self::new).ok_or(BoilingError::MissingExpression)
    }

    /// Attach a sorter, replacing any previous one.
    pub fn set_sorter(&mut self, sorter: Sorter) {
        self.sorter = Some(sorter);
    }

    pub fn with_sorter(mut self, sorter: Sorter) -> Self {
        self.set_sorter(sorter);
        self
    }

    pub fn clear_sorter(&mut self) {
        self.sorter = None;
    }

    pub fn expression(&self) -> &Boolean {
        &self.expression
    }

    pub fn sorter(&self) -> Option<&Sorter> {
        self.sorter.as_ref()
    }

    /// Expression tokens followed by the sorter's, if any.
    pub fn tokens(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.expression.lower_into(&mut tokens);
        if let Some(sorter) = &self.sorter {
            sorter.lower_into(&mut tokens);
        }
        tokens
    }

    /// Compile to SQL text and positional parameters.
    pub fn build(&self) -> (String, Vec<Value>) {
        self.transpile().into_parts()
    }

    pub fn transpile(&self) -> TranspileResult {
        let result = transpile(&self.tokens());
        debug!(sql = %result.sql, params = result.params.len(), "compiled query");
        result
    }
}

impl From<Boolean> for Query {
    fn from(expression: Boolean) -> Self {
        Self::new(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{eq, or};
    use crate::sort::{sort_ascending, sort_descending};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_try_new_rejects_missing_expression() {
        let err = Query::try_new(None).unwrap_err();
        assert!(matches!(err, BoilingError::MissingExpression));
    }

    #[test]
    fn test_try_new_accepts_expression() {
        let q = Query::try_new(Some(eq("a", 1))).unwrap();
        assert_eq!(q.build().0, r#""a" = $1"#);
    }

    #[test]
    fn test_sorter_is_replaced() {
        let mut q = Query::new(or(eq("a", 4), eq("a", 3)));
        q.set_sorter(sort_ascending("b"));
        q.set_sorter(sort_descending("c"));
        let (sql, _) = q.build();
        assert_eq!(sql.matches("ORDER BY").count(), 1);
        assert!(sql.ends_with(r#"ORDER BY "c" DESC"#));
    }

    #[test]
    fn test_clear_sorter() {
        let mut q = Query::new(eq("a", 1)).with_sorter(sort_ascending("b"));
        q.clear_sorter();
        assert_eq!(q.build().0, r#""a" = $1"#);
        assert!(q.sorter().is_none());
    }

    #[test]
    fn test_tokens_append_sorter_last() {
        let q = Query::new(eq("a", 1)).with_sorter(sort_ascending("b"));
        let tokens = q.tokens();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[3], Token::OrderBy);
    }
}
