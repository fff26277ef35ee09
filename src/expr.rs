//! Boolean expression trees for WHERE clauses.
//!
//! Leaves compare a column against a value; `and` / `or` nodes combine two
//! subtrees and always render wrapped in parentheses, so the nesting of the
//! calls is exactly the nesting of the output.

use crate::column::{ColumnRef, ColumnSelector};
use crate::token::Token;
use crate::value::Value;

/// Comparison operator of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    fn token(self) -> Token {
        match self {
            Comparator::Eq => Token::Eq,
            Comparator::Neq => Token::Neq,
            Comparator::Lt => Token::Lt,
            Comparator::Lte => Token::Lte,
            Comparator::Gt => Token::Gt,
            Comparator::Gte => Token::Gte,
        }
    }
}

/// Logical operator joining two expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    fn token(self) -> Token {
        match self {
            Conjunction::And => Token::And,
            Conjunction::Or => Token::Or,
        }
    }
}

/// A boolean expression tree.
///
/// Folding many expressions with [`Boolean::all`] or [`Boolean::any`] yields
/// a tree as deep as it is wide, so every traversal here (lowering, counting,
/// cloning, comparing and dropping) walks an explicit stack instead of
/// recursing.
pub enum Boolean {
    Comparison {
        column: ColumnRef,
        op: Comparator,
        value: Value,
    },
    Combination {
        left: Box<Boolean>,
        right: Box<Boolean>,
        conjunction: Conjunction,
    },
}

/// Pending work while lowering a tree.
enum Lower<'a> {
    Node(&'a Boolean),
    Emit(Token),
}

/// Pending work while cloning a tree.
enum Rebuild<'a> {
    Visit(&'a Boolean),
    Combine(Conjunction),
}

impl Boolean {
    /// Lower the tree to its token sequence.
    pub fn tokens(&self) -> Vec<Token> {
        let mut out = Vec::new();
        self.lower_into(&mut out);
        out
    }

    pub(crate) fn lower_into(&self, out: &mut Vec<Token>) {
        let mut stack = vec![Lower::Node(self)];
        while let Some(step) = stack.pop() {
            match step {
                Lower::Emit(token) => out.push(token),
                Lower::Node(Boolean::Comparison { column, op, value }) => {
                    column.lower_into(out);
                    out.push(op.token());
                    out.push(Token::Placeholder(value.clone()));
                }
                Lower::Node(Boolean::Combination {
                    left,
                    right,
                    conjunction,
                }) => {
                    out.push(Token::LeftParen);
                    stack.push(Lower::Emit(Token::RightParen));
                    stack.push(Lower::Node(right));
                    stack.push(Lower::Emit(conjunction.token()));
                    stack.push(Lower::Node(left));
                }
            }
        }
    }

    /// Number of comparisons, i.e. placeholders this tree compiles to.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Boolean::Comparison { .. } => count += 1,
                Boolean::Combination { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        count
    }

    /// Left-fold the expressions with `AND`. `None` when empty.
    pub fn all(exprs: impl IntoIterator<Item = Boolean>) -> Option<Boolean> {
        exprs.into_iter().reduce(and)
    }

    /// Left-fold the expressions with `OR`. `None` when empty.
    pub fn any(exprs: impl IntoIterator<Item = Boolean>) -> Option<Boolean> {
        exprs.into_iter().reduce(or)
    }

    fn detached() -> Self {
        Boolean::Comparison {
            column: ColumnRef::detached(),
            op: Comparator::Eq,
            value: Value::Null,
        }
    }

    /// Move both children of a combination onto `out`, leaving empty leaves.
    fn detach_children(&mut self, out: &mut Vec<Boolean>) {
        if let Boolean::Combination { left, right, .. } = self {
            out.push(std::mem::replace(&mut **left, Boolean::detached()));
            out.push(std::mem::replace(&mut **right, Boolean::detached()));
        }
    }
}

impl Drop for Boolean {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            // children are detached first, so dropping `node` stays shallow
            node.detach_children(&mut pending);
        }
    }
}

impl Clone for Boolean {
    fn clone(&self) -> Self {
        let mut built: Vec<Boolean> = Vec::new();
        let mut stack = vec![Rebuild::Visit(self)];
        while let Some(step) = stack.pop() {
            match step {
                Rebuild::Visit(Boolean::Comparison { column, op, value }) => {
                    built.push(Boolean::Comparison {
                        column: column.clone(),
                        op: *op,
                        value: value.clone(),
                    });
                }
                Rebuild::Visit(Boolean::Combination {
                    left,
                    right,
                    conjunction,
                }) => {
                    stack.push(Rebuild::Combine(*conjunction));
                    stack.push(Rebuild::Visit(right));
                    stack.push(Rebuild::Visit(left));
                }
                Rebuild::Combine(conjunction) => {
                    let (Some(right), Some(left)) = (built.pop(), built.pop()) else {
                        unreachable!("both operands are rebuilt before their combination");
                    };
                    built.push(combine(left, right, conjunction));
                }
            }
        }
        built.pop().unwrap_or_else(Boolean::detached)
    }
}

impl PartialEq for Boolean {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some(pair) = stack.pop() {
            match pair {
                (
                    Boolean::Comparison { column, op, value },
                    Boolean::Comparison {
                        column: other_column,
                        op: other_op,
                        value: other_value,
                    },
                ) => {
                    if column != other_column || op != other_op || value != other_value {
                        return false;
                    }
                }
                (
                    Boolean::Combination {
                        left,
                        right,
                        conjunction,
                    },
                    Boolean::Combination {
                        left: other_left,
                        right: other_right,
                        conjunction: other_conjunction,
                    },
                ) => {
                    if conjunction != other_conjunction {
                        return false;
                    }
                    stack.push((&**right, &**other_right));
                    stack.push((&**left, &**other_left));
                }
                _ => return false,
            }
        }
        true
    }
}

/// Shows the token stream, e.g. `Boolean[( Column(a) = Placeholder(1) OR … )]`.
impl std::fmt::Debug for Boolean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Boolean[")?;
        for (i, token) in self.tokens().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", token)?;
        }
        write!(f, "]")
    }
}

/// Create a comparison with an explicit operator
pub fn compare(column: impl ColumnSelector, op: Comparator, value: impl Into<Value>) -> Boolean {
    Boolean::Comparison {
        column: ColumnRef::from_selector(&column),
        op,
        value: value.into(),
    }
}

/// Create an equality comparison (column = value)
pub fn eq(column: impl ColumnSelector, value: impl Into<Value>) -> Boolean {
    compare(column, Comparator::Eq, value)
}

/// Create a not-equal comparison (column != value)
pub fn neq(column: impl ColumnSelector, value: impl Into<Value>) -> Boolean {
    compare(column, Comparator::Neq, value)
}

/// Create a less-than comparison (column < value)
pub fn lt(column: impl ColumnSelector, value: impl Into<Value>) -> Boolean {
    compare(column, Comparator::Lt, value)
}

/// Create a less-than-or-equal comparison (column <= value)
pub fn lte(column: impl ColumnSelector, value: impl Into<Value>) -> Boolean {
    compare(column, Comparator::Lte, value)
}

/// Create a greater-than comparison (column > value)
pub fn gt(column: impl ColumnSelector, value: impl Into<Value>) -> Boolean {
    compare(column, Comparator::Gt, value)
}

/// Create a greater-than-or-equal comparison (column >= value)
pub fn gte(column: impl ColumnSelector, value: impl Into<Value>) -> Boolean {
    compare(column, Comparator::Gte, value)
}

fn combine(left: Boolean, right: Boolean, conjunction: Conjunction) -> Boolean {
    Boolean::Combination {
        left: Box::new(left),
        right: Box::new(right),
        conjunction,
    }
}

/// `( left AND right )`
pub fn and(left: Boolean, right: Boolean) -> Boolean {
    combine(left, right, Conjunction::And)
}

/// `( left OR right )`
pub fn or(left: Boolean, right: Boolean) -> Boolean {
    combine(left, right, Conjunction::Or)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_tokens() {
        assert_eq!(
            eq("a", "test").tokens(),
            vec![
                Token::Column("a".into()),
                Token::Eq,
                Token::Placeholder(Value::Text("test".into())),
            ]
        );
    }

    #[test]
    fn test_combination_is_parenthesized() {
        let tokens = or(eq("a", 1), neq("b", 2)).tokens();
        assert_eq!(tokens.first(), Some(&Token::LeftParen));
        assert_eq!(tokens.last(), Some(&Token::RightParen));
        assert_eq!(tokens[4], Token::Or);
        assert_eq!(tokens[6], Token::Neq);
    }

    #[test]
    fn test_no_flattening() {
        // ( ( a AND b ) AND c ) keeps both pairs of parentheses
        let tokens = and(and(eq("a", 1), eq("b", 2)), eq("c", 3)).tokens();
        let opens = tokens.iter().filter(|t| **t == Token::LeftParen).count();
        assert_eq!(opens, 2);
    }

    #[test]
    fn test_leaf_count() {
        let expr = and(eq("a", 1), or(eq("b", 2), lt("c", 3)));
        assert_eq!(expr.leaf_count(), 3);
    }

    #[test]
    fn test_all_and_any() {
        assert_eq!(Boolean::all(Vec::new()), None);
        assert_eq!(Boolean::all(vec![eq("a", 1)]), Some(eq("a", 1)));
        assert_eq!(
            Boolean::all(vec![eq("a", 1), eq("b", 2), eq("c", 3)]),
            Some(and(and(eq("a", 1), eq("b", 2)), eq("c", 3)))
        );
        assert_eq!(
            Boolean::any(vec![eq("a", 1), eq("b", 2)]),
            Some(or(eq("a", 1), eq("b", 2)))
        );
    }

    #[test]
    fn test_wide_fold_does_not_overflow() {
        let expr = Boolean::any((0..100_000).map(|i| eq("id", i))).unwrap();
        assert_eq!(expr.leaf_count(), 100_000);

        let copy = expr.clone();
        assert!(copy == expr);
        assert!(copy != Boolean::any((0..100_000).map(|i| eq("id", i + 1))).unwrap());

        let tokens = expr.tokens();
        // each leaf is three tokens, each of the n - 1 combinations adds three more
        assert_eq!(tokens.len(), 100_000 * 3 + 99_999 * 3);
        drop(copy);
        drop(expr);
    }

    #[test]
    fn test_clone_preserves_shape() {
        let expr = and(eq("a", 1), or(neq("b", 2), gt("c", 3)));
        assert_eq!(expr.clone().tokens(), expr.tokens());
    }

    #[test]
    fn test_debug_shows_tokens() {
        let expr = or(eq("a", 1), eq("b", 2));
        assert_eq!(
            format!("{:?}", expr),
            "Boolean[( Column(a) = Placeholder(1) OR Column(b) = Placeholder(2) )]"
        );
    }

    #[test]
    fn test_ordering_operators() {
        assert_eq!(gte("a", 1).tokens()[1], Token::Gte);
        assert_eq!(lte("a", 1).tokens()[1], Token::Lte);
        assert_eq!(gt("a", 1).tokens()[1], Token::Gt);
    }
}
