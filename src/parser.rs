//! Filter syntax parser using nom.
//!
//! Builds a [`Boolean`] from text such as the CLI's `<FILTER>` argument.
//!
//! # Syntax Overview
//!
//! ```text
//! name='Kid A' & (type=1 | release_date>=2000-01-01T00:00:00Z)
//! ─┬── ───┬───  ┬       ┬  ──────────────┬──────────────────
//!  │      │     │       │                └── RFC 3339 literals become timestamps
//!  │      │     │       └── `|` is OR
//!  │      │     └── `&` is AND and binds tighter than `|`
//!  │      └── quoted text literal
//!  └── column, resolved against a closed registry
//! ```
//!
//! Both conjunctions are left-associative; parentheses group explicitly.
//! Literals take the type of the column they are compared to: `name=1999`
//! compares text, `release_date>=2000-01-01` compares against midnight UTC
//! and `id=null` binds an integer NULL.

use chrono::{DateTime, NaiveDate, Utc};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{cut, map, value},
    error::ErrorKind,
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult,
};

use crate::column::{ColumnSelector, ColumnType};
use crate::error::{BoilingError, BoilingResult};
use crate::expr::{compare, Boolean, Comparator};
use crate::schema::ReleaseGroupColumn;
use crate::value::Value;

/// Literal text as written; typed once its column is known.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal<'a> {
    Quoted(&'a str),
    Bare(&'a str),
}

/// Parsed filter with unresolved column names.
///
/// Chains of one conjunction are kept flat, so nesting only grows with
/// parentheses.
#[derive(Debug, Clone, PartialEq)]
enum Filter<'a> {
    Compare {
        column: &'a str,
        op: Comparator,
        literal: Literal<'a>,
        /// Input remaining where the literal starts, for error positions.
        at: &'a str,
    },
    All(Vec<Filter<'a>>),
    Any(Vec<Filter<'a>>),
}

impl<'a> Filter<'a> {
    fn chain(first: Filter<'a>, rest: Vec<Filter<'a>>, wrap: fn(Vec<Filter<'a>>) -> Self) -> Self {
        if rest.is_empty() {
            return first;
        }
        let mut items = Vec::with_capacity(rest.len() + 1);
        items.push(first);
        items.extend(rest);
        wrap(items)
    }

    fn resolve<C, F>(self, source: &str, resolver: &F) -> BoilingResult<Boolean>
    where
        C: ColumnSelector,
        F: Fn(&str) -> BoilingResult<C>,
    {
        match self {
            Filter::Compare {
                column,
                op,
                literal,
                at,
            } => {
                let selector = resolver(column)?;
                let value = typed_value(literal, selector.column_type()).map_err(|message| {
                    BoilingError::parse(
                        source.len() - at.len(),
                        format!("{} for column '{}'", message, column),
                    )
                })?;
                Ok(compare(selector, op, value))
            }
            Filter::All(items) => {
                let items = resolve_all(items, source, resolver)?;
                Boolean::all(items).ok_or(BoilingError::MissingExpression)
            }
            Filter::Any(items) => {
                let items = resolve_all(items, source, resolver)?;
                Boolean::any(items).ok_or(BoilingError::MissingExpression)
            }
        }
    }
}

fn resolve_all<C, F>(items: Vec<Filter<'_>>, source: &str, resolver: &F) -> BoilingResult<Vec<Boolean>>
where
    C: ColumnSelector,
    F: Fn(&str) -> BoilingResult<C>,
{
    items
        .into_iter()
        .map(|item| item.resolve(source, resolver))
        .collect()
}

/// Parse a filter, resolving every column name through `resolver`.
///
/// Literals compared against a column with a known [`ColumnType`] are
/// converted to that type, and rejected when they do not fit.
pub fn parse_filter<C, F>(input: &str, resolver: F) -> BoilingResult<Boolean>
where
    C: ColumnSelector,
    F: Fn(&str) -> BoilingResult<C>,
{
    let input = input.trim();
    if input.is_empty() {
        return Err(BoilingError::MissingExpression);
    }

    match parse_expr(input) {
        Ok(("", filter)) => filter.resolve(input, &resolver),
        Ok((remaining, _)) => Err(BoilingError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let found = if e.input.is_empty() {
                "end of input".to_string()
            } else {
                format!("'{}'", e.input)
            };
            let expected = match e.code {
                ErrorKind::Char => "')'",
                _ => "a comparison",
            };
            Err(BoilingError::parse(
                input.len() - e.input.len(),
                format!("Expected {}, found {}", expected, found),
            ))
        }
        Err(nom::Err::Incomplete(_)) => Err(BoilingError::parse(input.len(), "Unexpected end of input")),
    }
}

/// Parse a filter over the `release_groups` registry.
pub fn parse_release_group_filter(input: &str) -> BoilingResult<Boolean> {
    parse_filter(input, |name| name.parse::<ReleaseGroupColumn>())
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// expr := term ( '|' term )*
fn parse_expr(input: &str) -> IResult<&str, Filter<'_>> {
    let (input, first) = parse_term(input)?;
    let (input, rest) = many0(preceded(ws(char('|')), cut(parse_term)))(input)?;
    Ok((input, Filter::chain(first, rest, Filter::Any)))
}

/// term := factor ( '&' factor )*
fn parse_term(input: &str) -> IResult<&str, Filter<'_>> {
    let (input, first) = parse_factor(input)?;
    let (input, rest) = many0(preceded(ws(char('&')), cut(parse_factor)))(input)?;
    Ok((input, Filter::chain(first, rest, Filter::All)))
}

/// factor := '(' expr ')' | compare
fn parse_factor(input: &str) -> IResult<&str, Filter<'_>> {
    alt((
        preceded(ws(char('(')), cut(terminated(parse_expr, ws(char(')'))))),
        parse_compare,
    ))(input)
}

fn parse_compare(input: &str) -> IResult<&str, Filter<'_>> {
    let (input, column) = ws(parse_identifier)(input)?;
    let (input, op) = parse_operator(input)?;
    let (at, _) = multispace0(input)?;
    let (input, literal) = parse_literal(at)?;
    let (input, _) = multispace0(input)?;
    Ok((
        input,
        Filter::Compare {
            column,
            op,
            literal,
            at,
        },
    ))
}

/// Parse an identifier (column name).
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Two-character operators are tried first so `<=` is not read as `<`.
fn parse_operator(input: &str) -> IResult<&str, Comparator> {
    alt((
        value(Comparator::Neq, tag("!=")),
        value(Comparator::Lte, tag("<=")),
        value(Comparator::Gte, tag(">=")),
        value(Comparator::Eq, tag("=")),
        value(Comparator::Lt, tag("<")),
        value(Comparator::Gt, tag(">")),
    ))(input)
}

fn parse_literal(input: &str) -> IResult<&str, Literal<'_>> {
    alt((
        map(parse_quoted, Literal::Quoted),
        map(parse_bare_word, Literal::Bare),
    ))(input)
}

/// 'single quoted text'
fn parse_quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), take_while(|c: char| c != '\''), char('\''))(input)
}

fn parse_bare_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '+'))(input)
}

/// Convert a literal for a column of the given type.
///
/// Untyped columns fall back to [`classify_bare_word`]. A bare `null`
/// becomes a NULL of the column's type.
fn typed_value(literal: Literal<'_>, column_type: Option<ColumnType>) -> Result<Value, String> {
    let word = match literal {
        Literal::Quoted(text) => match column_type {
            None | Some(ColumnType::Text) => return Ok(Value::Text(text.to_string())),
            Some(_) => text,
        },
        Literal::Bare(word) => word,
    };

    let Some(column_type) = column_type else {
        return Ok(classify_bare_word(word));
    };
    if matches!(literal, Literal::Bare(_)) && word.eq_ignore_ascii_case("null") {
        return Ok(Value::TypedNull(column_type));
    }

    let converted = match column_type {
        ColumnType::Text => Some(Value::Text(word.to_string())),
        ColumnType::Integer => word.parse::<i64>().ok().map(Value::Int),
        ColumnType::Float => word.parse::<f64>().ok().map(Value::Float),
        ColumnType::Bool => match word.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ColumnType::Timestamp => parse_timestamp(word).map(Value::Timestamp),
    };
    converted.ok_or_else(|| format!("Expected {}, found '{}'", column_type, word))
}

/// RFC 3339, or a bare `YYYY-MM-DD` date taken as midnight UTC.
fn parse_timestamp(word: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(word) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(word, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
}

fn classify_bare_word(word: &str) -> Value {
    match word.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if let Ok(n) = word.parse::<i64>() {
        return Value::Int(n);
    }

    let numeric = word
        .trim_start_matches('-')
        .starts_with(|c: char| c.is_ascii_digit());
    if numeric {
        if let Ok(f) = word.parse::<f64>() {
            return Value::Float(f);
        }
        if let Some(t) = parse_timestamp(word) {
            return Value::Timestamp(t);
        }
    }

    Value::Text(word.to_string())
}
