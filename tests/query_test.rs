use boiling::prelude::*;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

struct ColumnA;

impl ColumnSelector for ColumnA {
    fn column(&self) -> &str {
        "a"
    }
}

const COLUMN_B: Column = Column::new("b");
const COLUMN_C: Column = Column::new("c");

#[test]
fn test_query_simple() {
    let q = Query::new(eq(ColumnA, "test"));

    let (query, params) = q.build();

    assert_eq!(params.len(), 1);
    assert_eq!(params, vec![Value::from("test")]);
    assert_eq!(query, r#""a" = $1"#);
}

#[test]
fn test_query_complex() {
    let p1 = "test";
    let p2 = 3;
    let p3 = Utc.with_ymd_and_hms(2019, 4, 1, 12, 0, 0).unwrap();

    let q = Query::new(and(
        eq(ColumnA, p1),
        or(eq(COLUMN_B, p2), neq(COLUMN_C, p3)),
    ));

    let (query, params) = q.build();
    assert_eq!(params.len(), 3);
    assert_eq!(
        params,
        vec![Value::from(p1), Value::from(p2), Value::from(p3)]
    );
    assert_eq!(query, r#"( "a" = $1 AND ( "b" = $2 OR "c" != $3 ) )"#);
}

#[test]
fn test_query_with_sorting() {
    let p1 = 4;
    let p2 = 3;

    let mut q = Query::new(or(eq(ColumnA, p1), eq(ColumnA, p2)));
    q.set_sorter(sort_ascending(COLUMN_B));

    let (query, params) = q.build();
    assert_eq!(params, vec![Value::Int(4), Value::Int(3)]);
    assert_eq!(query, r#"( "a" = $1 OR "a" = $2 ) ORDER BY "b" ASC"#);

    q.set_sorter(sort_descending(COLUMN_C));

    let (query, params) = q.build();
    assert_eq!(params, vec![Value::Int(4), Value::Int(3)]);
    assert_eq!(query, r#"( "a" = $1 OR "a" = $2 ) ORDER BY "c" DESC"#);
}

#[test]
fn test_build_is_idempotent() {
    let q = Query::new(and(eq(ColumnA, 1), neq(COLUMN_B, "x")))
        .with_sorter(sort_descending(COLUMN_C));
    assert_eq!(q.build(), q.build());
}

#[test]
fn test_placeholder_count_and_order() {
    // ( ( a0 OR a1 ) AND ( a2 OR ( a3 AND a4 ) ) )
    let q = Query::new(and(
        or(eq(ColumnA, 0), eq(ColumnA, 1)),
        or(eq(ColumnA, 2), and(neq(ColumnA, 3), eq(ColumnA, 4))),
    ));
    assert_eq!(q.expression().leaf_count(), 5);

    let (query, params) = q.build();
    assert_eq!(
        params,
        (0..5).map(Value::from).collect::<Vec<Value>>()
    );
    for n in 1..=5 {
        assert!(query.contains(&format!("${}", n)));
    }
    assert!(!query.contains("$6"));
}

#[test]
fn test_every_combination_is_parenthesized() {
    let expr = Boolean::all((0..4).map(|i| eq(ColumnA, i))).unwrap();
    let (query, _) = Query::new(expr).build();
    assert_eq!(
        query,
        r#"( ( ( "a" = $1 AND "a" = $2 ) AND "a" = $3 ) AND "a" = $4 )"#
    );
}

#[test]
fn test_table_qualified_columns() {
    const RG_NAME: Column = Column::qualified("rg", "name");
    let q = Query::new(or(eq(RG_NAME, "Kid A"), gt(ColumnA, 2)))
        .with_sorter(sort_ascending(RG_NAME));
    let (query, params) = q.build();
    assert_eq!(
        query,
        r#"( "rg"."name" = $1 OR "a" > $2 ) ORDER BY "rg"."name" ASC"#
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn test_values_pass_through_verbatim() {
    let q = Query::new(and(eq(ColumnA, None::<i64>), neq(COLUMN_B, 1.5)));
    let (_, params) = q.build();
    assert_eq!(params, vec![Value::Null, Value::Float(1.5)]);
}

#[test]
fn test_queries_build_concurrently() {
    let q = std::sync::Arc::new(Query::new(or(eq(ColumnA, 1), eq(COLUMN_B, 2))));
    let expected = q.build();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let q = q.clone();
            std::thread::spawn(move || q.build())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_parse_round_trip_through_cli_syntax() {
    let q = boiling::parse("name='Kid A' & (type=1 | type=2)").unwrap();
    let (query, params) = q.build();
    assert_eq!(
        query,
        r#"( "name" = $1 AND ( "type" = $2 OR "type" = $3 ) )"#
    );
    assert_eq!(
        params,
        vec![Value::from("Kid A"), Value::Int(1), Value::Int(2)]
    );
}

#[test]
fn test_wide_disjunction_builds() {
    let expr = Boolean::any((0..100_000).map(|i| eq(ReleaseGroupColumn::Id, i))).unwrap();
    let (query, params) = Query::new(expr).build();

    assert_eq!(params.len(), 100_000);
    assert_eq!(params.first(), Some(&Value::Int(0)));
    assert_eq!(params.last(), Some(&Value::Int(99_999)));
    assert!(query.starts_with(&"( ".repeat(99_999)));
    assert!(query.ends_with(r#""id" = $100000 )"#));
}
