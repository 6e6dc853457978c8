mod common;

use common::MemBackend;
use fedsql::catalog::{DataSource, DataType};
use fedsql::config::PlannerConfig;
use fedsql::expression::{ColumnExpr, Expr, Literal};
use fedsql::planner::resolve_tables;
use fedsql::utils::scalar::ScalarValue;
use fedsql::utils::table_ref::TableReference;
use sqlparser::ast::{Ident, ObjectName, Query, Statement};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

fn col(relation: &str, name: &str) -> Expr {
    Expr::Column(ColumnExpr {
        relation: Some(TableReference::bare(relation)),
        name: name.to_string(),
    })
}

fn lit(v: i64) -> Expr {
    Expr::Literal(Literal { value: v.into() })
}

fn catalog_with_tables() -> DataSource {
    let backend = MemBackend::new();
    backend.add_table(
        "db",
        "users",
        vec![("id", DataType::Int64), ("name", DataType::Varchar)],
        vec![vec![ScalarValue::Int64(Some(1)), "ann".into()]],
    );
    backend.add_table(
        "db2",
        "orders",
        vec![("uid", DataType::Int64), ("item", DataType::Varchar)],
        vec![vec![ScalarValue::Int64(Some(1)), "apple".into()]],
    );
    let mut catalog = DataSource::new(backend, PlannerConfig::default());
    catalog.reset("db");
    catalog
}

fn parse_query(sql: &str) -> Query {
    let statements = Parser::parse_sql(&GenericDialect {}, sql).unwrap();
    match statements.into_iter().next().unwrap() {
        Statement::Query(query) => *query,
        other => panic!("expected a query, got {other:?}"),
    }
}

#[test]
fn rewrite_mints_synthetic_names_and_keeps_originals_as_aliases() {
    let mut catalog = catalog_with_tables();
    let mut query =
        parse_query("SELECT * FROM users JOIN db2.orders ON users.id = orders.uid");
    catalog.rewrite_statement(&mut query).unwrap();

    let rendered = query.to_string();
    assert!(rendered.contains("temp1 AS users"), "{rendered}");
    assert!(rendered.contains("temp2 AS orders"), "{rendered}");

    let names: Vec<&str> = catalog.tables().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["temp1", "temp2"]);
    assert_eq!(catalog.tables()[0].origin().to_string(), "users");
    assert_eq!(catalog.tables()[1].origin().to_string(), "db2.orders");
}

#[test]
fn rewrite_reaches_derived_subqueries_and_preserves_explicit_aliases() {
    let mut catalog = catalog_with_tables();
    let mut query = parse_query(
        "SELECT * FROM (SELECT id FROM users) AS u JOIN db2.orders AS o ON u.id = o.uid",
    );
    catalog.rewrite_statement(&mut query).unwrap();

    let rendered = query.to_string();
    assert!(rendered.contains("(SELECT id FROM temp1 AS users) AS u"), "{rendered}");
    assert!(rendered.contains("temp2 AS o"), "{rendered}");
    assert!(!rendered.contains("AS orders"), "{rendered}");
}

#[test]
fn same_table_referenced_twice_gets_two_registrations() {
    let mut catalog = catalog_with_tables();
    let mut query =
        parse_query("SELECT * FROM users AS a JOIN users AS b ON a.id = b.id");
    catalog.rewrite_statement(&mut query).unwrap();

    let names: Vec<&str> = catalog.tables().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["temp1", "temp2"]);
    assert_eq!(catalog.tables()[0].origin().to_string(), "users");
    assert_eq!(catalog.tables()[1].origin().to_string(), "users");
}

#[test]
fn resolver_classifies_self_and_foreign_columns() {
    let mut catalog = catalog_with_tables();
    let users = catalog
        .get_table(&ObjectName(vec![Ident::new("users")]))
        .unwrap();
    catalog
        .get_table(&ObjectName(vec![
            Ident::new("db2"),
            Ident::new("orders"),
        ]))
        .unwrap();

    users.set_hints(vec![
        col("temp1", "id").eq(lit(2)),
        col("temp1", "id").eq(col("temp2", "uid")),
    ]);
    resolve_tables(&catalog).unwrap();

    let rendered: Vec<String> = users.hints().iter().map(|h| h.to_string()).collect();
    assert_eq!(rendered, vec!["self.id = 2", "self.id = remote(temp2).uid"]);
}

#[test]
fn resolver_rejects_unqualified_and_unknown_references() {
    let mut catalog = catalog_with_tables();
    let users = catalog
        .get_table(&ObjectName(vec![Ident::new("users")]))
        .unwrap();

    users.set_hints(vec![Expr::Column(ColumnExpr {
        relation: None,
        name: "id".to_string(),
    })
    .eq(lit(1))]);
    let err = resolve_tables(&catalog).unwrap_err();
    assert!(err.to_string().contains("Unqualified column"), "{err}");

    users.set_hints(vec![col("nowhere", "id").eq(lit(1))]);
    let err = resolve_tables(&catalog).unwrap_err();
    assert!(err.to_string().contains("Table not found"), "{err}");
}

#[test]
fn too_many_qualifiers_is_rejected() {
    let mut catalog = catalog_with_tables();
    let err = catalog
        .get_table(&ObjectName(vec![
            Ident::new("a"),
            Ident::new("b"),
            Ident::new("c"),
        ]))
        .unwrap_err();
    assert!(err.to_string().contains("too many qualifiers"), "{err}");
}
