mod common;

use common::MemBackend;
use fedsql::catalog::{DataSource, DataType};
use fedsql::config::PlannerConfig;
use fedsql::execution::ExecContext;
use fedsql::expression::{ColumnExpr, Expr, ExprTrait, ForeignField};
use fedsql::plan::{Filter, Join, JoinType, PlanNode, Scan};
use fedsql::storage::backend::TypeUniverse;
use fedsql::storage::tuple::EMPTY_TUPLE;
use fedsql::utils::scalar::ScalarValue;
use fedsql::utils::table_ref::TableReference;
use sqlparser::ast::{Ident, ObjectName};
use std::sync::Arc;

fn col(relation: &str, name: &str) -> Expr {
    Expr::Column(ColumnExpr {
        relation: Some(TableReference::bare(relation)),
        name: name.to_string(),
    })
}

fn int(v: i64) -> ScalarValue {
    v.into()
}

fn varchar(v: &str) -> ScalarValue {
    v.into()
}

fn object_name(name: &str) -> ObjectName {
    ObjectName(vec![Ident::new(name)])
}

#[test]
fn nested_loop_emits_driver_major_order() {
    let backend = MemBackend::new();
    let letters = backend.add_table(
        "db",
        "letters",
        vec![("tag", DataType::Varchar)],
        vec![vec![varchar("A")], vec![varchar("B")]],
    );
    let marks = backend.add_table(
        "db",
        "marks",
        vec![("tag", DataType::Varchar)],
        vec![vec![varchar("x")], vec![varchar("y")]],
    );
    let mut catalog = DataSource::new(backend, PlannerConfig::default());
    catalog.reset("db");
    let left = catalog.get_table(&object_name("letters")).unwrap();
    let right = catalog.get_table(&object_name("marks")).unwrap();

    let join = Join::try_new(
        JoinType::Cross,
        None,
        Arc::new(PlanNode::Scan(Scan { table: left })),
        Arc::new(PlanNode::Scan(Scan { table: right })),
    )
    .unwrap();
    let plan = Arc::new(PlanNode::Join(join));

    let ctx = ExecContext::new();
    let mut iter = plan.row_iter(&ctx).unwrap();
    let mut rows = Vec::new();
    while let Some(tuple) = iter.next(&ctx).unwrap() {
        rows.push(tuple.to_string());
    }
    assert_eq!(rows, vec!["(A, x)", "(A, y)", "(B, x)", "(B, y)"]);

    // One driven scan per driver row, each closed when drained.
    assert_eq!(marks.opened(), 2);
    assert_eq!(marks.closed(), 2);
    assert_eq!(letters.opened(), 1);
    assert_eq!(letters.closed(), 0);

    iter.close().unwrap();
    assert_eq!(letters.closed(), 1);
    assert_eq!(marks.closed(), 2);
}

#[test]
fn interrupt_stops_iteration() {
    let backend = MemBackend::new();
    backend.add_table(
        "db",
        "users",
        vec![("id", DataType::Int64)],
        vec![vec![int(1)], vec![int(2)]],
    );
    let mut catalog = DataSource::new(backend, PlannerConfig::default());
    catalog.reset("db");
    let users = catalog.get_table(&object_name("users")).unwrap();
    let plan = Arc::new(PlanNode::Scan(Scan { table: users }));

    let ctx = ExecContext::new();
    let mut iter = plan.row_iter(&ctx).unwrap();
    assert!(iter.next(&ctx).unwrap().is_some());

    ctx.interrupt();
    let err = iter.next(&ctx).unwrap_err();
    assert!(err.to_string().contains("interrupted"), "{err}");
    iter.close().unwrap();
}

#[test]
fn foreign_field_needs_an_active_remote_scan() {
    let backend = MemBackend::new();
    backend.add_table(
        "db",
        "users",
        vec![("id", DataType::Int64)],
        vec![vec![int(7)]],
    );
    let mut catalog = DataSource::new(backend, PlannerConfig::default());
    catalog.reset("db");
    let users = catalog.get_table(&object_name("users")).unwrap();

    let field = Expr::ForeignField(ForeignField {
        name: "id".to_string(),
        index: 0,
        data_type: DataType::Int64,
        nullable: true,
        table: users.clone(),
        universe: None,
    });
    assert!(field.evaluate(&EMPTY_TUPLE).is_err());

    let ctx = ExecContext::new();
    let handle = users.start_scan(&ctx).unwrap();
    handle.next().unwrap();
    assert_eq!(field.evaluate(&EMPTY_TUPLE).unwrap(), int(7));
}

#[test]
fn new_scan_force_closes_the_previous_one() {
    let backend = MemBackend::new();
    let stats = backend.add_table(
        "db",
        "users",
        vec![("id", DataType::Int64)],
        vec![vec![int(1)], vec![int(2)]],
    );
    let mut catalog = DataSource::new(backend, PlannerConfig::default());
    catalog.reset("db");
    let users = catalog.get_table(&object_name("users")).unwrap();

    let ctx = ExecContext::new();
    let first = users.start_scan(&ctx).unwrap();
    assert!(first.next().unwrap().is_some());

    let second = users.start_scan(&ctx).unwrap();
    assert_eq!(stats.closed(), 1);

    // The displaced handle reads end-of-data and refuses value access.
    assert!(first.is_closed());
    assert!(first.next().unwrap().is_none());
    assert!(first.get_value(0, None).is_err());

    assert!(second.next().unwrap().is_some());
    second.close().unwrap();
    assert_eq!(stats.closed(), 2);
}

#[test]
fn join_clause_feeds_driven_backend_natively() {
    let universe = TypeUniverse::new("memsql");
    let backend = MemBackend::with_universe(universe.clone());
    let users = backend.add_table(
        "db",
        "users",
        vec![("id", DataType::Int64), ("name", DataType::Varchar)],
        vec![vec![int(1), varchar("ann")], vec![int(2), varchar("bob")]],
    );
    let orders = backend.add_table(
        "db",
        "orders",
        vec![("uid", DataType::Int64), ("item", DataType::Varchar)],
        vec![
            vec![int(1), varchar("apple")],
            vec![int(2), varchar("pear")],
            vec![int(2), varchar("plum")],
        ],
    );
    let mut catalog = DataSource::new(backend, PlannerConfig::default());
    catalog.reset("db");
    let left = catalog.get_table(&object_name("users")).unwrap();
    let right = catalog.get_table(&object_name("orders")).unwrap();

    let join = Join::try_new(
        JoinType::Cross,
        None,
        Arc::new(PlanNode::Scan(Scan { table: left })),
        Arc::new(PlanNode::Scan(Scan { table: right })),
    )
    .unwrap();
    let plan = Arc::new(PlanNode::Filter(Filter {
        predicate: col("temp1", "id").eq(col("temp2", "uid")),
        input: Arc::new(PlanNode::Join(join)),
    }));

    let executable =
        fedsql::planner::process_plan(plan, &catalog, &PlannerConfig::default()).unwrap();
    assert_eq!(
        orders.facts(),
        vec!["{uid eq remote(temp1).id}".to_string()]
    );

    let ctx = ExecContext::new();
    let mut iter = executable.row_iter(&ctx).unwrap();
    let mut rows = Vec::new();
    while let Some(tuple) = iter.next(&ctx).unwrap() {
        rows.push(tuple.to_string());
    }
    iter.close().unwrap();

    assert_eq!(
        rows,
        vec!["(1, ann, 1, apple)", "(2, bob, 2, pear)", "(2, bob, 2, plum)"]
    );
    assert_eq!(users.opened(), 1);
    // Driven side re-opened once per driver row; both universes match, so the
    // parameter traveled as a native value.
    assert_eq!(orders.opened(), 2);
    assert_eq!(orders.closed(), 2);
}
