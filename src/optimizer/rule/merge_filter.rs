use crate::error::FedSqlResult;
use crate::optimizer::transform_across_subqueries;
use crate::plan::{Filter, PlanNode};
use std::sync::Arc;

/// Coalesce adjacent `Filter` nodes into one AND-joined predicate.
pub fn merge_filter(node: &Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    transform_across_subqueries(node, merge_one)
}

fn merge_one(n: Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    let PlanNode::Filter(outer) = n.as_ref() else {
        return Ok(n);
    };
    let PlanNode::Filter(inner) = outer.input.as_ref() else {
        return Ok(n);
    };
    Ok(Arc::new(PlanNode::Filter(Filter {
        predicate: outer.predicate.clone().and(inner.predicate.clone()),
        input: inner.input.clone(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_util::test_table;
    use crate::expression::{split_conjunction, ColumnExpr, Expr, Literal};
    use crate::plan::Scan;
    use crate::utils::table_ref::TableReference;

    #[test]
    fn filter_stack_collapses_to_one() {
        let col = Expr::Column(ColumnExpr {
            relation: Some(TableReference::bare("temp1")),
            name: "a".to_string(),
        });
        let scan = Arc::new(PlanNode::Scan(Scan {
            table: test_table("temp1", &["a"]),
        }));
        let lower = Arc::new(PlanNode::Filter(Filter {
            predicate: col.clone().eq(Expr::Literal(Literal { value: 1i64.into() })),
            input: scan,
        }));
        let upper = Arc::new(PlanNode::Filter(Filter {
            predicate: col.eq(Expr::Literal(Literal { value: 2i64.into() })),
            input: lower,
        }));

        let merged = merge_filter(&upper).unwrap();
        let PlanNode::Filter(filter) = merged.as_ref() else {
            panic!("expected Filter at the root");
        };
        assert!(matches!(filter.input.as_ref(), PlanNode::Scan(_)));
        assert_eq!(split_conjunction(&filter.predicate).len(), 2);
    }
}
