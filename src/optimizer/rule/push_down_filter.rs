use crate::catalog::Schema;
use crate::error::{FedSqlError, FedSqlResult};
use crate::expression::{conjunction, split_conjunction, Expr};
use crate::optimizer::is_satisfied;
use crate::plan::{Filter, PlanNode};
use std::sync::Arc;

/// Push the clauses of a `Filter` down to the lowest node whose exposed
/// tables cover them. Clauses that land are re-checked against the target
/// node's schema; a reference that does not resolve there aborts the rewrite.
/// Clauses no node can take stay at the original filter.
pub fn push_down_filter(n: Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    let PlanNode::Filter(filter) = n.as_ref() else {
        return Ok(n);
    };

    let clauses: Vec<Expr> = split_conjunction(&filter.predicate)
        .into_iter()
        .cloned()
        .collect();
    let mut bits = vec![false; clauses.len()];

    let child = filter.input.transform_up(&mut |node| {
        // A Filter met on the way down only ever merges with another Filter;
        // clauses never attach to one directly.
        if let PlanNode::Filter(outer) = node.as_ref() {
            if let PlanNode::Filter(inner) = outer.input.as_ref() {
                return Ok(Arc::new(PlanNode::Filter(Filter {
                    predicate: outer.predicate.clone().and(inner.predicate.clone()),
                    input: inner.input.clone(),
                })));
            }
            return Ok(node);
        }

        let tables = node.exposed_tables();
        let mut landed = Vec::new();
        for (i, clause) in clauses.iter().enumerate() {
            if bits[i] || !is_satisfied(clause, &tables) {
                continue;
            }
            landed.push(clause.clone());
            bits[i] = true;
        }
        if landed.is_empty() {
            return Ok(node);
        }

        let schema = node.schema();
        let rebased = landed
            .into_iter()
            .map(|clause| rebase_columns(clause, &schema))
            .collect::<FedSqlResult<Vec<_>>>()?;
        let predicate = conjunction(rebased).ok_or_else(|| {
            FedSqlError::Internal("Pushed clause set cannot be empty".to_string())
        })?;
        Ok(Arc::new(PlanNode::Filter(Filter {
            predicate,
            input: node,
        })))
    })?;

    let leftovers: Vec<Expr> = clauses
        .iter()
        .zip(bits.iter())
        .filter(|(_, landed)| !**landed)
        .map(|(clause, _)| clause.clone())
        .collect();
    match conjunction(leftovers) {
        Some(predicate) => Ok(Arc::new(PlanNode::Filter(Filter {
            predicate,
            input: child,
        }))),
        None => Ok(child),
    }
}

/// Check every column reference of a pushed clause against the schema of the
/// node it now sits on.
fn rebase_columns(expr: Expr, schema: &Schema) -> FedSqlResult<Expr> {
    expr.transform_up(&mut |e| {
        if let Expr::Column(col) = &e {
            schema
                .index_of(col.relation.as_ref(), &col.name)
                .map_err(|_| FedSqlError::Plan(format!("Field not found: {col}")))?;
        }
        Ok(e)
    })
}
