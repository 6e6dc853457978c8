use crate::error::FedSqlResult;
use crate::expression::{conjunction, split_conjunction, Expr};
use crate::optimizer::is_satisfied;
use crate::plan::{Filter, Hint, Join, PlanNode};
use std::sync::Arc;

/// For a `Filter` sitting on a join, copy the clauses that need the right
/// side into `Hint` annotations on the lowest covering node of the right
/// subtree. The left side's tables count as given, so a two-table equality
/// lands on the right scan. Purely additive: the original filter keeps its
/// full predicate and the hints never filter rows.
pub fn annotate_join(n: Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    let PlanNode::Filter(filter) = n.as_ref() else {
        return Ok(n);
    };
    let PlanNode::Join(join) = filter.input.as_ref() else {
        return Ok(n);
    };

    let clauses: Vec<Expr> = split_conjunction(&filter.predicate)
        .into_iter()
        .cloned()
        .collect();
    let mut bits = vec![false; clauses.len()];
    let base: std::collections::HashSet<String> = join
        .left
        .schema()
        .columns
        .iter()
        .filter_map(|col| col.relation.as_ref().map(|r| r.table().to_string()))
        .collect();

    // A clause the left side covers on its own stays where it is.
    for (i, clause) in clauses.iter().enumerate() {
        if is_satisfied(clause, &base) {
            bits[i] = true;
        }
    }

    let right = join.right.transform_up(&mut |node| {
        if let PlanNode::Hint(outer) = node.as_ref() {
            if let PlanNode::Hint(inner) = outer.input.as_ref() {
                return Ok(Arc::new(PlanNode::Hint(Hint {
                    predicate: outer.predicate.clone().and(inner.predicate.clone()),
                    input: inner.input.clone(),
                })));
            }
            return Ok(node);
        }

        let mut tables = base.clone();
        tables.extend(node.exposed_tables());
        let mut landed = Vec::new();
        for (i, clause) in clauses.iter().enumerate() {
            if bits[i] || !is_satisfied(clause, &tables) {
                continue;
            }
            landed.push(clause.clone());
            bits[i] = true;
        }
        match conjunction(landed) {
            Some(predicate) => Ok(Arc::new(PlanNode::Hint(Hint {
                predicate,
                input: node,
            }))),
            None => Ok(node),
        }
    })?;

    Ok(Arc::new(PlanNode::Filter(Filter {
        predicate: filter.predicate.clone(),
        input: Arc::new(PlanNode::Join(Join {
            join_type: join.join_type,
            condition: join.condition.clone(),
            left: join.left.clone(),
            right,
            schema: join.schema.clone(),
        })),
    })))
}
