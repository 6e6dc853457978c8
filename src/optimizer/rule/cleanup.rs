use crate::error::FedSqlResult;
use crate::optimizer::transform_across_subqueries;
use crate::plan::{Filter, Join, JoinType, PlanNode};
use std::sync::Arc;

/// Normalize the analyzed tree before any pushdown runs: drop `TableAlias`
/// wrappers and turn every inner join into a `Filter` over a cross join so
/// the join condition becomes ordinary pushdown material.
pub fn cleanup(node: &Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    transform_across_subqueries(node, cleanup_node)
}

fn cleanup_node(n: Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    match n.as_ref() {
        PlanNode::TableAlias(alias) => Ok(alias.input.clone()),
        PlanNode::Join(join) if join.join_type == JoinType::Inner => {
            let cross = Arc::new(PlanNode::Join(Join {
                join_type: JoinType::Cross,
                condition: None,
                left: join.left.clone(),
                right: join.right.clone(),
                schema: join.schema.clone(),
            }));
            match join.condition.clone() {
                Some(condition) => Ok(Arc::new(PlanNode::Filter(Filter {
                    predicate: condition,
                    input: cross,
                }))),
                None => Ok(cross),
            }
        }
        _ => Ok(n),
    }
}
