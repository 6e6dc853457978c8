pub mod rule;

use crate::error::FedSqlResult;
use crate::expression::Expr;
use crate::plan::{PlanNode, SubqueryAlias};
use rule::{
    annotate_join, cleanup, harvest_hints, merge_filter, push_across_boundary, push_down_filter,
    strip_hints,
};
use std::sync::Arc;

/// One rewrite step applied at a node during a bottom-up pass.
pub type RuleFn = fn(Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>>;

/// Apply `rule` bottom-up over the whole tree, re-entering subquery bodies.
/// `PlanNode::transform_up` alone leaves a `SubqueryAlias` body untouched.
pub fn transform_across_subqueries(
    node: &Arc<PlanNode>,
    rule: RuleFn,
) -> FedSqlResult<Arc<PlanNode>> {
    node.transform_up(&mut |n: Arc<PlanNode>| {
        let n = match n.as_ref() {
            PlanNode::SubqueryAlias(sq) => {
                let inner = transform_across_subqueries(&sq.input, rule)?;
                Arc::new(PlanNode::SubqueryAlias(SubqueryAlias {
                    name: sq.name.clone(),
                    schema: sq.schema.clone(),
                    input: inner,
                }))
            }
            _ => n,
        };
        rule(n)
    })
}

/// Whether every column the expression references belongs to one of `tables`.
pub fn is_satisfied(expr: &Expr, tables: &std::collections::HashSet<String>) -> bool {
    let mut ok = true;
    expr.walk(&mut |e| {
        if let Expr::Column(col) = e {
            match col.relation.as_ref() {
                Some(rel) => {
                    if !tables.contains(rel.table()) {
                        ok = false;
                    }
                }
                None => ok = false,
            }
        }
    });
    ok
}

/// How many pushdown iterations the plan needs: one plus the deepest nesting
/// of SubqueryAlias/Project boundaries along any root-to-leaf path.
pub fn count_depth(node: &Arc<PlanNode>) -> usize {
    fn boundaries(node: &PlanNode) -> usize {
        let own = matches!(node, PlanNode::SubqueryAlias(_) | PlanNode::Project(_)) as usize;
        let inner = node
            .inputs()
            .iter()
            .map(|c| boundaries(c))
            .max()
            .unwrap_or(0);
        own + inner
    }
    1 + boundaries(node)
}

/// The full rewrite pipeline: cleanup, the depth-bounded pushdown loop, join
/// annotation, hint harvesting and annotation removal. Any stage error aborts
/// the whole rewrite.
pub fn optimize(plan: Arc<PlanNode>, trace: bool) -> FedSqlResult<Arc<PlanNode>> {
    let mut node = cleanup(&plan)?;
    if trace {
        log::debug!("plan after cleanup:\n{node}");
    }

    let mut depth = count_depth(&node);
    loop {
        node = transform_across_subqueries(&node, push_down_filter)?;
        depth -= 1;
        if depth < 1 {
            break;
        }
        node = transform_across_subqueries(&node, push_across_boundary)?;
        node = merge_filter(&node)?;
    }
    if trace {
        log::debug!("plan after pushdown:\n{node}");
    }

    node = transform_across_subqueries(&node, annotate_join)?;
    harvest_hints(&node);
    node = transform_across_subqueries(&node, strip_hints)?;
    if trace {
        log::debug!("plan after hint harvest:\n{node}");
    }
    Ok(node)
}
