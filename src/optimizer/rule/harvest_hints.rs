use crate::error::FedSqlResult;
use crate::expression::{split_conjunction, Expr};
use crate::plan::PlanNode;
use std::sync::Arc;

/// Walk the plan top-down, accumulating every `Hint` and `Filter` predicate
/// along each root-to-scan path, and store the AND-flattened clauses on the
/// scans' tables, nearest predicate first. A `SubqueryAlias` or `Project`
/// boundary starts a fresh accumulation for its subtree. Infallible; plans
/// without hints simply leave every table's clause list empty.
pub fn harvest_hints(node: &Arc<PlanNode>) {
    collect(node, &mut Vec::new());
}

fn collect(node: &Arc<PlanNode>, acc: &mut Vec<Expr>) {
    match node.as_ref() {
        PlanNode::Scan(scan) => {
            let mut hints = Vec::new();
            for predicate in acc.iter().rev() {
                hints.extend(split_conjunction(predicate).into_iter().cloned());
            }
            scan.table.set_hints(hints);
        }
        PlanNode::Filter(filter) => {
            acc.push(filter.predicate.clone());
            collect(&filter.input, acc);
            acc.pop();
        }
        PlanNode::Hint(hint) => {
            acc.push(hint.predicate.clone());
            collect(&hint.input, acc);
            acc.pop();
        }
        PlanNode::SubqueryAlias(sq) => collect(&sq.input, &mut Vec::new()),
        PlanNode::Project(project) => collect(&project.input, &mut Vec::new()),
        other => {
            for child in other.inputs() {
                collect(child, acc);
            }
        }
    }
}

/// Remove every `Hint` node. Run after harvesting; the executable plan must
/// be hint-free.
pub fn strip_hints(n: Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    match n.as_ref() {
        PlanNode::Hint(hint) => Ok(hint.input.clone()),
        _ => Ok(n),
    }
}
