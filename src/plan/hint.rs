use crate::expression::Expr;
use crate::plan::PlanNode;
use std::sync::Arc;

/// An advisory copy of a join condition placed on the join's inner side.
/// Hints never filter rows themselves; the harvest pass collects them for
/// backend dispatch and they are stripped before execution.
#[derive(Debug, Clone)]
pub struct Hint {
    pub predicate: Expr,
    pub input: Arc<PlanNode>,
}
