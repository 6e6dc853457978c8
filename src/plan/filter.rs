use crate::expression::Expr;
use crate::plan::PlanNode;
use std::sync::Arc;

/// Keeps only the input rows for which the predicate evaluates to true.
#[derive(Debug, Clone)]
pub struct Filter {
    pub predicate: Expr,
    pub input: Arc<PlanNode>,
}
