use crate::catalog::{Schema, SchemaRef};
use crate::error::FedSqlResult;
use crate::expression::Expr;
use crate::plan::PlanNode;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Cross,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "Inner"),
            JoinType::Cross => write!(f, "Cross"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    pub join_type: JoinType,
    pub condition: Option<Expr>,
    pub left: Arc<PlanNode>,
    pub right: Arc<PlanNode>,
    pub schema: SchemaRef,
}

impl Join {
    pub fn try_new(
        join_type: JoinType,
        condition: Option<Expr>,
        left: Arc<PlanNode>,
        right: Arc<PlanNode>,
    ) -> FedSqlResult<Self> {
        let schema = Schema::try_merge([
            left.schema().as_ref().clone(),
            right.schema().as_ref().clone(),
        ])?;
        Ok(Join {
            join_type,
            condition,
            left,
            right,
            schema: Arc::new(schema),
        })
    }
}
