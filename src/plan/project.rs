use crate::catalog::{Schema, SchemaRef};
use crate::error::FedSqlResult;
use crate::expression::{Expr, ExprTrait};
use crate::plan::PlanNode;
use std::sync::Arc;

/// Computes one output column per expression against each input row.
#[derive(Debug, Clone)]
pub struct Project {
    pub exprs: Vec<Expr>,
    pub schema: SchemaRef,
    pub input: Arc<PlanNode>,
}

impl Project {
    pub fn try_new(exprs: Vec<Expr>, input: Arc<PlanNode>) -> FedSqlResult<Self> {
        let input_schema = input.schema();
        let columns = exprs
            .iter()
            .map(|e| e.to_column(&input_schema))
            .collect::<FedSqlResult<Vec<_>>>()?;
        Ok(Project {
            exprs,
            schema: Arc::new(Schema::new(columns)),
            input,
        })
    }
}
