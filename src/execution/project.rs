use crate::catalog::SchemaRef;
use crate::error::FedSqlResult;
use crate::execution::{ExecContext, RowIter};
use crate::expression::{Expr, ExprTrait};
use crate::storage::tuple::Tuple;
use derive_new::new;

/// Evaluates one output column per projection expression.
#[derive(new)]
pub struct ProjectIter {
    exprs: Vec<Expr>,
    schema: SchemaRef,
    input: Box<dyn RowIter>,
}

impl RowIter for ProjectIter {
    fn next(&mut self, ctx: &ExecContext) -> FedSqlResult<Option<Tuple>> {
        let Some(tuple) = self.input.next(ctx)? else {
            return Ok(None);
        };
        let data = self
            .exprs
            .iter()
            .map(|e| e.evaluate(&tuple))
            .collect::<FedSqlResult<Vec<_>>>()?;
        Ok(Some(Tuple::new(self.schema.clone(), data)))
    }

    fn close(&mut self) -> FedSqlResult<()> {
        self.input.close()
    }
}
