use crate::error::FedSqlResult;
use crate::execution::{ExecContext, RowIter};
use crate::expression::{Expr, ExprTrait};
use crate::storage::tuple::Tuple;
use derive_new::new;

/// Emits only the input rows whose predicate evaluates to true. NULL counts
/// as not matched.
#[derive(new)]
pub struct FilterIter {
    predicate: Expr,
    input: Box<dyn RowIter>,
}

impl RowIter for FilterIter {
    fn next(&mut self, ctx: &ExecContext) -> FedSqlResult<Option<Tuple>> {
        loop {
            ctx.check_interrupted()?;
            let Some(tuple) = self.input.next(ctx)? else {
                return Ok(None);
            };
            if self.predicate.evaluate(&tuple)?.as_boolean()? == Some(true) {
                return Ok(Some(tuple));
            }
        }
    }

    fn close(&mut self) -> FedSqlResult<()> {
        self.input.close()
    }
}
