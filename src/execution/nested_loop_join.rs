use crate::catalog::SchemaRef;
use crate::error::{FedSqlError, FedSqlResult};
use crate::execution::{ExecContext, RowIter};
use crate::expression::{Expr, ExprTrait};
use crate::plan::{Join, PlanNode};
use crate::storage::tuple::Tuple;
use std::sync::Arc;

/// Nested-loop join across two independently scanned subtrees. The left side
/// drives: for every driver row a fresh iterator of the driven subtree is
/// opened, so a `ForeignField` inside the driven side's backend query reads
/// the driver's current row through its table's active scan. The driven
/// iterator is closed after each driver row.
pub struct NestedLoopJoinIter {
    schema: SchemaRef,
    condition: Option<Expr>,
    driver: Box<dyn RowIter>,
    driven_plan: Arc<PlanNode>,
    prefix: Option<Tuple>,
    driven: Option<Box<dyn RowIter>>,
}

impl NestedLoopJoinIter {
    pub fn open(join: &Join, ctx: &ExecContext) -> FedSqlResult<Self> {
        let driver = join.left.row_iter(ctx)?;
        Ok(NestedLoopJoinIter {
            schema: join.schema.clone(),
            condition: join.condition.clone(),
            driver,
            driven_plan: join.right.clone(),
            prefix: None,
            driven: None,
        })
    }

    fn abort<T>(&mut self, err: FedSqlError) -> FedSqlResult<T> {
        let _ = self.driver.close();
        if let Some(mut driven) = self.driven.take() {
            let _ = driven.close();
        }
        Err(err)
    }
}

impl RowIter for NestedLoopJoinIter {
    fn next(&mut self, ctx: &ExecContext) -> FedSqlResult<Option<Tuple>> {
        loop {
            ctx.check_interrupted()?;

            if self.prefix.is_none() {
                let Some(row) = self.driver.next(ctx)? else {
                    return Ok(None);
                };
                self.prefix = Some(row);
                // The driver's scan is now positioned, so the driven side's
                // foreign references resolve against this row.
                match self.driven_plan.row_iter(ctx) {
                    Ok(iter) => self.driven = Some(iter),
                    Err(e) => return self.abort(e),
                }
            }

            let driven = self.driven.as_mut().ok_or_else(|| {
                FedSqlError::Internal("Join driven iterator missing".to_string())
            })?;
            match driven.next(ctx) {
                Ok(Some(right)) => {
                    let prefix = self.prefix.as_ref().ok_or_else(|| {
                        FedSqlError::Internal("Join driver row missing".to_string())
                    })?;
                    let mut data = prefix.data.clone();
                    data.extend(right.data);
                    let tuple = Tuple::new(self.schema.clone(), data);
                    if let Some(condition) = self.condition.clone() {
                        match condition.evaluate(&tuple).and_then(|v| v.as_boolean()) {
                            Ok(Some(true)) => return Ok(Some(tuple)),
                            Ok(_) => continue,
                            Err(e) => return self.abort(e),
                        }
                    }
                    return Ok(Some(tuple));
                }
                Ok(None) => {
                    let mut done = self.driven.take().ok_or_else(|| {
                        FedSqlError::Internal("Join driven iterator missing".to_string())
                    })?;
                    if let Err(e) = done.close() {
                        return self.abort(e);
                    }
                    self.prefix = None;
                }
                Err(e) => return self.abort(e),
            }
        }
    }

    fn close(&mut self) -> FedSqlResult<()> {
        let first = self.driver.close();
        let second = match self.driven.take() {
            Some(mut driven) => driven.close(),
            None => Ok(()),
        };
        first.and(second)
    }
}
