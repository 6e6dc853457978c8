use crate::catalog::{ScanHandle, SchemaRef, SourceTable};
use crate::error::FedSqlResult;
use crate::execution::{ExecContext, RowIter};
use crate::storage::tuple::Tuple;
use std::sync::Arc;

/// Reads a table's backend scan and wraps each row in a tuple qualified with
/// the table's synthetic name.
pub struct ScanIter {
    table: Arc<SourceTable>,
    schema: SchemaRef,
    handle: Arc<ScanHandle>,
}

impl ScanIter {
    pub fn open(table: Arc<SourceTable>, ctx: &ExecContext) -> FedSqlResult<Self> {
        let handle = table.start_scan(ctx)?;
        let schema = table.schema();
        Ok(ScanIter {
            table,
            schema,
            handle,
        })
    }
}

impl RowIter for ScanIter {
    fn next(&mut self, ctx: &ExecContext) -> FedSqlResult<Option<Tuple>> {
        ctx.check_interrupted()?;
        match self.handle.next()? {
            Some(values) => Ok(Some(Tuple::new(self.schema.clone(), values))),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> FedSqlResult<()> {
        let result = self.handle.close();
        self.table.release_scan(&self.handle);
        result
    }
}
