mod filter;
mod nested_loop_join;
mod project;
mod scan;

pub use filter::FilterIter;
pub use nested_loop_join::NestedLoopJoinIter;
pub use project::ProjectIter;
pub use scan::ScanIter;

use crate::catalog::SchemaRef;
use crate::error::{FedSqlError, FedSqlResult};
use crate::plan::PlanNode;
use crate::storage::tuple::Tuple;
use derive_new::new;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-query execution context. Today it only carries the interrupt flag;
/// iterators check it once per produced row.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    interrupt: Arc<AtomicBool>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    pub fn check_interrupted(&self) -> FedSqlResult<()> {
        if self.interrupt.load(Ordering::Relaxed) {
            Err(FedSqlError::Execution("Query interrupted".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Pull-based row iterator. `Ok(None)` signals normal exhaustion and is
/// never an error.
pub trait RowIter {
    fn next(&mut self, ctx: &ExecContext) -> FedSqlResult<Option<Tuple>>;
    fn close(&mut self) -> FedSqlResult<()>;
}

impl PlanNode {
    /// Build the iterator tree for an executable plan. Backend scans open
    /// eagerly; opening a second iterator over the same plan force-closes
    /// the scans of the first.
    pub fn row_iter(self: &Arc<Self>, ctx: &ExecContext) -> FedSqlResult<Box<dyn RowIter>> {
        match self.as_ref() {
            PlanNode::Scan(scan) => Ok(Box::new(ScanIter::open(scan.table.clone(), ctx)?)),
            PlanNode::Filter(filter) => Ok(Box::new(FilterIter::new(
                filter.predicate.clone(),
                filter.input.row_iter(ctx)?,
            ))),
            PlanNode::Project(project) => Ok(Box::new(ProjectIter::new(
                project.exprs.clone(),
                project.schema.clone(),
                project.input.row_iter(ctx)?,
            ))),
            PlanNode::SubqueryAlias(sq) => Ok(Box::new(RenameIter::new(
                sq.schema.clone(),
                sq.input.row_iter(ctx)?,
            ))),
            PlanNode::TableAlias(alias) => alias.input.row_iter(ctx),
            PlanNode::Hint(hint) => hint.input.row_iter(ctx),
            PlanNode::Join(join) => Ok(Box::new(NestedLoopJoinIter::open(join, ctx)?)),
        }
    }
}

/// Re-tags the child's rows with the alias schema of a `SubqueryAlias`.
#[derive(new)]
pub struct RenameIter {
    schema: SchemaRef,
    input: Box<dyn RowIter>,
}

impl RowIter for RenameIter {
    fn next(&mut self, ctx: &ExecContext) -> FedSqlResult<Option<Tuple>> {
        match self.input.next(ctx)? {
            Some(tuple) => Ok(Some(Tuple::new(self.schema.clone(), tuple.data))),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> FedSqlResult<()> {
        self.input.close()
    }
}
