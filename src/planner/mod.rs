mod resolve;

pub use resolve::resolve_tables;

use crate::catalog::DataSource;
use crate::config::PlannerConfig;
use crate::error::FedSqlResult;
use crate::optimizer;
use crate::plan::PlanNode;
use std::sync::Arc;

/// Take an analyzed plan through the full rewrite pipeline, resolve the
/// harvested hint clauses against the catalog and dispatch them to every
/// backend instance. Returns the executable, hint-free plan.
pub fn process_plan(
    plan: Arc<PlanNode>,
    catalog: &DataSource,
    config: &PlannerConfig,
) -> FedSqlResult<Arc<PlanNode>> {
    let node = optimizer::optimize(plan, config.trace_plan)?;
    resolve_tables(catalog)?;
    for table in catalog.tables() {
        table.apply_hints();
    }
    Ok(node)
}
