use crate::plan::PlanNode;
use std::sync::Arc;

/// A plain rename of a base table reference. Carries no schema change of its
/// own; the cleanup pass removes these before any pushdown runs.
#[derive(Debug, Clone)]
pub struct TableAlias {
    pub name: String,
    pub input: Arc<PlanNode>,
}
