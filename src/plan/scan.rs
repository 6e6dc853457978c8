use crate::catalog::SourceTable;
use std::sync::Arc;

/// Leaf node reading a registered table's rows from its backend.
#[derive(Debug, Clone)]
pub struct Scan {
    pub table: Arc<SourceTable>,
}
