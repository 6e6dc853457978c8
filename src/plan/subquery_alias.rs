use crate::catalog::{Schema, SchemaRef};
use crate::plan::PlanNode;
use crate::utils::table_ref::TableReference;
use std::sync::Arc;

/// A derived table. Re-qualifies every output column with the alias name and
/// marks a boundary most rewrite rules do not cross on their own.
#[derive(Debug, Clone)]
pub struct SubqueryAlias {
    pub name: String,
    pub schema: SchemaRef,
    pub input: Arc<PlanNode>,
}

impl SubqueryAlias {
    pub fn new(name: impl Into<String>, input: Arc<PlanNode>) -> Self {
        let name = name.into();
        let relation = TableReference::bare(name.clone());
        let columns = input
            .schema()
            .columns
            .iter()
            .map(|col| {
                Arc::new(
                    col.as_ref()
                        .clone()
                        .with_relation(Some(relation.clone())),
                )
            })
            .collect();
        SubqueryAlias {
            name,
            schema: Arc::new(Schema { columns }),
            input,
        }
    }
}
