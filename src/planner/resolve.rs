use crate::catalog::{DataSource, SourceTable};
use crate::error::{FedSqlError, FedSqlResult};
use crate::expression::{Expr, ForeignField, SelfField};
use std::sync::Arc;

/// Rewrite every table's harvested hint clauses: column references naming the
/// table itself become `SelfField`s at the local index, references naming
/// another registered table become `ForeignField`s wrapping that table, and
/// anything else is a plan error. All index maps are built before any clause
/// is rewritten; a `ForeignField` needs the remote table's map.
pub fn resolve_tables(catalog: &DataSource) -> FedSqlResult<()> {
    for table in catalog.tables() {
        table.build_index();
    }
    for table in catalog.tables() {
        let resolved = table
            .hints()
            .into_iter()
            .map(|clause| resolve_clause(clause, table, catalog))
            .collect::<FedSqlResult<Vec<_>>>()?;
        table.set_hints(resolved);
    }
    Ok(())
}

fn resolve_clause(
    clause: Expr,
    table: &Arc<SourceTable>,
    catalog: &DataSource,
) -> FedSqlResult<Expr> {
    clause.transform_up(&mut |e| {
        let Expr::Column(col) = &e else {
            return Ok(e);
        };
        let Some(relation) = col.relation.as_ref() else {
            return Err(FedSqlError::Plan(format!(
                "Unqualified column \"{}\" in hint clause",
                col.name
            )));
        };
        if relation.table() == table.name() {
            let index = table.index_of(&col.name)?;
            let column = table.column(index)?;
            Ok(Expr::SelfField(SelfField {
                name: col.name.clone(),
                index,
                data_type: column.data_type,
                nullable: column.nullable,
            }))
        } else if let Some(remote) = catalog.table(relation.table()) {
            let index = remote.index_of(&col.name)?;
            let column = remote.column(index)?;
            Ok(Expr::ForeignField(ForeignField {
                name: col.name.clone(),
                index,
                data_type: column.data_type,
                nullable: column.nullable,
                table: remote,
                universe: None,
            }))
        } else {
            Err(FedSqlError::Plan(format!(
                "Table not found \"{}\"",
                relation.table()
            )))
        }
    })
}
