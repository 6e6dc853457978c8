//! The transient per-query catalog: synthetic table minting, the prepared
//! backend instances behind each plan leaf, and the at-most-one active scan
//! each table is allowed to hold.

use crate::catalog::{ColumnRef, Schema, SchemaRef};
use crate::config::PlannerConfig;
use crate::error::{FedSqlError, FedSqlResult};
use crate::execution::ExecContext;
use crate::expression::Expr;
use crate::storage::backend::{Backend, BackendScan, InstanceOfTable, TypeUniverse};
use crate::utils::scalar::ScalarValue;
use crate::utils::table_ref::TableReference;
use parking_lot::Mutex;
use sqlparser::ast::{
    Ident, ObjectName, Query, SetExpr, TableAlias as AstTableAlias, TableFactor,
};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Handle to one open backend scan. The handle outlives the scan: closing it
/// (directly, or by starting a replacement scan on the same table) clears the
/// inner state, so any reader still holding the handle observes end-of-data
/// rather than a stale cursor.
pub struct ScanHandle {
    state: Mutex<Option<Box<dyn BackendScan>>>,
}

impl ScanHandle {
    fn new(scan: Box<dyn BackendScan>) -> Self {
        ScanHandle {
            state: Mutex::new(Some(scan)),
        }
    }

    pub fn next(&self) -> FedSqlResult<Option<Vec<ScalarValue>>> {
        match self.state.lock().as_mut() {
            Some(scan) => scan.next(),
            None => Ok(None),
        }
    }

    pub fn get_value(
        &self,
        index: usize,
        universe: Option<&TypeUniverse>,
    ) -> FedSqlResult<ScalarValue> {
        match self.state.lock().as_ref() {
            Some(scan) => scan.get_value(index, universe),
            None => Err(FedSqlError::Execution(
                "Cannot read from a closed scan".to_string(),
            )),
        }
    }

    pub fn close(&self) -> FedSqlResult<()> {
        match self.state.lock().take() {
            Some(mut scan) => scan.close(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().is_none()
    }
}

/// A physical table occurrence within one query. Minted by [`DataSource`],
/// one per reference even when the same physical table appears twice.
pub struct SourceTable {
    name: String,
    origin: ObjectName,
    backend_schema: SchemaRef,
    qualified_schema: SchemaRef,
    index: OnceLock<HashMap<String, usize>>,
    hints: Mutex<Vec<Expr>>,
    instance: Mutex<Box<dyn InstanceOfTable>>,
    active: Mutex<Option<Arc<ScanHandle>>>,
}

impl SourceTable {
    pub fn new(
        name: String,
        origin: ObjectName,
        backend_schema: SchemaRef,
        instance: Box<dyn InstanceOfTable>,
    ) -> Self {
        let relation = TableReference::bare(name.clone());
        let qualified = Schema {
            columns: backend_schema
                .columns
                .iter()
                .map(|col| {
                    Arc::new(
                        col.as_ref()
                            .clone()
                            .with_relation(Some(relation.clone())),
                    )
                })
                .collect(),
        };
        SourceTable {
            name,
            origin,
            backend_schema,
            qualified_schema: Arc::new(qualified),
            index: OnceLock::new(),
            hints: Mutex::new(Vec::new()),
            instance: Mutex::new(instance),
            active: Mutex::new(None),
        }
    }

    /// The synthetic name this table is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table reference as written in the original statement.
    pub fn origin(&self) -> &ObjectName {
        &self.origin
    }

    /// Backend schema with every column tagged with the synthetic name.
    pub fn schema(&self) -> SchemaRef {
        self.qualified_schema.clone()
    }

    pub fn column(&self, index: usize) -> FedSqlResult<ColumnRef> {
        self.backend_schema.column_with_index(index)
    }

    /// Build the column name to index map. Idempotent.
    pub fn build_index(&self) {
        self.index.get_or_init(|| {
            self.backend_schema
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| (col.name.to_ascii_lowercase(), i))
                .collect()
        });
    }

    pub fn index_of(&self, column: &str) -> FedSqlResult<usize> {
        self.build_index();
        self.index
            .get()
            .and_then(|idx| idx.get(&column.to_ascii_lowercase()).copied())
            .ok_or_else(|| {
                FedSqlError::Plan(format!(
                    "Unknown column \"{}\" in table {}",
                    column, self.name
                ))
            })
    }

    /// Replace the harvested hint clauses.
    pub fn set_hints(&self, hints: Vec<Expr>) {
        *self.hints.lock() = hints;
    }

    pub fn hints(&self) -> Vec<Expr> {
        self.hints.lock().clone()
    }

    /// Hand the resolved hint clauses to the backend instance. Best-effort by
    /// contract; the instance may ignore every clause.
    pub fn apply_hints(&self) {
        let hints = self.hints.lock();
        self.instance.lock().set_hints(&hints);
    }

    pub fn supported_outputs(&self) -> Vec<TypeUniverse> {
        self.instance.lock().supported_outputs()
    }

    /// Open a backend scan, force-closing the previous one. A table holds at
    /// most one active scan.
    pub fn start_scan(&self, ctx: &ExecContext) -> FedSqlResult<Arc<ScanHandle>> {
        let mut active = self.active.lock();
        if let Some(prev) = active.take() {
            prev.close()?;
        }
        let scan = self.instance.lock().scan(ctx)?;
        let handle = Arc::new(ScanHandle::new(scan));
        *active = Some(handle.clone());
        Ok(handle)
    }

    /// Drop the active-scan back-reference if `handle` still owns it.
    pub fn release_scan(&self, handle: &Arc<ScanHandle>) {
        let mut active = self.active.lock();
        if let Some(current) = active.as_ref() {
            if Arc::ptr_eq(current, handle) {
                *active = None;
            }
        }
    }

    /// Read a value of the current row of this table's active scan. Fails
    /// when the table is not scanning.
    pub fn active_value(
        &self,
        index: usize,
        universe: Option<&TypeUniverse>,
    ) -> FedSqlResult<ScalarValue> {
        let active = self.active.lock();
        match active.as_ref() {
            Some(handle) => handle.get_value(index, universe),
            None => Err(FedSqlError::Execution(format!(
                "Table {} has no active scan",
                self.name
            ))),
        }
    }
}

impl std::fmt::Debug for SourceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceTable")
            .field("name", &self.name)
            .field("origin", &self.origin.to_string())
            .field("schema", &self.backend_schema)
            .field("hints", &self.hints.lock().len())
            .finish()
    }
}

/// Resolves parsed table references into prepared [`SourceTable`]s and keeps
/// the per-query registry the reference resolver consults. Reset before every
/// top-level query.
pub struct DataSource {
    backend: Arc<dyn Backend>,
    config: PlannerConfig,
    count: usize,
    default_namespace: String,
    tables: Vec<Arc<SourceTable>>,
}

impl DataSource {
    pub fn new(backend: Arc<dyn Backend>, config: PlannerConfig) -> Self {
        DataSource {
            backend,
            config,
            count: 0,
            default_namespace: String::new(),
            tables: Vec::new(),
        }
    }

    /// Clear the counter, default namespace and registry for a new query.
    pub fn reset(&mut self, default_namespace: &str) {
        self.count = 0;
        self.default_namespace = default_namespace.to_string();
        self.tables.clear();
    }

    /// Mint a synthetic name for `reference`, resolve it against the backend
    /// and register the prepared table.
    pub fn get_table(&mut self, reference: &ObjectName) -> FedSqlResult<Arc<SourceTable>> {
        self.count += 1;

        let (namespace, name) = self.split_reference(reference)?;
        let backend_table = self.backend.get_table(&namespace, &name)?;
        let schema = backend_table.schema();
        let instance = backend_table.prepare()?;

        let synthetic = format!("{}{}", self.config.table_name_prefix, self.count);
        let table = Arc::new(SourceTable::new(
            synthetic,
            reference.clone(),
            schema,
            instance,
        ));
        self.tables.push(table.clone());
        Ok(table)
    }

    pub fn table(&self, name: &str) -> Option<Arc<SourceTable>> {
        self.tables.iter().find(|t| t.name() == name).cloned()
    }

    pub fn tables(&self) -> &[Arc<SourceTable>] {
        &self.tables
    }

    fn split_reference(&self, reference: &ObjectName) -> FedSqlResult<(String, String)> {
        match reference.0.as_slice() {
            [name] => Ok((self.default_namespace.clone(), name.value.clone())),
            [namespace, name] => Ok((namespace.value.clone(), name.value.clone())),
            _ => Err(FedSqlError::NotSupport(format!(
                "Table reference {reference} has too many qualifiers"
            ))),
        }
    }

    /// Walk a parsed query and replace every physical table reference with a
    /// freshly minted synthetic name, installing the original name as alias
    /// when none is present. The rewritten statement can then be fed to the
    /// generic analyzer, which will bind columns against this registry.
    pub fn rewrite_statement(&mut self, query: &mut Query) -> FedSqlResult<()> {
        self.rewrite_query(query)
    }

    fn rewrite_query(&mut self, query: &mut Query) -> FedSqlResult<()> {
        if let Some(with) = query.with.as_mut() {
            for cte in with.cte_tables.iter_mut() {
                self.rewrite_query(&mut cte.query)?;
            }
        }
        self.rewrite_set_expr(&mut query.body)
    }

    fn rewrite_set_expr(&mut self, body: &mut SetExpr) -> FedSqlResult<()> {
        match body {
            SetExpr::Select(select) => {
                for table in select.from.iter_mut() {
                    self.rewrite_table_factor(&mut table.relation)?;
                    for join in table.joins.iter_mut() {
                        self.rewrite_table_factor(&mut join.relation)?;
                    }
                }
                Ok(())
            }
            SetExpr::Query(query) => self.rewrite_query(query),
            SetExpr::SetOperation { left, right, .. } => {
                self.rewrite_set_expr(left)?;
                self.rewrite_set_expr(right)
            }
            _ => Ok(()),
        }
    }

    fn rewrite_table_factor(&mut self, factor: &mut TableFactor) -> FedSqlResult<()> {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                let table = self.get_table(name)?;
                if alias.is_none() {
                    let original = name.0.last().cloned().ok_or_else(|| {
                        FedSqlError::Plan("Empty table reference".to_string())
                    })?;
                    *alias = Some(AstTableAlias {
                        name: original,
                        columns: vec![],
                    });
                }
                *name = ObjectName(vec![Ident::new(table.name())]);
                Ok(())
            }
            TableFactor::Derived { subquery, .. } => self.rewrite_query(subquery),
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => {
                self.rewrite_table_factor(&mut table_with_joins.relation)?;
                for join in table_with_joins.joins.iter_mut() {
                    self.rewrite_table_factor(&mut join.relation)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
