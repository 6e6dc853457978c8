//! Contracts the planner requires from a storage backend. The backend owns
//! native scan execution and type conversion; the planner owns everything
//! above the row boundary.

use crate::catalog::SchemaRef;
use crate::error::FedSqlResult;
use crate::execution::ExecContext;
use crate::expression::Expr;
use crate::utils::scalar::ScalarValue;
use std::sync::Arc;

/// Identity tag for a backend's native value representation. Two universes
/// are interchangeable only when they are the same allocation; there is no
/// structural equality.
#[derive(Clone)]
pub struct TypeUniverse(Arc<UniverseTag>);

#[derive(Debug)]
struct UniverseTag {
    label: String,
}

impl TypeUniverse {
    pub fn new(label: impl Into<String>) -> Self {
        TypeUniverse(Arc::new(UniverseTag {
            label: label.into(),
        }))
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }
}

impl PartialEq for TypeUniverse {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TypeUniverse {}

impl std::hash::Hash for TypeUniverse {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state)
    }
}

impl std::fmt::Debug for TypeUniverse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeUniverse({})", self.0.label)
    }
}

impl std::fmt::Display for TypeUniverse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.label)
    }
}

/// Entry point into one storage backend.
pub trait Backend {
    fn get_table(&self, namespace: &str, name: &str) -> FedSqlResult<Box<dyn BackendTable>>;
}

/// A physical table as described by its backend.
pub trait BackendTable {
    fn schema(&self) -> SchemaRef;

    /// One instance per use of the table within a query. The instance's
    /// schema must match `schema()`.
    fn prepare(&self) -> FedSqlResult<Box<dyn InstanceOfTable>>;
}

/// A backend-prepared table instance, ready to accept hints and scan.
pub trait InstanceOfTable {
    /// The native value universes this instance can hand back without
    /// generic conversion.
    fn supported_outputs(&self) -> Vec<TypeUniverse>;

    /// Best-effort: turn hint clauses into native filtering. Must not fail
    /// the query; ignoring every clause is a valid implementation.
    fn set_hints(&mut self, clauses: &[Expr]);

    fn scan(&mut self, ctx: &ExecContext) -> FedSqlResult<Box<dyn BackendScan>>;
}

/// Forward row iterator over a native scan. `Ok(None)` signals normal
/// exhaustion; errors are fatal and not retried by the planner.
pub trait BackendScan {
    fn next(&mut self) -> FedSqlResult<Option<Vec<ScalarValue>>>;

    /// Value at `index` of the last produced row. With `None` the generic
    /// value; with a universe the scan supports, the raw native value.
    fn get_value(
        &self,
        index: usize,
        universe: Option<&TypeUniverse>,
    ) -> FedSqlResult<ScalarValue>;

    fn close(&mut self) -> FedSqlResult<()>;
}
