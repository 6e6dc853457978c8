//! In-memory backend used by the integration tests. It exercises the whole
//! backend contract: schema exposure, hint dispatch through the matcher,
//! native-universe value passing and scan accounting.

use fedsql::catalog::{Column, DataType, Schema, SchemaRef};
use fedsql::error::{FedSqlError, FedSqlResult};
use fedsql::execution::ExecContext;
use fedsql::expression::{Expr, ExprTrait};
use fedsql::matcher::{collect_facts, Fact};
use fedsql::storage::backend::{
    Backend, BackendScan, BackendTable, InstanceOfTable, TypeUniverse,
};
use fedsql::storage::tuple::EMPTY_TUPLE;
use fedsql::utils::scalar::{NativeValue, ScalarValue};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-table counters the tests assert on.
#[derive(Debug, Default)]
pub struct TableStats {
    pub scans_opened: AtomicUsize,
    pub scans_closed: AtomicUsize,
    pub facts: Mutex<Vec<String>>,
}

impl TableStats {
    pub fn opened(&self) -> usize {
        self.scans_opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.scans_closed.load(Ordering::SeqCst)
    }

    pub fn facts(&self) -> Vec<String> {
        self.facts.lock().clone()
    }
}

#[derive(Clone)]
struct TableDef {
    schema: SchemaRef,
    rows: Vec<Vec<ScalarValue>>,
    stats: Arc<TableStats>,
}

pub struct MemBackend {
    universe: Option<TypeUniverse>,
    tables: Mutex<HashMap<(String, String), TableDef>>,
}

impl MemBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(MemBackend {
            universe: None,
            tables: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_universe(universe: TypeUniverse) -> Arc<Self> {
        Arc::new(MemBackend {
            universe: Some(universe),
            tables: Mutex::new(HashMap::new()),
        })
    }

    pub fn add_table(
        &self,
        namespace: &str,
        name: &str,
        columns: Vec<(&str, DataType)>,
        rows: Vec<Vec<ScalarValue>>,
    ) -> Arc<TableStats> {
        let schema = Arc::new(Schema::new(
            columns
                .into_iter()
                .map(|(n, t)| Column::new(n, t, true))
                .collect(),
        ));
        let stats = Arc::new(TableStats::default());
        self.tables.lock().insert(
            (namespace.to_string(), name.to_string()),
            TableDef {
                schema,
                rows,
                stats: stats.clone(),
            },
        );
        stats
    }
}

impl Backend for MemBackend {
    fn get_table(&self, namespace: &str, name: &str) -> FedSqlResult<Box<dyn BackendTable>> {
        let def = self
            .tables
            .lock()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| {
                FedSqlError::Plan(format!("Table not found: {namespace}.{name}"))
            })?;
        Ok(Box::new(MemTable {
            def,
            universe: self.universe.clone(),
        }))
    }
}

struct MemTable {
    def: TableDef,
    universe: Option<TypeUniverse>,
}

impl BackendTable for MemTable {
    fn schema(&self) -> SchemaRef {
        self.def.schema.clone()
    }

    fn prepare(&self) -> FedSqlResult<Box<dyn InstanceOfTable>> {
        Ok(Box::new(MemInstance {
            def: self.def.clone(),
            universe: self.universe.clone(),
            facts: Vec::new(),
        }))
    }
}

struct MemInstance {
    def: TableDef,
    universe: Option<TypeUniverse>,
    facts: Vec<Fact>,
}

impl MemInstance {
    fn index_of(&self, column: &str) -> Option<usize> {
        self.def
            .schema
            .columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(column))
    }

    /// Ask remote scans for their native representation whenever both sides
    /// speak the same universe.
    fn retag(&self, expr: Expr) -> Expr {
        let Some(universe) = self.universe.clone() else {
            return expr;
        };
        expr.transform_up(&mut |e| match e {
            Expr::ForeignField(ff) if ff.table.supported_outputs().contains(&universe) => {
                Ok(Expr::ForeignField(ff.with_universe(universe.clone())))
            }
            other => Ok(other),
        })
        .expect("retagging never fails")
    }

    fn param(expr: &Expr) -> FedSqlResult<ScalarValue> {
        let value = expr.evaluate(&EMPTY_TUPLE)?;
        match value {
            ScalarValue::Native(native) => native
                .downcast::<ScalarValue>()
                .cloned()
                .ok_or_else(|| FedSqlError::Execution("Foreign native value".to_string())),
            other => Ok(other),
        }
    }
}

impl InstanceOfTable for MemInstance {
    fn supported_outputs(&self) -> Vec<TypeUniverse> {
        self.universe.clone().into_iter().collect()
    }

    fn set_hints(&mut self, clauses: &[Expr]) {
        let facts = collect_facts(clauses);
        let mut recorded = self.def.stats.facts.lock();
        for fact in &facts {
            match fact {
                Fact::Equal(eq) => recorded.push(eq.to_string()),
                Fact::In(inn) => recorded.push(inn.to_string()),
            }
        }
        drop(recorded);
        self.facts = facts
            .into_iter()
            .map(|fact| match fact {
                Fact::Equal(mut eq) => {
                    eq.value = self.retag(eq.value);
                    Fact::Equal(eq)
                }
                Fact::In(mut inn) => {
                    inn.values = inn.values.drain(..).map(|v| self.retag(v)).collect();
                    Fact::In(inn)
                }
            })
            .collect();
    }

    fn scan(&mut self, _ctx: &ExecContext) -> FedSqlResult<Box<dyn BackendScan>> {
        let mut rows = self.def.rows.clone();
        // Facts whose value cannot be produced yet (a foreign reference to a
        // table that is not scanning) are skipped; the generic filter above
        // still re-checks every row.
        for fact in &self.facts {
            match fact {
                Fact::Equal(eq) => {
                    let Some(index) = self.index_of(&eq.column) else {
                        continue;
                    };
                    let Ok(wanted) = Self::param(&eq.value) else {
                        continue;
                    };
                    rows.retain(|row| row[index] == wanted);
                }
                Fact::In(inn) => {
                    let Some(index) = self.index_of(&inn.column) else {
                        continue;
                    };
                    let Ok(wanted) = inn
                        .values
                        .iter()
                        .map(Self::param)
                        .collect::<FedSqlResult<Vec<_>>>()
                    else {
                        continue;
                    };
                    rows.retain(|row| wanted.contains(&row[index]));
                }
            }
        }
        self.def.stats.scans_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemScan {
            rows,
            pos: 0,
            current: None,
            universe: self.universe.clone(),
            stats: self.def.stats.clone(),
        }))
    }
}

struct MemScan {
    rows: Vec<Vec<ScalarValue>>,
    pos: usize,
    current: Option<Vec<ScalarValue>>,
    universe: Option<TypeUniverse>,
    stats: Arc<TableStats>,
}

impl BackendScan for MemScan {
    fn next(&mut self) -> FedSqlResult<Option<Vec<ScalarValue>>> {
        if self.pos >= self.rows.len() {
            self.current = None;
            return Ok(None);
        }
        let row = self.rows[self.pos].clone();
        self.pos += 1;
        self.current = Some(row.clone());
        Ok(Some(row))
    }

    fn get_value(
        &self,
        index: usize,
        universe: Option<&TypeUniverse>,
    ) -> FedSqlResult<ScalarValue> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| FedSqlError::Execution("Scan not positioned on a row".to_string()))?;
        let value = row
            .get(index)
            .cloned()
            .ok_or_else(|| FedSqlError::Execution(format!("No column at index {index}")))?;
        match universe {
            None => Ok(value),
            Some(wanted) => {
                if self.universe.as_ref() == Some(wanted) {
                    Ok(ScalarValue::Native(NativeValue::new(
                        wanted.clone(),
                        Arc::new(value),
                    )))
                } else {
                    Err(FedSqlError::Execution(format!(
                        "Unsupported native universe {wanted}"
                    )))
                }
            }
        }
    }

    fn close(&mut self) -> FedSqlResult<()> {
        self.stats.scans_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
