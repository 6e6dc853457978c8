use crate::catalog::{Column, DataType, Schema, SourceTable};
use crate::error::{FedSqlError, FedSqlResult};
use crate::expression::ExprTrait;
use crate::storage::backend::TypeUniverse;
use crate::storage::tuple::Tuple;
use crate::utils::scalar::ScalarValue;
use std::sync::Arc;

/// A column of the table a hint clause was dispatched to, bound by position
/// in that table's backend schema. A backend compares it against rows of its
/// own scan; the generic engine never evaluates one.
#[derive(Clone, PartialEq, Debug)]
pub struct SelfField {
    pub name: String,
    pub index: usize,
    pub data_type: DataType,
    pub nullable: bool,
}

impl ExprTrait for SelfField {
    fn data_type(&self, _input_schema: &Schema) -> FedSqlResult<DataType> {
        Ok(self.data_type)
    }

    fn nullable(&self, _input_schema: &Schema) -> FedSqlResult<bool> {
        Ok(self.nullable)
    }

    fn evaluate(&self, _tuple: &Tuple) -> FedSqlResult<ScalarValue> {
        Err(FedSqlError::Execution(format!(
            "Field {} stands for the dispatched table's own column and has no value here",
            self.name
        )))
    }

    fn to_column(&self, _input_schema: &Schema) -> FedSqlResult<Column> {
        Ok(Column::new(self.name.clone(), self.data_type, self.nullable))
    }
}

impl std::fmt::Display for SelfField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "self.{}", self.name)
    }
}

/// A column of another registered table. Evaluation reads the current row of
/// that table's active scan, so the value tracks whatever row the outer
/// iteration is positioned on.
#[derive(Clone, Debug)]
pub struct ForeignField {
    pub name: String,
    pub index: usize,
    pub data_type: DataType,
    pub nullable: bool,
    pub table: Arc<SourceTable>,
    /// When set, the remote scan hands back its native representation for
    /// this universe instead of a converted scalar.
    pub universe: Option<TypeUniverse>,
}

impl ForeignField {
    pub fn with_universe(mut self, universe: TypeUniverse) -> Self {
        self.universe = Some(universe);
        self
    }
}

impl PartialEq for ForeignField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.index == other.index
            && Arc::ptr_eq(&self.table, &other.table)
            && self.universe == other.universe
    }
}

impl ExprTrait for ForeignField {
    fn data_type(&self, _input_schema: &Schema) -> FedSqlResult<DataType> {
        Ok(self.data_type)
    }

    fn nullable(&self, _input_schema: &Schema) -> FedSqlResult<bool> {
        Ok(self.nullable)
    }

    fn evaluate(&self, _tuple: &Tuple) -> FedSqlResult<ScalarValue> {
        self.table.active_value(self.index, self.universe.as_ref())
    }

    fn to_column(&self, _input_schema: &Schema) -> FedSqlResult<Column> {
        Ok(Column::new(self.name.clone(), self.data_type, self.nullable))
    }
}

impl std::fmt::Display for ForeignField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote({}).{}", self.table.name(), self.name)
    }
}
