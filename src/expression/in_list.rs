use crate::catalog::{Column, DataType, Schema};
use crate::error::FedSqlResult;
use crate::expression::{Expr, ExprTrait};
use crate::storage::tuple::Tuple;
use crate::utils::scalar::ScalarValue;

/// IN () or NOT IN ()
#[derive(Clone, PartialEq, Debug)]
pub struct InList {
    pub expr: Box<Expr>,
    pub list: Vec<Expr>,
    pub negated: bool,
}

impl ExprTrait for InList {
    fn data_type(&self, _input_schema: &Schema) -> FedSqlResult<DataType> {
        Ok(DataType::Boolean)
    }

    fn nullable(&self, input_schema: &Schema) -> FedSqlResult<bool> {
        self.expr.nullable(input_schema)
    }

    fn evaluate(&self, tuple: &Tuple) -> FedSqlResult<ScalarValue> {
        let needle = self.expr.evaluate(tuple)?;
        if needle.is_null() {
            return Ok(ScalarValue::Boolean(None));
        }
        for candidate in self.list.iter() {
            if candidate.evaluate(tuple)? == needle {
                return Ok(ScalarValue::Boolean(Some(!self.negated)));
            }
        }
        Ok(ScalarValue::Boolean(Some(self.negated)))
    }

    fn to_column(&self, input_schema: &Schema) -> FedSqlResult<Column> {
        Ok(Column::new(
            format!("{self}"),
            self.data_type(input_schema)?,
            self.nullable(input_schema)?,
        ))
    }
}

impl std::fmt::Display for InList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let list = self
            .list
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if self.negated {
            write!(f, "{} NOT IN ({})", self.expr, list)
        } else {
            write!(f, "{} IN ({})", self.expr, list)
        }
    }
}
