use crate::catalog::{SchemaRef, EMPTY_SCHEMA_REF};
use crate::error::{FedSqlError, FedSqlResult};
use crate::utils::scalar::ScalarValue;
use crate::utils::table_ref::TableReference;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

pub static EMPTY_TUPLE: LazyLock<Tuple> = LazyLock::new(|| Tuple::empty(EMPTY_SCHEMA_REF.clone()));

#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub schema: SchemaRef,
    pub data: Vec<ScalarValue>,
}

impl Tuple {
    pub fn new(schema: SchemaRef, data: Vec<ScalarValue>) -> Self {
        debug_assert_eq!(schema.columns.len(), data.len());
        Self { schema, data }
    }

    pub fn empty(schema: SchemaRef) -> Self {
        let data = schema
            .columns
            .iter()
            .map(|col| ScalarValue::new_empty(col.data_type))
            .collect();
        Self::new(schema, data)
    }

    pub fn value(&self, index: usize) -> FedSqlResult<&ScalarValue> {
        self.data.get(index).ok_or(FedSqlError::Internal(format!(
            "Not found column data at {} in tuple: {:?}",
            index, self
        )))
    }

    pub fn value_by_name(
        &self,
        relation: Option<&TableReference>,
        name: &str,
    ) -> FedSqlResult<&ScalarValue> {
        let idx = self.schema.index_of(relation, name)?;
        self.value(idx)
    }
}

impl Display for Tuple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let values = self
            .data
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({values})")
    }
}
