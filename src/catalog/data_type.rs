use crate::error::{FedSqlError, FedSqlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float64,
    Varchar,
    /// Opaque backend-native representation; see `ScalarValue::Native`.
    /// Never appears in a table schema.
    Native,
}

impl DataType {
    /// Coerce `l` and `r` to a common type for the purposes of a comparison.
    pub fn comparison_coercion(l: &DataType, r: &DataType) -> FedSqlResult<DataType> {
        use DataType::*;
        if l == r && *l != Native {
            return Ok(*l);
        }
        match (l, r) {
            (Float64, Int32) | (Float64, Int64) | (Int32, Float64) | (Int64, Float64) => {
                Ok(Float64)
            }
            (Int64, Int32) | (Int32, Int64) => Ok(Int64),
            _ => Err(FedSqlError::NotSupport(format!(
                "Cannot coerce {l} and {r} for comparison"
            ))),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
