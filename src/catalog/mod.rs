mod column;
mod data_type;
mod schema;
mod source;

pub use column::{Column, ColumnRef};
pub use data_type::DataType;
pub use schema::*;
pub use source::{DataSource, ScanHandle, SourceTable};

#[cfg(test)]
pub(crate) use source::test_util;
