pub mod scalar;
pub mod table_ref;
