pub mod backend;
pub mod tuple;

pub use backend::{Backend, BackendScan, BackendTable, InstanceOfTable, TypeUniverse};
pub use tuple::Tuple;
