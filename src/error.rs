use thiserror::Error;

pub type FedSqlResult<T, E = FedSqlError> = Result<T, E>;

#[derive(Debug, Error)]
pub enum FedSqlError {
    #[error("Not support: {0}")]
    NotSupport(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Plan error: {0}")]
    Plan(String),

    #[error("Execution error: {0}")]
    Execution(String),
}
