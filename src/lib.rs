pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod expression;
pub mod matcher;
pub mod optimizer;
pub mod plan;
pub mod planner;
pub mod storage;
pub mod utils;
