/// Per-planner configuration. One instance per client session; queries on the
/// same session share it.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Prefix for the synthetic names minted by [`crate::catalog::DataSource`].
    /// The counter suffix keeps self-joins from alias-colliding.
    pub table_name_prefix: String,
    /// Log the plan tree after each rewrite stage at debug level.
    pub trace_plan: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            table_name_prefix: "temp".to_string(),
            trace_plan: false,
        }
    }
}
