/// Reference to a table, optionally qualified with its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableReference {
    /// An unqualified table name.
    Bare { table: String },
    /// A namespace-qualified table name.
    Partial { schema: String, table: String },
}

impl TableReference {
    pub fn bare(table: impl Into<String>) -> Self {
        TableReference::Bare {
            table: table.into(),
        }
    }

    pub fn partial(schema: impl Into<String>, table: impl Into<String>) -> Self {
        TableReference::Partial {
            schema: schema.into(),
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        match self {
            TableReference::Bare { table } => table,
            TableReference::Partial { table, .. } => table,
        }
    }

    pub fn schema(&self) -> Option<&str> {
        match self {
            TableReference::Bare { .. } => None,
            TableReference::Partial { schema, .. } => Some(schema),
        }
    }

    /// Whether two references resolve to the same table. A missing namespace
    /// qualifier matches any namespace.
    pub fn resolved_eq(&self, other: &Self) -> bool {
        if !self.table().eq_ignore_ascii_case(other.table()) {
            return false;
        }
        match (self.schema(), other.schema()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => true,
        }
    }
}

impl std::fmt::Display for TableReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableReference::Bare { table } => write!(f, "{table}"),
            TableReference::Partial { schema, table } => write!(f, "{schema}.{table}"),
        }
    }
}
