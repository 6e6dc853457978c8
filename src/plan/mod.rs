mod filter;
mod hint;
mod join;
mod project;
mod scan;
mod subquery_alias;
mod table_alias;

pub use filter::Filter;
pub use hint::Hint;
pub use join::{Join, JoinType};
pub use project::Project;
pub use scan::Scan;
pub use subquery_alias::SubqueryAlias;
pub use table_alias::TableAlias;

use crate::catalog::SchemaRef;
use crate::error::FedSqlResult;
use std::collections::HashSet;
use std::sync::Arc;

/// A node of the logical plan tree. Nodes are immutable and shared; rewrites
/// rebuild the spine and reuse untouched subtrees.
#[derive(Debug)]
pub enum PlanNode {
    Filter(Filter),
    Project(Project),
    SubqueryAlias(SubqueryAlias),
    TableAlias(TableAlias),
    Join(Join),
    Hint(Hint),
    Scan(Scan),
}

impl PlanNode {
    pub fn schema(&self) -> SchemaRef {
        match self {
            PlanNode::Filter(f) => f.input.schema(),
            PlanNode::Project(p) => p.schema.clone(),
            PlanNode::SubqueryAlias(s) => s.schema.clone(),
            PlanNode::TableAlias(t) => t.input.schema(),
            PlanNode::Join(j) => j.schema.clone(),
            PlanNode::Hint(h) => h.input.schema(),
            PlanNode::Scan(s) => s.table.schema(),
        }
    }

    pub fn inputs(&self) -> Vec<&Arc<PlanNode>> {
        match self {
            PlanNode::Filter(f) => vec![&f.input],
            PlanNode::Project(p) => vec![&p.input],
            PlanNode::SubqueryAlias(s) => vec![&s.input],
            PlanNode::TableAlias(t) => vec![&t.input],
            PlanNode::Join(j) => vec![&j.left, &j.right],
            PlanNode::Hint(h) => vec![&h.input],
            PlanNode::Scan(_) => vec![],
        }
    }

    /// The synthetic table names a clause attached above this node may refer
    /// to. A scan exposes its own table; every other node exposes whatever
    /// relations its output schema carries.
    pub fn exposed_tables(&self) -> HashSet<String> {
        match self {
            PlanNode::Scan(s) => {
                let mut set = HashSet::new();
                set.insert(s.table.name().to_string());
                set
            }
            other => other
                .schema()
                .columns
                .iter()
                .filter_map(|col| col.relation.as_ref().map(|r| r.table().to_string()))
                .collect(),
        }
    }

    /// Rebuild the tree bottom-up, applying `f` to every node after its
    /// children have been rewritten. Subquery bodies are left untouched; a
    /// rule that wants to rewrite them wraps itself with
    /// [`crate::optimizer::transform_across_subqueries`].
    pub fn transform_up<F>(self: &Arc<Self>, f: &mut F) -> FedSqlResult<Arc<PlanNode>>
    where
        F: FnMut(Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>>,
    {
        let rebuilt = match self.as_ref() {
            PlanNode::Filter(filter) => Arc::new(PlanNode::Filter(Filter {
                predicate: filter.predicate.clone(),
                input: filter.input.transform_up(f)?,
            })),
            PlanNode::Project(project) => {
                let input = project.input.transform_up(f)?;
                Arc::new(PlanNode::Project(Project {
                    exprs: project.exprs.clone(),
                    schema: project.schema.clone(),
                    input,
                }))
            }
            PlanNode::TableAlias(alias) => Arc::new(PlanNode::TableAlias(TableAlias {
                name: alias.name.clone(),
                input: alias.input.transform_up(f)?,
            })),
            PlanNode::Join(join) => Arc::new(PlanNode::Join(Join {
                join_type: join.join_type,
                condition: join.condition.clone(),
                left: join.left.transform_up(f)?,
                right: join.right.transform_up(f)?,
                schema: join.schema.clone(),
            })),
            PlanNode::Hint(hint) => Arc::new(PlanNode::Hint(Hint {
                predicate: hint.predicate.clone(),
                input: hint.input.transform_up(f)?,
            })),
            PlanNode::SubqueryAlias(_) | PlanNode::Scan(_) => self.clone(),
        };
        f(rebuilt)
    }

    fn fmt_indent(&self, f: &mut std::fmt::Formatter<'_>, indent: usize) -> std::fmt::Result {
        for _ in 0..indent {
            write!(f, "  ")?;
        }
        match self {
            PlanNode::Filter(n) => writeln!(f, "Filter: {}", n.predicate)?,
            PlanNode::Project(n) => {
                let exprs = n
                    .exprs
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "Project: {exprs}")?
            }
            PlanNode::SubqueryAlias(n) => writeln!(f, "SubqueryAlias: {}", n.name)?,
            PlanNode::TableAlias(n) => writeln!(f, "TableAlias: {}", n.name)?,
            PlanNode::Join(n) => match n.condition.as_ref() {
                Some(cond) => writeln!(f, "{} Join: {}", n.join_type, cond)?,
                None => writeln!(f, "{} Join", n.join_type)?,
            },
            PlanNode::Hint(n) => writeln!(f, "Hint: {}", n.predicate)?,
            PlanNode::Scan(n) => writeln!(f, "Scan: {} ({})", n.table.name(), n.table.origin())?,
        }
        for child in self.inputs() {
            child.fmt_indent(f, indent + 1)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for PlanNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indent(f, 0)
    }
}
