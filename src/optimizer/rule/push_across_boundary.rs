use crate::error::FedSqlResult;
use crate::expression::{ColumnExpr, Expr};
use crate::plan::{Filter, PlanNode, Project, SubqueryAlias};
use std::sync::Arc;

/// Move a `Filter` through the boundary directly below it. Across a
/// `SubqueryAlias` the clause columns are renamed from the alias to the body
/// relation they stand for; across a `Project` they are substituted by the
/// (alias-cleared) projection expression they select. The filter re-appears
/// inside the boundary and the next pushdown round carries it further.
pub fn push_across_boundary(n: Arc<PlanNode>) -> FedSqlResult<Arc<PlanNode>> {
    let PlanNode::Filter(filter) = n.as_ref() else {
        return Ok(n);
    };

    match filter.input.as_ref() {
        PlanNode::SubqueryAlias(sq) => {
            let inner_schema = sq.input.schema();
            let predicate = filter.predicate.clone().transform_up(&mut |e| match e {
                Expr::Column(col) => {
                    let index = sq.schema.index_of(col.relation.as_ref(), &col.name)?;
                    let inner = inner_schema.column_with_index(index)?;
                    Ok(Expr::Column(ColumnExpr {
                        relation: inner.relation.clone(),
                        name: inner.name.clone(),
                    }))
                }
                other => Ok(other),
            })?;
            Ok(Arc::new(PlanNode::SubqueryAlias(SubqueryAlias::new(
                sq.name.clone(),
                Arc::new(PlanNode::Filter(Filter {
                    predicate,
                    input: sq.input.clone(),
                })),
            ))))
        }
        PlanNode::Project(project) => {
            let cleared = project
                .exprs
                .iter()
                .map(|e| clear_alias(e.clone()))
                .collect::<FedSqlResult<Vec<_>>>()?;
            let predicate = filter.predicate.clone().transform_up(&mut |e| match e {
                Expr::Column(col) => {
                    let index = project.schema.index_of(col.relation.as_ref(), &col.name)?;
                    Ok(cleared[index].clone())
                }
                other => Ok(other),
            })?;
            Ok(Arc::new(PlanNode::Project(Project {
                exprs: project.exprs.clone(),
                schema: project.schema.clone(),
                input: Arc::new(PlanNode::Filter(Filter {
                    predicate,
                    input: project.input.clone(),
                })),
            })))
        }
        _ => Ok(n),
    }
}

fn clear_alias(expr: Expr) -> FedSqlResult<Expr> {
    expr.transform_up(&mut |e| match e {
        Expr::Alias(alias) => Ok(*alias.expr),
        other => Ok(other),
    })
}
