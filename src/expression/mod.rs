mod alias;
mod binary;
mod column;
mod field;
mod in_list;
mod literal;

pub use alias::Alias;
pub use binary::{BinaryExpr, BinaryOp};
pub use column::ColumnExpr;
pub use field::{ForeignField, SelfField};
pub use in_list::InList;
pub use literal::Literal;

use crate::catalog::{Column, DataType, Schema};
use crate::error::FedSqlResult;
use crate::storage::tuple::Tuple;
use crate::utils::scalar::ScalarValue;

pub trait ExprTrait {
    /// Get the data type of this expression, given the schema of the input
    fn data_type(&self, input_schema: &Schema) -> FedSqlResult<DataType>;

    /// Determine whether this expression is nullable, given the schema of the input
    fn nullable(&self, input_schema: &Schema) -> FedSqlResult<bool>;

    /// Evaluate an expression against a Tuple
    fn evaluate(&self, tuple: &Tuple) -> FedSqlResult<ScalarValue>;

    /// convert to a column with respect to a schema
    fn to_column(&self, input_schema: &Schema) -> FedSqlResult<Column>;
}

#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    /// An expression with an assigned name
    Alias(Alias),
    /// A binary expression such as "age > 21"
    Binary(BinaryExpr),
    /// A named reference to a qualified column
    Column(ColumnExpr),
    /// A constant value
    Literal(Literal),
    /// IN () or NOT IN ()
    InList(InList),
    /// A column of the table a clause was dispatched to. Only valid inside
    /// hint clauses; evaluating one is an error.
    SelfField(SelfField),
    /// A column of another registered table, read from that table's active
    /// scan at evaluation time.
    ForeignField(ForeignField),
}

impl ExprTrait for Expr {
    fn data_type(&self, input_schema: &Schema) -> FedSqlResult<DataType> {
        match self {
            Expr::Alias(e) => e.data_type(input_schema),
            Expr::Binary(e) => e.data_type(input_schema),
            Expr::Column(e) => e.data_type(input_schema),
            Expr::Literal(e) => e.data_type(input_schema),
            Expr::InList(e) => e.data_type(input_schema),
            Expr::SelfField(e) => e.data_type(input_schema),
            Expr::ForeignField(e) => e.data_type(input_schema),
        }
    }

    fn nullable(&self, input_schema: &Schema) -> FedSqlResult<bool> {
        match self {
            Expr::Alias(e) => e.nullable(input_schema),
            Expr::Binary(e) => e.nullable(input_schema),
            Expr::Column(e) => e.nullable(input_schema),
            Expr::Literal(e) => e.nullable(input_schema),
            Expr::InList(e) => e.nullable(input_schema),
            Expr::SelfField(e) => e.nullable(input_schema),
            Expr::ForeignField(e) => e.nullable(input_schema),
        }
    }

    fn evaluate(&self, tuple: &Tuple) -> FedSqlResult<ScalarValue> {
        match self {
            Expr::Alias(e) => e.evaluate(tuple),
            Expr::Binary(e) => e.evaluate(tuple),
            Expr::Column(e) => e.evaluate(tuple),
            Expr::Literal(e) => e.evaluate(tuple),
            Expr::InList(e) => e.evaluate(tuple),
            Expr::SelfField(e) => e.evaluate(tuple),
            Expr::ForeignField(e) => e.evaluate(tuple),
        }
    }

    fn to_column(&self, input_schema: &Schema) -> FedSqlResult<Column> {
        match self {
            Expr::Alias(e) => e.to_column(input_schema),
            Expr::Binary(e) => e.to_column(input_schema),
            Expr::Column(e) => e.to_column(input_schema),
            Expr::Literal(e) => e.to_column(input_schema),
            Expr::InList(e) => e.to_column(input_schema),
            Expr::SelfField(e) => e.to_column(input_schema),
            Expr::ForeignField(e) => e.to_column(input_schema),
        }
    }
}

impl Expr {
    pub fn and(self, other: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            left: Box::new(self),
            op: BinaryOp::And,
            right: Box::new(other),
        })
    }

    pub fn or(self, other: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            left: Box::new(self),
            op: BinaryOp::Or,
            right: Box::new(other),
        })
    }

    pub fn eq(self, other: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            left: Box::new(self),
            op: BinaryOp::Eq,
            right: Box::new(other),
        })
    }

    /// Rebuild the expression bottom-up, applying `f` to every node after its
    /// children have been rewritten.
    pub fn transform_up<F>(self, f: &mut F) -> FedSqlResult<Expr>
    where
        F: FnMut(Expr) -> FedSqlResult<Expr>,
    {
        let rebuilt = match self {
            Expr::Alias(alias) => Expr::Alias(Alias {
                expr: Box::new(alias.expr.transform_up(f)?),
                name: alias.name,
            }),
            Expr::Binary(binary) => Expr::Binary(BinaryExpr {
                left: Box::new(binary.left.transform_up(f)?),
                op: binary.op,
                right: Box::new(binary.right.transform_up(f)?),
            }),
            Expr::InList(in_list) => Expr::InList(InList {
                expr: Box::new(in_list.expr.transform_up(f)?),
                list: in_list
                    .list
                    .into_iter()
                    .map(|e| e.transform_up(f))
                    .collect::<FedSqlResult<Vec<_>>>()?,
                negated: in_list.negated,
            }),
            leaf @ (Expr::Column(_)
            | Expr::Literal(_)
            | Expr::SelfField(_)
            | Expr::ForeignField(_)) => leaf,
        };
        f(rebuilt)
    }

    /// Visit every node of the expression top-down.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Expr),
    {
        f(self);
        match self {
            Expr::Alias(alias) => alias.expr.walk(f),
            Expr::Binary(binary) => {
                binary.left.walk(f);
                binary.right.walk(f);
            }
            Expr::InList(in_list) => {
                in_list.expr.walk(f);
                for e in in_list.list.iter() {
                    e.walk(f);
                }
            }
            Expr::Column(_) | Expr::Literal(_) | Expr::SelfField(_) | Expr::ForeignField(_) => {}
        }
    }

    /// Whether any node of the expression satisfies `pred`.
    pub fn contains<F>(&self, pred: F) -> bool
    where
        F: Fn(&Expr) -> bool,
    {
        let mut found = false;
        self.walk(&mut |e| {
            if pred(e) {
                found = true;
            }
        });
        found
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Alias(e) => write!(f, "{e}"),
            Expr::Binary(e) => write!(f, "{e}"),
            Expr::Column(e) => write!(f, "{e}"),
            Expr::Literal(e) => write!(f, "{e}"),
            Expr::InList(e) => write!(f, "{e}"),
            Expr::SelfField(e) => write!(f, "{e}"),
            Expr::ForeignField(e) => write!(f, "{e}"),
        }
    }
}

/// Split a conjunctive expression into its AND-joined clauses.
pub fn split_conjunction(expr: &Expr) -> Vec<&Expr> {
    split_binary(expr, BinaryOp::And)
}

/// Split a disjunctive expression into its OR-joined clauses.
pub fn split_disjunction(expr: &Expr) -> Vec<&Expr> {
    split_binary(expr, BinaryOp::Or)
}

fn split_binary(expr: &Expr, op: BinaryOp) -> Vec<&Expr> {
    fn split_binary_impl<'a>(expr: &'a Expr, op: BinaryOp, acc: &mut Vec<&'a Expr>) {
        match expr {
            Expr::Binary(BinaryExpr { left, op: o, right }) if *o == op => {
                split_binary_impl(left, op, acc);
                split_binary_impl(right, op, acc);
            }
            other => acc.push(other),
        }
    }
    let mut acc = vec![];
    split_binary_impl(expr, op, &mut acc);
    acc
}

/// Fold clauses back into a left-deep AND chain. None for an empty slice.
pub fn conjunction(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    exprs.into_iter().reduce(Expr::and)
}
