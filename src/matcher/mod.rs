//! Pattern matching backends use to turn resolved hint clauses into native
//! filter facts. Matching is best-effort: a clause that fits no pattern is
//! simply ignored and left to generic re-evaluation.

use crate::expression::{split_disjunction, BinaryOp, Expr};

/// "column = value" where the value side carries no column of the matched
/// table itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Equal {
    pub column: String,
    pub value: Expr,
}

impl std::fmt::Display for Equal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{} eq {}}}", self.column, self.value)
    }
}

/// "column IN (values...)", possibly folded from an OR-chain of equalities.
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    pub column: String,
    pub values: Vec<Expr>,
}

impl std::fmt::Display for In {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{} in [{}]}}", self.column, values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fact {
    Equal(Equal),
    In(In),
}

impl Fact {
    pub fn column(&self) -> &str {
        match self {
            Fact::Equal(e) => &e.column,
            Fact::In(i) => &i.column,
        }
    }

    fn priority(&self) -> u8 {
        match self {
            Fact::Equal(_) => 2,
            Fact::In(_) => 1,
        }
    }
}

fn contains_self_field(expr: &Expr) -> bool {
    expr.contains(|e| matches!(e, Expr::SelfField(_)))
}

/// Match a binary equality with exactly one side a `SelfField` and the other
/// side free of `SelfField`s.
pub fn match_equal(expr: &Expr) -> Option<Equal> {
    let Expr::Binary(binary) = expr else {
        return None;
    };
    if binary.op != BinaryOp::Eq {
        return None;
    }
    if let Expr::SelfField(field) = binary.left.as_ref() {
        if contains_self_field(&binary.right) {
            return None;
        }
        return Some(Equal {
            column: field.name.clone(),
            value: binary.right.as_ref().clone(),
        });
    }
    if let Expr::SelfField(field) = binary.right.as_ref() {
        if contains_self_field(&binary.left) {
            return None;
        }
        return Some(Equal {
            column: field.name.clone(),
            value: binary.left.as_ref().clone(),
        });
    }
    None
}

/// Match a non-negated `SelfField IN (list)`, or an OR-chain of equalities
/// and INs that all name one single column, folded into one In fact. Branches
/// over mixed columns or of unrecognized shape fail the whole chain.
pub fn match_in(expr: &Expr) -> Option<In> {
    match expr {
        Expr::InList(in_list) if !in_list.negated => {
            let Expr::SelfField(field) = in_list.expr.as_ref() else {
                return None;
            };
            Some(In {
                column: field.name.clone(),
                values: in_list.list.clone(),
            })
        }
        Expr::Binary(binary) if binary.op == BinaryOp::Or => {
            let mut column: Option<String> = None;
            let mut values = Vec::new();
            for branch in split_disjunction(expr) {
                let (branch_column, branch_values) = if let Some(eq) = match_equal(branch) {
                    (eq.column, vec![eq.value])
                } else if let Some(inn) = match_in(branch) {
                    (inn.column, inn.values)
                } else {
                    return None;
                };
                match column.as_ref() {
                    Some(existing) if *existing != branch_column => return None,
                    Some(_) => {}
                    None => column = Some(branch_column),
                }
                values.extend(branch_values);
            }
            Some(In {
                column: column?,
                values,
            })
        }
        _ => None,
    }
}

/// Reduce a clause list to at most one fact per column: Equal beats In, and
/// the first find of a kind wins a tie. Unmatched clauses drop out silently.
/// Facts come back in first-encounter column order.
pub fn collect_facts(clauses: &[Expr]) -> Vec<Fact> {
    let mut facts: Vec<Fact> = Vec::new();
    for clause in clauses {
        let fact = if let Some(eq) = match_equal(clause) {
            Fact::Equal(eq)
        } else if let Some(inn) = match_in(clause) {
            Fact::In(inn)
        } else {
            continue;
        };
        match facts.iter_mut().find(|f| f.column() == fact.column()) {
            Some(existing) => {
                if fact.priority() > existing.priority() {
                    *existing = fact;
                }
            }
            None => facts.push(fact),
        }
    }
    facts
}
