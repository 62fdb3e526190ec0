use std::ops::Not;

use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// A rule antecedent: fuzzy propositions joined by AND / OR / NOT.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// `variable is term`
    Is { variable: String, term: String },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Expr::Is {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn and2(self, rhs: Expr, rhs2: Expr) -> Self {
        self.and(rhs).and(rhs2)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl Variable {
    pub fn is(&self, term: impl Into<String>) -> Expr {
        Expr::is(self.name(), term)
    }
}

#[test]
fn test_negated_disjunction_nests() {
    let expr = !Expr::is("temperature", "low").or(Expr::is("temperature", "high"));

    assert_eq!(
        expr,
        Expr::Not(Box::new(Expr::Or(
            Box::new(Expr::is("temperature", "low")),
            Box::new(Expr::is("temperature", "high")),
        )))
    );
}
