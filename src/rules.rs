use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dsl::Expr;
use crate::error::{EngineError, Result};
use crate::ops::{AndOp, OrOp};
use crate::variable::{Variable, VariableKey, Variables};

/// The output fuzzy set a rule concludes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

impl Consequent {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for Consequent {
    fn from((variable, term): (V, L)) -> Self {
        Consequent::new(variable, term)
    }
}

/// `if antecedent then consequent`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub antecedent: Expr,
    pub consequent: Consequent,
}

impl Rule {
    pub fn new(antecedent: Expr, consequent: impl Into<Consequent>) -> Self {
        Self {
            antecedent,
            consequent: consequent.into(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "if {} then {} is {}",
            self.antecedent, self.consequent.variable, self.consequent.term
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Is { variable, term } => write!(f, "{variable} is {term}"),
            Expr::And(lhs, rhs) => write!(f, "({lhs} and {rhs})"),
            Expr::Or(lhs, rhs) => write!(f, "({lhs} or {rhs})"),
            Expr::Not(expr) => write!(f, "not {expr}"),
        }
    }
}

impl Variable {
    /// The consequent `self is term`, for output variables.
    pub fn then(&self, term: impl Into<String>) -> Consequent {
        Consequent::new(self.name(), term)
    }
}

/// An ordered rule base.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, antecedent: Expr, consequent: impl Into<Consequent>) {
        self.0.push(Rule::new(antecedent, consequent));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An antecedent with every name resolved to an input position and term index.
#[derive(Clone, Debug)]
pub(crate) enum Premise {
    Is { input: usize, term: usize },
    And(Box<Premise>, Box<Premise>),
    Or(Box<Premise>, Box<Premise>),
    Not(Box<Premise>),
}

impl Premise {
    pub(crate) fn compile(expr: &Expr, vars: &Variables, inputs: &[VariableKey]) -> Result<Self> {
        Ok(match expr {
            Expr::Is { variable, term } => {
                let key = vars.key(variable);
                let input = key
                    .and_then(|key| inputs.iter().position(|k| *k == key))
                    .ok_or_else(|| EngineError::UndeclaredInput {
                        variable: variable.clone(),
                    })?;
                let term = vars.slots[inputs[input]].term_index(term)?;

                Premise::Is { input, term }
            },
            Expr::And(lhs, rhs) => Premise::And(
                Box::new(Self::compile(lhs, vars, inputs)?),
                Box::new(Self::compile(rhs, vars, inputs)?),
            ),
            Expr::Or(lhs, rhs) => Premise::Or(
                Box::new(Self::compile(lhs, vars, inputs)?),
                Box::new(Self::compile(rhs, vars, inputs)?),
            ),
            Expr::Not(expr) => Premise::Not(Box::new(Self::compile(expr, vars, inputs)?)),
        })
    }

    /// Firing strength given `degrees[input][term]`.
    pub(crate) fn strength(&self, degrees: &[Vec<f64>], and_op: AndOp, or_op: OrOp) -> f64 {
        match self {
            Premise::Is { input, term } => degrees[*input][*term],
            Premise::And(lhs, rhs) => and_op.call(
                lhs.strength(degrees, and_op, or_op),
                rhs.strength(degrees, and_op, or_op),
            ),
            Premise::Or(lhs, rhs) => or_op.call(
                lhs.strength(degrees, and_op, or_op),
                rhs.strength(degrees, and_op, or_op),
            ),
            Premise::Not(expr) => 1. - expr.strength(degrees, and_op, or_op),
        }
    }
}

/// A rule resolved against the engine's variables.
#[derive(Clone, Debug)]
pub(crate) struct CompiledRule {
    pub(crate) source: Rule,
    pub(crate) premise: Premise,
    /// Index of the concluded set on the output variable
    pub(crate) consequent: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let rule = Rule::new(
            Expr::is("intensity", "high").and(!Expr::is("demand", "low")),
            ("usage", "high"),
        );

        assert_eq!(
            rule.to_string(),
            "if (intensity is high and not demand is low) then usage is high"
        );
    }

    #[test]
    fn test_strength_uses_operators() {
        let premise = Premise::Or(
            Box::new(Premise::And(
                Box::new(Premise::Is { input: 0, term: 0 }),
                Box::new(Premise::Is { input: 1, term: 1 }),
            )),
            Box::new(Premise::Not(Box::new(Premise::Is { input: 0, term: 1 }))),
        );
        let degrees = vec![vec![0.5, 0.75], vec![0., 0.5]];

        // max(min(0.5, 0.5), 1 - 0.75)
        assert_eq!(premise.strength(&degrees, AndOp::Min, OrOp::Max), 0.5);
        // probor(0.5 * 0.5, 0.25)
        assert_eq!(premise.strength(&degrees, AndOp::Prod, OrOp::ProbOr), 0.4375);
    }
}
