use tracing::{debug, trace, warn};

use crate::builder::EngineBuilder;
use crate::config::{EngineConfig, NoFirePolicy};
use crate::dsl::Expr;
use crate::error::{EngineError, Result};
use crate::inputs::Inputs;
use crate::outputs::InferenceResult;
use crate::rules::{CompiledRule, Rule};
use crate::variable::{LinguisticVariable, Role, VariableKey, Variables};

/// A sealed Mamdani inference engine.
///
/// The engine is immutable: every evaluation reads the declarations and
/// allocates only its own scratch space, so a single engine can serve any
/// number of threads at once.
#[derive(Clone, Debug)]
pub struct Engine {
    config: EngineConfig,
    vars: Variables,
    inputs: Vec<VariableKey>,
    output: VariableKey,
    rules: Vec<CompiledRule>,
    /// Output universe samples
    universe: Vec<f64>,
    /// Each output set sampled over `universe`, by term index
    consequents: Vec<Vec<f64>>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub(crate) fn new(
        config: EngineConfig,
        vars: Variables,
        inputs: Vec<VariableKey>,
        output: VariableKey,
        rules: Vec<CompiledRule>,
    ) -> Self {
        let output_var = &vars.slots[output];
        let universe: Vec<f64> = output_var.universe().points().collect();
        let consequents = output_var
            .terms()
            .iter()
            .map(|set| universe.iter().map(|x| set.degree(*x)).collect())
            .collect();

        Self {
            config,
            vars,
            inputs,
            output,
            rules,
            universe,
            consequents,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.vars.get(name)
    }

    /// The input variables in declaration order.
    pub fn inputs(&self) -> impl ExactSizeIterator<Item = &LinguisticVariable> + '_ {
        self.inputs.iter().map(|key| &self.vars.slots[*key])
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.vars.slots[self.output]
    }

    /// The rule base in insertion order.
    pub fn rules(&self) -> impl ExactSizeIterator<Item = &Rule> + '_ {
        self.rules.iter().map(|rule| &rule.source)
    }

    /// Degree of every input's every set: `degrees[input][term]`.
    fn fuzzify(&self, inputs: &Inputs) -> Result<Vec<Vec<f64>>> {
        let undeclared = inputs
            .0
            .keys()
            .filter(|name| {
                self.vars
                    .get(name)
                    .map_or(true, |var| var.role() != Role::Input)
            })
            .min();

        if let Some(name) = undeclared {
            return Err(EngineError::UndeclaredInput { variable: name.clone() });
        }

        self.inputs()
            .map(|var| -> Result<Vec<f64>> {
                let value = inputs.get(var.name()).ok_or_else(|| EngineError::MissingInput {
                    variable: var.name().to_owned(),
                })?;

                if !value.is_finite() {
                    return Err(EngineError::NonFiniteInput {
                        variable: var.name().to_owned(),
                        value,
                    });
                }

                if !var.universe().contains(value) {
                    debug!(variable = var.name(), value, "input lies outside its universe");
                }

                Ok(var.terms().iter().map(|set| set.degree(value)).collect())
            })
            .collect()
    }

    /// Firing strength of an arbitrary antecedent for `inputs`.
    ///
    /// Unlike [`evaluate`](Self::evaluate) only the inputs the expression
    /// mentions need values.
    pub fn strength(&self, expr: &Expr, inputs: &Inputs) -> Result<f64> {
        let EngineConfig { and, or, .. } = self.config;

        Ok(match expr {
            Expr::Is { variable, term } => {
                let undeclared = || EngineError::UndeclaredInput {
                    variable: variable.clone(),
                };
                let var = self
                    .vars
                    .get(variable)
                    .filter(|var| var.role() == Role::Input)
                    .ok_or_else(undeclared)?;
                let value = inputs.get(variable).ok_or_else(undeclared)?;

                var.fuzzify(term, value)?
            },
            Expr::And(lhs, rhs) => and.call(self.strength(lhs, inputs)?, self.strength(rhs, inputs)?),
            Expr::Or(lhs, rhs) => or.call(self.strength(lhs, inputs)?, self.strength(rhs, inputs)?),
            Expr::Not(expr) => 1. - self.strength(expr, inputs)?,
        })
    }

    /// Runs one inference pass: fuzzification, rule firing, implication,
    /// aggregation over the output universe and defuzzification.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<InferenceResult> {
        let EngineConfig {
            and,
            or,
            implication,
            aggregation,
            defuzzification,
            no_fire,
        } = self.config;
        let degrees = self.fuzzify(inputs)?;
        let strengths: Vec<f64> = self
            .rules
            .iter()
            .map(|rule| rule.premise.strength(&degrees, and, or))
            .collect();
        let mut aggregated = vec![0.; self.universe.len()];

        for (i, (rule, &strength)) in self.rules.iter().zip(&strengths).enumerate() {
            trace!(rule = i, strength, "rule strength");

            // A rule that does not fire adds nothing to the union
            if strength == 0. {
                continue;
            }

            let consequent = &self.consequents[rule.consequent];

            for (agg, &membership) in aggregated.iter_mut().zip(consequent) {
                *agg = aggregation.call(*agg, implication.call(strength, membership));
            }
        }

        let (crisp, fallback) = match defuzzification.call(&self.universe, &aggregated) {
            Some(crisp) => (crisp, false),
            None => match no_fire {
                NoFirePolicy::Error => return Err(EngineError::NoRuleFired),
                NoFirePolicy::Constant(value) => {
                    warn!(value, "no rule fired; using constant fallback");
                    (value, true)
                },
                NoFirePolicy::UniverseMidpoint => {
                    let value = self.output().universe().midpoint();

                    warn!(value, "no rule fired; using output universe midpoint");
                    (value, true)
                },
            },
        };
        let profile = self.universe.iter().copied().zip(aggregated).collect();

        Ok(InferenceResult::new(crisp, profile, strengths, fallback))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::ops::{DefuzzificationOp, ImplicationOp};
    use crate::terms::{MembershipFn, Terms};
    use crate::variable::Universe;

    // Loan approval: three breakpoint-defined inputs against one output. The tests
    // pin rule strengths, clipped and scaled profiles, input errors and the no-fire fallbacks
    fn bank_loan(config: EngineConfig) -> Engine {
        let mut score_terms = Terms::new();
        let mut ratio_terms = Terms::new();
        let mut credit_terms = Terms::new();
        let mut decision_terms = Terms::new();
        let points = |p: &[(f64, f64)]| MembershipFn::points(p.to_vec()).unwrap();

        score_terms.insert("high", points(&[(175.0, 0.0), (180., 0.2), (185., 0.7), (190., 1.)]));
        score_terms.insert(
            "low",
            points(&[(155.0, 1.0), (160., 0.8), (165., 0.5), (170., 0.2), (175., 0.)]),
        );
        ratio_terms.insert("good", points(&[(0.3, 1.0), (0.4, 0.7), (0.41, 0.3), (0.42, 0.)]));
        ratio_terms.insert("bad", points(&[(0.44, 0.), (0.45, 0.3), (0.5, 0.7), (0.7, 1.)]));
        credit_terms.insert("good", points(&[(2.0, 1.0), (3., 0.7), (4., 0.3), (5., 0.)]));
        credit_terms.insert("bad", points(&[(5., 0.), (6., 0.3), (7., 0.7), (8., 1.)]));
        decision_terms.insert("approve", points(&[(5.0, 0.0), (6., 0.3), (7., 0.7), (8., 1.)]));
        decision_terms.insert("reject", points(&[(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]));

        let mut builder = EngineBuilder::with_config(config);
        let score = builder
            .add_input_with("score", Universe::with_step(150. ..=200., 0.1).unwrap(), score_terms)
            .unwrap();
        let ratio = builder
            .add_input_with("ratio", Universe::with_step(0.1..=1., 0.1).unwrap(), ratio_terms)
            .unwrap();
        let credit = builder
            .add_input_with("credit", Universe::with_step(0. ..=10., 0.1).unwrap(), credit_terms)
            .unwrap();
        let decision = builder
            .add_output_with("decision", Universe::with_step(0. ..=10., 0.1).unwrap(), decision_terms)
            .unwrap();

        builder
            .add_rule(Rule::new(
                score.is("high").and2(ratio.is("good"), credit.is("good")),
                decision.then("approve"),
            ))
            .unwrap();
        builder
            .add_rule(Rule::new(
                score.is("low").and(ratio.is("bad")).or(credit.is("bad")),
                decision.then("reject"),
            ))
            .unwrap();
        builder.seal().unwrap()
    }

    fn applicant(score: f64, ratio: f64, credit: f64) -> Inputs {
        Inputs::new()
            .with("score", score)
            .with("ratio", ratio)
            .with("credit", credit)
    }

    #[test]
    fn test_bank_loan() {
        let engine = bank_loan(EngineConfig::default());
        let result = engine.evaluate(&applicant(190., 0.39, 1.5)).unwrap();

        // score high = 1, ratio good = 0.73, credit good = 1
        assert_abs_diff_eq!(result.firing_strengths()[0], 0.73, epsilon = 1e-9);
        assert_eq!(result.firing_strengths()[1], 0.);
        assert_eq!(result.fired_rules().map(|(i, _)| i).collect::<Vec<_>>(), vec![0]);
        assert!(result.crisp() > 7.);
        assert!(!result.is_fallback());
        assert_eq!(result.profile().len(), 101);
    }

    #[test]
    fn test_profile_is_clipped_consequent() {
        let engine = bank_loan(EngineConfig::default());
        let result = engine.evaluate(&applicant(190., 0.39, 1.5)).unwrap();
        let approve = engine.output().term("approve").unwrap();

        for &(x, degree) in result.profile() {
            assert_eq!(degree, f64::min(result.firing_strengths()[0], approve.degree(x)));
        }
    }

    #[test]
    fn test_larsen_scales_instead_of_clipping() {
        let config = EngineConfig {
            implication: ImplicationOp::Prod,
            ..EngineConfig::default()
        };
        let engine = bank_loan(config);
        let result = engine.evaluate(&applicant(190., 0.39, 1.5)).unwrap();
        let peak = result.profile().iter().map(|(_, m)| *m).fold(0., f64::max);

        assert_abs_diff_eq!(peak, 0.73, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_and_undeclared_inputs() {
        let engine = bank_loan(EngineConfig::default());
        let mut inputs = applicant(190., 0.39, 1.5);

        inputs.remove("ratio");

        assert_eq!(
            engine.evaluate(&inputs).unwrap_err(),
            EngineError::MissingInput {
                variable: "ratio".into()
            }
        );

        let inputs = applicant(190., 0.39, 1.5).with("decision", 5.);

        assert_eq!(
            engine.evaluate(&inputs).unwrap_err(),
            EngineError::UndeclaredInput {
                variable: "decision".into()
            }
        );

        let inputs = applicant(f64::NAN, 0.39, 1.5);

        assert!(matches!(
            engine.evaluate(&inputs),
            Err(EngineError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn test_input_outside_universe_is_not_clamped() {
        let engine = bank_loan(EngineConfig::default());

        assert!(!engine.variable("ratio").unwrap().universe().contains(0.05));

        // `good` holds its first breakpoint degree below 0.3
        let result = engine.evaluate(&applicant(190., 0.05, 1.5)).unwrap();

        assert_eq!(result.firing_strengths()[0], 1.);
    }

    #[test]
    fn test_no_rule_fired_policies() {
        // score between the sets, ratio between the sets, credit good is zero at 5
        let inputs = applicant(175., 0.43, 5.);

        assert_eq!(
            bank_loan(EngineConfig::default()).evaluate(&inputs).unwrap_err(),
            EngineError::NoRuleFired
        );

        let result = bank_loan(EngineConfig::default().with_no_fire(NoFirePolicy::Constant(0.)))
            .evaluate(&inputs)
            .unwrap();

        assert_eq!(result.crisp(), 0.);
        assert!(result.is_fallback());
        assert!(result.profile().iter().all(|(_, m)| *m == 0.));

        let result = bank_loan(EngineConfig::default().with_no_fire(NoFirePolicy::UniverseMidpoint))
            .evaluate(&inputs)
            .unwrap();

        assert_eq!(result.crisp(), 5.);
    }

    #[test]
    fn test_strength_of_free_expression() {
        let engine = bank_loan(EngineConfig::default());
        let inputs = Inputs::new().with("credit", 1.5);

        assert_eq!(engine.strength(&Expr::is("credit", "good"), &inputs).unwrap(), 1.);
        assert_eq!(engine.strength(&!Expr::is("credit", "good"), &inputs).unwrap(), 0.);
        assert_eq!(
            engine.strength(&Expr::is("score", "high"), &inputs).unwrap_err(),
            EngineError::UndeclaredInput {
                variable: "score".into()
            }
        );
        assert_eq!(
            engine.strength(&Expr::is("credit", "fair"), &inputs).unwrap_err(),
            EngineError::UnknownSetLabel {
                variable: "credit".into(),
                label: "fair".into(),
            }
        );
    }

    #[test]
    fn test_maximum_methods_land_on_plateau() {
        // Only `approve` fires, so the clipped profile is a plateau ending at 10
        for op in [DefuzzificationOp::SmallestOfMaximum, DefuzzificationOp::LargestOfMaximum] {
            let engine = bank_loan(EngineConfig::default().with_defuzzification(op));
            let crisp = engine.evaluate(&applicant(190., 0.39, 1.5)).unwrap().crisp();

            assert!((7. ..=10.).contains(&crisp), "{op:?} gave {crisp}");
        }
    }
}
