use std::mem;
use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::inference::Engine;
use crate::rules::{CompiledRule, Premise, Rule, Rules};
use crate::terms::{FuzzySet, MembershipFn, Terms};
use crate::variable::{LinguisticVariable, Role, Universe, Variable, VariableKey, Variables};

/// Declares the variables, fuzzy sets and rules of an [`Engine`].
///
/// Every declaration is validated as it is made. [`seal`](Self::seal) turns the
/// builder's contents into an immutable engine, after which the builder
/// rejects every further call with [`EngineError::EngineSealed`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    vars: Variables,
    inputs: Vec<VariableKey>,
    output: Option<VariableKey>,
    rules: Vec<CompiledRule>,
    sealed: bool,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            vars: Variables::new(),
            inputs: Vec::new(),
            output: None,
            rules: Vec::new(),
            sealed: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            Err(EngineError::EngineSealed)
        } else {
            Ok(())
        }
    }

    pub fn add_input(&mut self, name: &str, universe: Universe) -> Result<Variable> {
        self.add_input_with(name, universe, Terms::new())
    }

    /// Declares an input variable together with its fuzzy sets.
    pub fn add_input_with(&mut self, name: &str, universe: Universe, terms: Terms) -> Result<Variable> {
        let var = self.declare(name, Role::Input, universe, terms)?;

        self.inputs.push(var.key);

        Ok(var)
    }

    pub fn add_output(&mut self, name: &str, universe: Universe) -> Result<Variable> {
        self.add_output_with(name, universe, Terms::new())
    }

    /// Declares the output variable together with its fuzzy sets.
    pub fn add_output_with(&mut self, name: &str, universe: Universe, terms: Terms) -> Result<Variable> {
        self.ensure_open()?;

        if self.output.is_some() {
            return Err(EngineError::DuplicateOutput { name: name.to_owned() });
        }

        let var = self.declare(name, Role::Output, universe, terms)?;

        self.output = Some(var.key);

        Ok(var)
    }

    fn declare(&mut self, name: &str, role: Role, universe: Universe, terms: Terms) -> Result<Variable> {
        self.ensure_open()?;

        if self.vars.contains(name) {
            return Err(EngineError::DuplicateVariable { name: name.to_owned() });
        }

        universe.validate()?;

        // Build the variable completely before registering it, so a bad
        // term leaves no half-declared variable behind
        let mut var = LinguisticVariable::new(Arc::from(name), role, universe);

        for (label, membership) in terms.0.into_iter().map(FuzzySet::into_parts) {
            var.add_term(label, membership)?;
        }

        debug!(
            variable = name,
            ?role,
            samples = universe.samples(),
            terms = var.terms().len(),
            "declared variable"
        );

        self.vars.add(var)
    }

    /// Attaches a labeled fuzzy set to a declared variable.
    pub fn add_term(&mut self, var: &Variable, label: impl Into<String>, membership: MembershipFn) -> Result<()> {
        self.ensure_open()?;

        let label = label.into();
        let target = self
            .vars
            .get_mut(var.key)
            .filter(|target| target.name() == var.name())
            .ok_or_else(|| EngineError::UnknownVariable {
                name: var.name().to_owned(),
            })?;

        target.add_term(label, membership)?;

        debug!(variable = var.name(), terms = target.terms().len(), "attached fuzzy set");

        Ok(())
    }

    /// Adds a rule, resolving every name it mentions.
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        self.ensure_open()?;

        let output = self.output.map(|key| &self.vars.slots[key]);
        let Some(output) = output.filter(|output| output.name() == rule.consequent.variable) else {
            return Err(EngineError::UndeclaredOutput {
                variable: rule.consequent.variable,
            });
        };
        let consequent = output.term_index(&rule.consequent.term)?;
        let premise = Premise::compile(&rule.antecedent, &self.vars, &self.inputs)?;

        debug!(index = self.rules.len(), %rule, "added rule");

        self.rules.push(CompiledRule {
            source: rule,
            premise,
            consequent,
        });

        Ok(())
    }

    /// Adds every rule in order, stopping at the first invalid one.
    pub fn add_rules(&mut self, rules: Rules) -> Result<()> {
        for rule in rules.0 {
            self.add_rule(rule)?;
        }

        Ok(())
    }

    /// Freezes the declarations into an [`Engine`].
    ///
    /// A builder missing inputs, the output or rules stays open so the caller
    /// can complete it. A successful seal is final.
    pub fn seal(&mut self) -> Result<Engine> {
        self.ensure_open()?;

        if self.inputs.is_empty() {
            return Err(EngineError::NoInputs);
        }

        let Some(output) = self.output else {
            return Err(EngineError::MissingOutput);
        };

        if self.rules.is_empty() {
            return Err(EngineError::EmptyRuleBase);
        }

        self.sealed = true;

        debug!(
            variables = self.vars.len(),
            inputs = self.inputs.len(),
            rules = self.rules.len(),
            "sealed engine"
        );

        Ok(Engine::new(
            self.config,
            mem::take(&mut self.vars),
            mem::take(&mut self.inputs),
            output,
            mem::take(&mut self.rules),
        ))
    }
}
