use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{EngineError, Result};
use crate::linspace::Linspace;
use crate::terms::{FuzzySet, MembershipFn};

// (4.999999999999999 / 1.) should still count as five whole steps
const STEP_EPSILON: f64 = 1e-9;

/// Upper bound on the samples of one universe; every output set is sampled
/// once per sample when the engine is sealed.
pub const MAX_SAMPLES: usize = 1 << 24;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Whether a variable feeds rule antecedents or receives rule consequents.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Input,
    Output,
}

/// A bounded universe of discourse and the number of samples taken over it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    min: f64,
    max: f64,
    samples: usize,
}

impl Universe {
    /// Samples `min..=max` every `step`, like `numpy.arange(min, max + step, step)`.
    pub fn with_step(range: RangeInclusive<f64>, step: f64) -> Result<Self> {
        let (min, max) = range.into_inner();

        if !(step.is_finite() && step > 0.) {
            return Err(EngineError::invalid_universe(format!("step {step} must be positive")));
        }

        Self::check_bounds(min, max)?;

        // Whole steps only, as numpy.arange counts them
        let samples = ((max - min) / step + STEP_EPSILON).floor() + 1.;

        if !(samples.is_finite() && samples <= MAX_SAMPLES as f64) {
            return Err(EngineError::invalid_universe(format!(
                "step {step} over [{min}, {max}] exceeds {MAX_SAMPLES} samples"
            )));
        }

        Self::with_samples(min..=max, samples as usize)
    }

    pub fn with_samples(range: RangeInclusive<f64>, samples: usize) -> Result<Self> {
        let (min, max) = range.into_inner();
        let this = Self { min, max, samples };

        this.validate()?;

        Ok(this)
    }

    /// Deserialized universes skip the constructors; the builder re-checks them here.
    pub(crate) fn validate(&self) -> Result<()> {
        Self::check_bounds(self.min, self.max)?;

        if self.samples < 2 {
            return Err(EngineError::invalid_universe(format!(
                "{} samples; at least two are required",
                self.samples
            )));
        }
        if self.samples > MAX_SAMPLES {
            return Err(EngineError::invalid_universe(format!(
                "{} samples; at most {MAX_SAMPLES} are allowed",
                self.samples
            )));
        }

        Ok(())
    }

    fn check_bounds(min: f64, max: f64) -> Result<()> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(EngineError::invalid_universe("bounds must be finite"));
        }
        if min >= max {
            return Err(EngineError::invalid_universe(format!(
                "lower bound {min} is not below upper bound {max}"
            )));
        }

        Ok(())
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn midpoint(&self) -> f64 {
        self.min + (self.max - self.min) / 2.
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// The ordered sample points `x1 < x2 < .. < xn`.
    pub fn points(&self) -> Linspace {
        Linspace::new(self.min, self.max, self.samples)
    }
}

/// A named universe with its labeled fuzzy sets.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: Arc<str>,
    role: Role,
    universe: Universe,
    terms: Vec<FuzzySet>,
}

impl LinguisticVariable {
    pub(crate) fn new(name: Arc<str>, role: Role, universe: Universe) -> Self {
        Self {
            name,
            role,
            universe,
            terms: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> &[FuzzySet] {
        &self.terms
    }

    pub fn term(&self, label: &str) -> Result<&FuzzySet> {
        self.term_index(label).map(|i| &self.terms[i])
    }

    pub(crate) fn term_index(&self, label: &str) -> Result<usize> {
        self.terms
            .iter()
            .position(|set| set.label() == label)
            .ok_or_else(|| EngineError::UnknownSetLabel {
                variable: self.name.to_string(),
                label: label.to_owned(),
            })
    }

    pub(crate) fn add_term(&mut self, label: String, membership: MembershipFn) -> Result<()> {
        membership.validate()?;

        if self.terms.iter().any(|set| set.label() == label) {
            return Err(EngineError::DuplicateSetLabel {
                variable: self.name.to_string(),
                label,
            });
        }

        // An output set must be nonzero at some sample
        if self.role == Role::Output && self.universe.points().all(|x| membership.degree(x) == 0.) {
            return Err(EngineError::invalid_shape(format!(
                "output set '{label}' of {} is zero at every sample of its universe",
                self.name
            )));
        }

        let (lo, hi) = membership.support();

        if hi < self.universe.min || lo > self.universe.max {
            tracing::warn!(
                variable = %self.name,
                %label,
                "fuzzy set support [{lo}, {hi}] lies entirely outside the universe"
            );
        }

        self.terms.push(FuzzySet::new(label, membership));

        Ok(())
    }

    /// Degree of `x` in the set named `label`.
    pub fn fuzzify(&self, label: &str, x: f64) -> Result<f64> {
        Ok(self.term(label)?.degree(x))
    }

    /// The set's `(x, degree)` profile across the universe. Without an explicit
    /// sample count the variable's own resolution is used.
    pub fn sample(&self, label: &str, samples: impl Into<Option<usize>>) -> Result<Vec<(f64, f64)>> {
        let set = self.term(label)?;
        let samples = samples.into().unwrap_or(self.universe.samples);
        let points = Linspace::new(self.universe.min, self.universe.max, samples);

        Ok(points.map(|x| (x, set.degree(x))).collect())
    }
}

/// A cheap handle to a declared variable, used to build rule expressions.
#[derive(Clone, Debug)]
pub struct Variable {
    pub(crate) key: VariableKey,
    pub(crate) name: Arc<str>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Declared variables, addressable by key or by name.
#[derive(Clone, Debug, Default)]
pub(crate) struct Variables {
    pub(crate) slots: SlotMap<VariableKey, LinguisticVariable>,
    names: HashMap<Arc<str>, VariableKey>,
}

impl Variables {
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            names: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, var: LinguisticVariable) -> Result<Variable> {
        if self.names.contains_key(var.name()) {
            return Err(EngineError::DuplicateVariable {
                name: var.name().to_owned(),
            });
        }

        let name = Arc::clone(&var.name);
        let key = self.slots.insert(var);

        self.names.insert(Arc::clone(&name), key);

        Ok(Variable { key, name })
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub(crate) fn key(&self, name: &str) -> Option<VariableKey> {
        self.names.get(name).copied()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&LinguisticVariable> {
        self.key(name).map(|key| &self.slots[key])
    }

    pub(crate) fn get_mut(&mut self, key: VariableKey) -> Option<&mut LinguisticVariable> {
        self.slots.get_mut(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}
