//! Operator selection for the inference pipeline.
//!
//! The default configuration is classic Mamdani inference: `min` for AND,
//! `max` for OR, implication by clipping, aggregation by pointwise `max` and
//! centroid defuzzification.

use serde::{Deserialize, Serialize};

use crate::ops::{AggregationOp, AndOp, DefuzzificationOp, ImplicationOp, OrOp};

/// What to report when no rule fires for an input assignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoFirePolicy {
    /// Fail the pass with [`EngineError::NoRuleFired`](crate::EngineError::NoRuleFired)
    #[default]
    Error,
    /// Report this crisp value instead
    Constant(f64),
    /// Report the midpoint of the output universe
    UniverseMidpoint,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub and: AndOp,
    pub or: OrOp,
    pub implication: ImplicationOp,
    pub aggregation: AggregationOp,
    pub defuzzification: DefuzzificationOp,
    pub no_fire: NoFirePolicy,
}

impl EngineConfig {
    pub fn mamdani() -> Self {
        Self::default()
    }

    pub fn with_defuzzification(mut self, defuzzification: DefuzzificationOp) -> Self {
        self.defuzzification = defuzzification;
        self
    }

    pub fn with_no_fire(mut self, no_fire: NoFirePolicy) -> Self {
        self.no_fire = no_fire;
        self
    }
}
