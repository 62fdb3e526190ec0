use serde::{Deserialize, Serialize};

/// The outcome of one inference pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    crisp: f64,
    profile: Vec<(f64, f64)>,
    firing_strengths: Vec<f64>,
    fallback: bool,
}

impl InferenceResult {
    pub(crate) fn new(crisp: f64, profile: Vec<(f64, f64)>, firing_strengths: Vec<f64>, fallback: bool) -> Self {
        Self {
            crisp,
            profile,
            firing_strengths,
            fallback,
        }
    }

    /// The defuzzified output value.
    pub fn crisp(&self) -> f64 {
        self.crisp
    }

    /// The aggregated output membership as `(x, degree)` over the output universe.
    pub fn profile(&self) -> &[(f64, f64)] {
        &self.profile
    }

    /// Each rule's firing strength, in rule order.
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    /// Indices and strengths of the rules that fired at all.
    pub fn fired_rules(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.firing_strengths
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, strength)| *strength > 0.)
    }

    /// True if no rule fired and the crisp value came from the engine's
    /// [`NoFirePolicy`](crate::NoFirePolicy).
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}
