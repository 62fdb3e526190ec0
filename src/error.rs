//! Error types for engine construction and evaluation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Variable {variable} has no fuzzy set labeled '{label}'")]
    UnknownSetLabel { variable: String, label: String },
    #[error("Variable {variable} is not a declared input")]
    UndeclaredInput { variable: String },
    #[error("No crisp value supplied for input {variable}")]
    MissingInput { variable: String },
    #[error("Variable {name} is already declared")]
    DuplicateVariable { name: String },
    #[error("Variable {variable} already has a fuzzy set labeled '{label}'")]
    DuplicateSetLabel { variable: String, label: String },
    #[error("Invalid membership function parameters: {reason}")]
    InvalidShapeParameters { reason: String },
    #[error("Engine is sealed; no further variables or rules can be added")]
    EngineSealed,
    #[error("No rule fired for the supplied inputs")]
    NoRuleFired,
    #[error("Invalid universe: {reason}")]
    InvalidUniverse { reason: String },
    #[error("Variable {name} is not declared")]
    UnknownVariable { name: String },
    #[error("Rule consequent references {variable}, which is not the output variable")]
    UndeclaredOutput { variable: String },
    #[error("Output variable already declared; cannot add {name}")]
    DuplicateOutput { name: String },
    #[error("Engine has no output variable")]
    MissingOutput,
    #[error("Engine has no input variables")]
    NoInputs,
    #[error("Engine has no rules")]
    EmptyRuleBase,
    #[error("Crisp value {value} for input {variable} is not finite")]
    NonFiniteInput { variable: String, value: f64 },
    #[error("Surface axes must be two different inputs; got {variable} twice")]
    DuplicateAxis { variable: String },
}

impl EngineError {
    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShapeParameters { reason: reason.into() }
    }

    pub(crate) fn invalid_universe(reason: impl Into<String>) -> Self {
        Self::InvalidUniverse { reason: reason.into() }
    }

    /// True for the per-call failures of an evaluation pass. These never
    /// affect the engine and the caller may retry with corrected inputs.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. }
                | Self::UndeclaredInput { .. }
                | Self::NonFiniteInput { .. }
                | Self::NoRuleFired
                | Self::UnknownSetLabel { .. }
                | Self::DuplicateAxis { .. }
        )
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_errors() {
        assert!(EngineError::NoRuleFired.is_evaluation_error());
        assert!(EngineError::MissingInput {
            variable: "temperature".into()
        }
        .is_evaluation_error());
        assert!(EngineError::DuplicateAxis { variable: "x".into() }.is_evaluation_error());

        assert!(!EngineError::DuplicateVariable { name: "x".into() }.is_evaluation_error());
        assert!(!EngineError::EngineSealed.is_evaluation_error());
        assert!(!EngineError::invalid_universe("empty").is_evaluation_error());
    }

    #[test]
    fn test_messages_name_the_culprit() {
        assert_eq!(
            EngineError::DuplicateAxis { variable: "x".into() }.to_string(),
            "Surface axes must be two different inputs; got x twice"
        );
        assert_eq!(
            EngineError::invalid_shape("b < a").to_string(),
            "Invalid membership function parameters: b < a"
        );
    }
}
