//! Mamdani fuzzy inference.
//!
//! An [`Engine`] is declared once through an [`EngineBuilder`] (input and
//! output variables, their fuzzy sets, and rules) and then sealed. A sealed
//! engine maps crisp inputs to a crisp output: inputs are fuzzified against
//! every set, each rule fires with the strength of its antecedent, the
//! consequent sets are clipped at those strengths and joined by pointwise
//! maximum over the sampled output universe, and the joined profile is
//! defuzzified by its centroid.
//!
//! ```
//! use fuzzy_mamdani::{EngineBuilder, Inputs, MembershipFn, Rule, Terms, Universe};
//!
//! # fn main() -> fuzzy_mamdani::Result<()> {
//! let shoulders = || -> fuzzy_mamdani::Result<Terms> {
//!     let mut terms = Terms::new();
//!     terms.insert("low", MembershipFn::triangular(0., 0., 100.)?);
//!     terms.insert("high", MembershipFn::triangular(0., 100., 100.)?);
//!     Ok(terms)
//! };
//!
//! let mut builder = EngineBuilder::new();
//! let load = builder.add_input_with("load", Universe::with_step(0. ..=100., 1.)?, shoulders()?)?;
//! let fan = builder.add_output_with("fan", Universe::with_step(0. ..=100., 1.)?, shoulders()?)?;
//!
//! builder.add_rule(Rule::new(load.is("low"), fan.then("low")))?;
//! builder.add_rule(Rule::new(load.is("high"), fan.then("high")))?;
//!
//! let engine = builder.seal()?;
//! let result = engine.evaluate(&Inputs::new().with("load", 80.))?;
//!
//! assert!(result.crisp() > 50.);
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod ops;
mod outputs;
mod rules;
mod session;
mod sweep;
mod terms;
mod variable;

pub use builder::EngineBuilder;
pub use config::{EngineConfig, NoFirePolicy};
pub use dsl::Expr;
pub use error::{EngineError, Result};
pub use inference::Engine;
pub use inputs::Inputs;
pub use linspace::Linspace;
pub use ops::{AggregationOp, AndOp, DefuzzificationOp, ImplicationOp, OrOp};
pub use outputs::InferenceResult;
pub use rules::{Consequent, Rule, Rules};
pub use session::Session;
pub use sweep::Surface;
pub use terms::{FuzzySet, MembershipFn, Terms};
pub use variable::{LinguisticVariable, Role, Universe, Variable, MAX_SAMPLES};
