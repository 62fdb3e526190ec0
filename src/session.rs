use crate::error::Result;
use crate::inference::Engine;
use crate::inputs::Inputs;
use crate::outputs::InferenceResult;

/// One input assignment bound to an engine, keeping the result of the last pass.
///
/// Sessions are cheap; create one per caller or per thread and share the engine.
#[derive(Debug)]
pub struct Session<'e> {
    engine: &'e Engine,
    inputs: Inputs,
    last: Option<InferenceResult>,
}

impl<'e> Session<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self::with_inputs(engine, Inputs::new())
    }

    pub fn with_inputs(engine: &'e Engine, inputs: Inputs) -> Self {
        Self {
            engine,
            inputs,
            last: None,
        }
    }

    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    /// Sets one crisp input; the previous value, if any, is replaced.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.inputs.add(name, value);
        self
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Runs one pass over the current inputs.
    ///
    /// A failed pass clears the previous result, so introspection never shows
    /// data from an older assignment.
    pub fn evaluate(&mut self) -> Result<&InferenceResult> {
        self.last = None;

        let result = self.engine.evaluate(&self.inputs)?;

        Ok(&*self.last.insert(result))
    }

    pub fn last_result(&self) -> Option<&InferenceResult> {
        self.last.as_ref()
    }

    pub fn crisp(&self) -> Option<f64> {
        self.last.as_ref().map(InferenceResult::crisp)
    }

    pub fn profile(&self) -> Option<&[(f64, f64)]> {
        self.last.as_ref().map(InferenceResult::profile)
    }

    pub fn firing_strengths(&self) -> Option<&[f64]> {
        self.last.as_ref().map(InferenceResult::firing_strengths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EngineBuilder;
    use crate::error::EngineError;
    use crate::rules::Rule;
    use crate::terms::{MembershipFn, Terms};
    use crate::variable::Universe;

    fn engine() -> Engine {
        let universe = || Universe::with_samples(0. ..=10., 101).unwrap();
        let terms = || {
            let mut terms = Terms::new();

            terms.insert("low", MembershipFn::triangular(0., 0., 5.).unwrap());
            terms.insert("high", MembershipFn::triangular(5., 10., 10.).unwrap());
            terms
        };
        let mut builder = EngineBuilder::new();
        let x = builder.add_input_with("x", universe(), terms()).unwrap();
        let y = builder.add_output_with("y", universe(), terms()).unwrap();

        builder.add_rule(Rule::new(x.is("low"), y.then("low"))).unwrap();
        builder.add_rule(Rule::new(x.is("high"), y.then("high"))).unwrap();
        builder.seal().unwrap()
    }

    #[test]
    fn test_session_keeps_last_result() {
        let engine = engine();
        let mut session = Session::new(&engine);

        assert!(session.last_result().is_none());
        assert_eq!(
            session.evaluate().unwrap_err(),
            EngineError::MissingInput { variable: "x".into() }
        );

        let crisp = session.set("x", 9.).evaluate().unwrap().crisp();

        assert!(crisp > 5.);
        assert_eq!(session.crisp(), Some(crisp));
        assert_eq!(session.firing_strengths(), Some(&[0., 0.8][..]));
        assert_eq!(session.profile().map(<[_]>::len), Some(101));
    }

    #[test]
    fn test_failed_pass_clears_result() {
        let engine = engine();
        let mut session = Session::new(&engine);

        session.set("x", 1.).evaluate().unwrap();

        // x = 5 lies on the edge of both sets
        assert_eq!(session.set("x", 5.).evaluate().unwrap_err(), EngineError::NoRuleFired);
        assert!(session.last_result().is_none());

        session.set("x", 1.).evaluate().unwrap();

        assert!(session.crisp().is_some_and(|crisp| crisp < 5.));
    }
}
