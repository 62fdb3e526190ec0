//! Grid sweeps over the input space, e.g. for plotting a control surface.
//!
//! With the `parallel` feature (on by default) grid points are evaluated on
//! the rayon thread pool; every point is an independent evaluation against the
//! same shared engine.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::inference::Engine;
use crate::inputs::Inputs;
use crate::outputs::InferenceResult;
use crate::variable::Role;

/// Crisp outputs over a grid of two inputs.
///
/// Values are stored row-major: one row per `ys` entry. `None` marks grid
/// points where no rule fired.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    x: String,
    y: String,
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<Option<f64>>,
}

impl Surface {
    pub fn x_variable(&self) -> &str {
        &self.x
    }

    pub fn y_variable(&self) -> &str {
        &self.y
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// The output at `(xs[i], ys[j])`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.xs.len() || j >= self.ys.len() {
            return None;
        }

        self.values[j * self.xs.len() + i]
    }

    /// One slice per `ys` entry.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> + '_ {
        self.values.chunks(self.xs.len().max(1))
    }
}

impl Engine {
    /// Evaluates the grid `xs × ys` of inputs `x` and `y`, holding every other
    /// input at its value in `fixed`.
    ///
    /// Grid points where no rule fires are recorded as `None`; any other
    /// evaluation error aborts the sweep.
    pub fn surface(&self, x: &str, xs: &[f64], y: &str, ys: &[f64], fixed: &Inputs) -> Result<Surface> {
        for name in [x, y] {
            if self.variable(name).map(|var| var.role()) != Some(Role::Input) {
                return Err(EngineError::UndeclaredInput {
                    variable: name.to_owned(),
                });
            }
        }

        if x == y {
            return Err(EngineError::DuplicateAxis { variable: x.to_owned() });
        }

        let width = xs.len();
        let point = |k: usize| -> Result<Option<f64>> {
            let inputs = fixed.clone().with(x, xs[k % width]).with(y, ys[k / width]);

            match self.evaluate(&inputs) {
                Ok(result) => Ok(Some(result.crisp())),
                Err(EngineError::NoRuleFired) => Ok(None),
                Err(err) => Err(err),
            }
        };
        let len = width * ys.len();

        debug!(x, y, points = len, "sweeping surface");

        #[cfg(feature = "parallel")]
        let values = (0..len).into_par_iter().map(point).collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let values = (0..len).map(point).collect::<Result<Vec<_>>>()?;

        Ok(Surface {
            x: x.to_owned(),
            y: y.to_owned(),
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            values,
        })
    }

    /// Evaluates independent input assignments, in order.
    pub fn evaluate_batch(&self, batch: &[Inputs]) -> Vec<Result<InferenceResult>> {
        #[cfg(feature = "parallel")]
        let results = batch.par_iter().map(|inputs| self.evaluate(inputs)).collect();
        #[cfg(not(feature = "parallel"))]
        let results = batch.iter().map(|inputs| self.evaluate(inputs)).collect();

        results
    }
}
