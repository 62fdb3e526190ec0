use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::math::{interp, ramp_down, ramp_up};

/// The shape of a fuzzy set: maps a crisp value to a degree of membership in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipFn {
    /// Rises from `a` to a peak at `b`, falls back to zero at `c`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Rises from `a` to a plateau over `b..=c`, falls back to zero at `d`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Piecewise-linear breakpoints `(x, degree)`, edge degrees held outside them.
    Points(Vec<(f64, f64)>),
}

impl MembershipFn {
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self> {
        let this = Self::Triangular { a, b, c };
        this.validate()?;
        Ok(this)
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        let this = Self::Trapezoidal { a, b, c, d };
        this.validate()?;
        Ok(this)
    }

    pub fn points(points: impl Into<Vec<(f64, f64)>>) -> Result<Self> {
        let this = Self::Points(points.into());
        this.validate()?;
        Ok(this)
    }

    /// Checks the control points. Shapes coming from deserialization bypass the
    /// constructors, so the builder calls this again when a set is attached.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Triangular { a, b, c } => check_monotonic("triangular", &[*a, *b, *c]),
            Self::Trapezoidal { a, b, c, d } => check_monotonic("trapezoidal", &[*a, *b, *c, *d]),
            Self::Points(points) => {
                if points.is_empty() {
                    return Err(EngineError::invalid_shape("points: at least one breakpoint is required"));
                }

                let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();

                check_monotonic("points", &xs)?;

                if let Some((x, y)) = points.iter().find(|(_, y)| !(0. ..=1.).contains(y)) {
                    return Err(EngineError::invalid_shape(format!(
                        "points: degree {y} at x = {x} is outside [0, 1]"
                    )));
                }

                Ok(())
            },
        }
    }

    /// Degree of membership of `x`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.
                } else if x == b {
                    1.
                } else if x < b {
                    ramp_up(x, a, b)
                } else {
                    ramp_down(x, b, c)
                }
            },
            Self::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.
                } else if b <= x && x <= c {
                    1.
                } else if x < b {
                    ramp_up(x, a, b)
                } else {
                    ramp_down(x, c, d)
                }
            },
            Self::Points(ref points) => interp(x, points),
        }
    }

    /// The interval outside which the degree is constant: zero for the
    /// triangular and trapezoidal shapes, the held edge degree for breakpoints.
    pub fn support(&self) -> (f64, f64) {
        match self {
            Self::Triangular { a, c, .. } => (*a, *c),
            Self::Trapezoidal { a, d, .. } => (*a, *d),
            Self::Points(points) => {
                let first = points.first().map_or(0., |(x, _)| *x);
                let last = points.last().map_or(0., |(x, _)| *x);

                (first, last)
            },
        }
    }
}

fn check_monotonic(shape: &str, points: &[f64]) -> Result<()> {
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(EngineError::invalid_shape(format!("{shape}: control point {p} is not finite")));
    }

    if points.windows(2).any(|w| w[0] > w[1]) {
        return Err(EngineError::invalid_shape(format!(
            "{shape}: control points {points:?} are not in non-decreasing order"
        )));
    }

    Ok(())
}

/// A labeled fuzzy set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuzzySet {
    label: String,
    membership: MembershipFn,
}

impl FuzzySet {
    pub fn new(label: impl Into<String>, membership: MembershipFn) -> Self {
        Self {
            label: label.into(),
            membership,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn membership(&self) -> &MembershipFn {
        &self.membership
    }

    #[inline]
    pub fn degree(&self, x: f64) -> f64 {
        self.membership.degree(x)
    }

    pub(crate) fn into_parts(self) -> (String, MembershipFn) {
        (self.label, self.membership)
    }
}

/// The fuzzy sets to declare on a variable in one go, in declaration order.
///
/// Duplicate labels are accepted here and rejected when the terms are
/// attached to a variable.
#[derive(Clone, Debug, Default)]
pub struct Terms(pub(crate) Vec<FuzzySet>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn insert(&mut self, label: impl Into<String>, membership: MembershipFn) {
        self.0.push(FuzzySet::new(label, membership));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, MembershipFn)> for Terms {
    fn from_iter<It: IntoIterator<Item = (L, MembershipFn)>>(iter: It) -> Self {
        Self(iter.into_iter().map(|(label, mf)| FuzzySet::new(label, mf)).collect())
    }
}
