use std::iter::Sum;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp;

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    #[inline]
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => Norm::Min.call(u, v),
            Self::Prod => Norm::Prod.call(u, v),
            Self::BoundedProd => Norm::BoundedProd.call(u, v),
            Self::DrasticProd => Norm::DrasticProd.call(u, v),
        }
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    #[inline]
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => Norm::Max.call(u, v),
            Self::ProbOr => Norm::ProbOr.call(u, v),
            Self::BoundedSum => Norm::BoundedSum.call(u, v),
            Self::DrasticSum => Norm::DrasticSum.call(u, v),
        }
    }
}

/// Implication operator: shapes a rule's consequent set by its firing strength.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Mamdani: clip the consequent at the firing strength
    #[default]
    Min,
    /// Larsen: scale the consequent by the firing strength
    Prod,
}

impl ImplicationOp {
    #[inline]
    pub fn call<F: Float>(self, strength: F, membership: F) -> F {
        match self {
            Self::Min => Norm::Min.call(strength, membership),
            Self::Prod => Norm::Prod.call(strength, membership),
        }
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
}

impl AggregationOp {
    #[inline]
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => Norm::Max.call(u, v),
            Self::ProbOr => Norm::ProbOr.call(u, v),
            Self::BoundedSum => Norm::BoundedSum.call(u, v),
        }
    }
}

/// The t-norms and s-norms the public operators are built from.
#[derive(Clone, Copy, Debug)]
enum Norm {
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl Norm {
    #[inline]
    fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }
}

/// Method for defuzzificating the aggregated membership profile.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of gravity over the samples: `sum(x * m) / sum(m)`
    #[default]
    Centroid,
    /// Value splitting the area under the profile in two equal halves
    Bisector,
    /// Mean of the values for which the membership is maximum
    MeanOfMaximum,
    /// Smallest value for which the membership is maximum
    SmallestOfMaximum,
    /// Largest value for which the membership is maximum
    LargestOfMaximum,
}

impl DefuzzificationOp {
    /// Collapses `membership` sampled at `universe` into one crisp value.
    ///
    /// Returns `None` when the profile is zero everywhere.
    pub fn call<F: Float + Sum>(self, universe: &[F], membership: &[F]) -> Option<F> {
        debug_assert_eq!(universe.len(), membership.len());

        match self {
            Self::Centroid => {
                let den = membership.iter().copied().sum::<F>();

                if den == F::zero() {
                    return None;
                }

                let num = universe
                    .iter()
                    .zip(membership)
                    .map(|(&x, &m)| x * m)
                    .sum::<F>();

                Some(num / den)
            },
            Self::Bisector => {
                let two = F::one() + F::one();
                let areas: Vec<F> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
                    .collect();
                let total_area = areas.iter().copied().sum::<F>();

                if total_area == F::zero() {
                    return None;
                }

                let target = total_area / two;
                let mut cum_area = F::zero();

                for (i, &area) in areas.iter().enumerate() {
                    if cum_area + area >= target {
                        let coords = [(cum_area, universe[i]), (cum_area + area, universe[i + 1])];

                        return Some(interp(target, &coords));
                    }

                    cum_area = cum_area + area;
                }

                universe.last().copied()
            },
            Self::MeanOfMaximum => {
                let (len, sum) = maxima(universe, membership)?
                    .fold((0usize, F::zero()), |(len, sum), u| (len + 1, sum + u));

                F::from(len).map(|len| sum / len)
            },
            Self::SmallestOfMaximum => maxima(universe, membership)?.reduce(F::min),
            Self::LargestOfMaximum => maxima(universe, membership)?.reduce(F::max),
        }
    }
}

/// The universe values at which the membership reaches its (non-zero) maximum.
fn maxima<'a, F: Float>(universe: &'a [F], membership: &'a [F]) -> Option<impl Iterator<Item = F> + 'a> {
    let maximum = membership.iter().copied().fold(F::zero(), F::max);

    if maximum == F::zero() {
        return None;
    }

    Some(
        universe
            .iter()
            .zip(membership)
            .filter_map(move |(&u, &m)| if m == maximum { Some(u) } else { None }),
    )
}
