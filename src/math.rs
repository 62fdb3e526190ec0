use num::Float;

/// Similar to numpy.interp for a single sample: linear interpolation between
/// breakpoints, holding the first/last value outside them.
///
/// `coords` must be non-empty and sorted by x.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        if x1 <= x && x <= x2 {
            // Vertical steps are matched by the preceding segment first
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    y_last
}

/// Linear rise of `x` over `[lo, hi]`, or a step to one when the segment has no width.
#[inline]
pub(crate) fn ramp_up<F: Float>(x: F, lo: F, hi: F) -> F {
    if hi == lo {
        F::one()
    } else {
        (x - lo) / (hi - lo)
    }
}

/// Linear fall of `x` over `[lo, hi]`, or a step to one when the segment has no width.
#[inline]
pub(crate) fn ramp_down<F: Float>(x: F, lo: F, hi: F) -> F {
    if hi == lo {
        F::one()
    } else {
        (hi - x) / (hi - lo)
    }
}

#[test]
fn test_interp() {
    let xs = [0., 1., 1.5, 2.72, 3.24];
    let coords = [(1., 3.), (2., 2.), (3., 0.)];

    assert_eq!(
        xs.iter().map(|x| interp(*x, &coords)).collect::<Vec<f64>>(),
        vec![3., 3., 2.5, 0.5599999999999996, 0.]
    );

    let xs = [2.5, -1., 7.5];
    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(
        xs.iter().map(|x| interp(*x, &coords)).collect::<Vec<f64>>(),
        vec![4., 0., 2.]
    );
}

#[test]
fn test_interp_vertical_step() {
    let coords = [(0., 0.), (1., 0.), (1., 1.), (2., 1.)];

    assert_eq!(interp(1., &coords), 0.);
    assert_eq!(interp(1.5, &coords), 1.);
}
