use std::ops::Range;

/// `n` evenly spaced samples over `min..=max`, both ends included, the way
/// `numpy.linspace` lays them out: the last sample is exactly `max`.
#[derive(Clone, Debug)]
pub struct Linspace {
    min: f64,
    max: f64,
    delta: f64,
    len: usize,
    indices: Range<usize>,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let delta = match n {
            0 | 1 => 0.,
            _ => (max - min) / (n - 1) as f64,
        };

        Linspace {
            min,
            max,
            delta,
            len: n,
            indices: 0..n,
        }
    }

    #[inline]
    fn at(&self, i: usize) -> f64 {
        if i > 0 && i + 1 == self.len {
            self.max
        } else {
            self.min + self.delta * i as f64
        }
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        let i = self.indices.next()?;

        Some(self.at(i))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl DoubleEndedIterator for Linspace {
    #[inline]
    fn next_back(&mut self) -> Option<f64> {
        let i = self.indices.next_back()?;

        Some(self.at(i))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace_hits_both_bounds() {
    let points: Vec<_> = Linspace::new(0., 5., 51).collect();

    assert_eq!(points.len(), 51);
    assert_eq!(points[0], 0.);
    assert_eq!(points[50], 5.);
    assert!((points[35] - 3.5).abs() < 1e-12);
}

#[test]
fn test_linspace_single_point() {
    let points: Vec<_> = Linspace::new(2., 2., 1).collect();

    assert_eq!(points, vec![2.]);
}

#[test]
fn test_linspace_reversed() {
    let points: Vec<_> = Linspace::new(0., 1., 5).rev().collect();

    assert_eq!(points, vec![1., 0.75, 0.5, 0.25, 0.]);
}
