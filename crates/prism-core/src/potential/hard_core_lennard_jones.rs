use super::{LennardJones, PairPotential, DEFAULT_HIGH_VALUE};

/// Lennard-Jones attraction outside a hard core: the 12-6 form beyond the
/// contact distance and a large finite overlap energy at and below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardCoreLennardJones {
    inner: LennardJones,
    sigma: f64,
    high_value: f64,
}

impl HardCoreLennardJones {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self::with_high_value(epsilon, sigma, DEFAULT_HIGH_VALUE)
    }

    pub fn with_high_value(epsilon: f64, sigma: f64, high_value: f64) -> Self {
        Self {
            inner: LennardJones::new(epsilon, sigma),
            sigma,
            high_value,
        }
    }
}

impl PairPotential for HardCoreLennardJones {
    fn calculate(&self, r: &[f64]) -> Vec<f64> {
        r.iter()
            .map(|&r| {
                if r <= self.sigma {
                    self.high_value
                } else {
                    self.inner.magnitude(r)
                }
            })
            .collect()
    }

    fn sigma(&self) -> Option<f64> {
        Some(self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::HardCoreLennardJones;
    use crate::potential::PairPotential;

    #[test]
    fn overlap_is_high_value_and_tail_is_lennard_jones() {
        let potential = HardCoreLennardJones::new(1.0, 1.0);
        let values = potential.calculate(&[0.5, 1.0, 2.0]);

        assert_eq!(values[0], 1.0e6);
        assert_eq!(values[1], 1.0e6);
        let expected = 4.0 * ((0.5_f64).powi(12) - (0.5_f64).powi(6));
        assert!((values[2] - expected).abs() < 1.0e-12);
    }
}
