use super::{PairPotential, DEFAULT_HIGH_VALUE};

/// Hard-sphere exclusion: zero beyond the contact distance, a large finite
/// overlap energy at and below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardSphere {
    sigma: f64,
    high_value: f64,
}

impl HardSphere {
    pub fn new(sigma: f64) -> Self {
        Self::with_high_value(sigma, DEFAULT_HIGH_VALUE)
    }

    pub fn with_high_value(sigma: f64, high_value: f64) -> Self {
        Self { sigma, high_value }
    }
}

impl PairPotential for HardSphere {
    fn calculate(&self, r: &[f64]) -> Vec<f64> {
        r.iter()
            .map(|&r| if r > self.sigma { 0.0 } else { self.high_value })
            .collect()
    }

    fn sigma(&self) -> Option<f64> {
        Some(self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::HardSphere;
    use crate::potential::PairPotential;

    #[test]
    fn zero_outside_core_high_value_inside() {
        let potential = HardSphere::new(1.0);
        let values = potential.calculate(&[0.5, 1.0, 1.5]);
        assert_eq!(values, vec![1.0e6, 1.0e6, 0.0]);
        assert_eq!(potential.sigma(), Some(1.0));
    }
}
