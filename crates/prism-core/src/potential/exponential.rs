use super::{PairPotential, DEFAULT_HIGH_VALUE};

/// Exponentially decaying attraction outside a hard core:
/// `-epsilon * exp(-(r - sigma)/alpha)` for `r > sigma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    epsilon: f64,
    sigma: f64,
    alpha: f64,
    high_value: f64,
}

impl Exponential {
    pub fn new(epsilon: f64, sigma: f64, alpha: f64) -> Self {
        Self::with_high_value(epsilon, sigma, alpha, DEFAULT_HIGH_VALUE)
    }

    pub fn with_high_value(epsilon: f64, sigma: f64, alpha: f64, high_value: f64) -> Self {
        Self {
            epsilon,
            sigma,
            alpha,
            high_value,
        }
    }
}

impl PairPotential for Exponential {
    fn calculate(&self, r: &[f64]) -> Vec<f64> {
        r.iter()
            .map(|&r| {
                if r > self.sigma {
                    -self.epsilon * (-(r - self.sigma) / self.alpha).exp()
                } else {
                    self.high_value
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
    use super::Exponential;
    use crate::potential::PairPotential;

    #[test]
    fn contact_depth_is_epsilon_and_decays_with_alpha() {
        let potential = Exponential::new(2.0, 1.0, 0.5);
        let values = potential.calculate(&[0.5, 1.0 + 1.0e-12, 1.5]);

        assert_eq!(values[0], 1.0e6);
        assert!((values[1] + 2.0).abs() < 1.0e-9);
        assert!((values[2] + 2.0 * (-1.0_f64).exp()).abs() < 1.0e-12);
    }
}
