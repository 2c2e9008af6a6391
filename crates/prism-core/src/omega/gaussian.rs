use super::{ideal_chain_form_factor, Omega};

/// Ideal Gaussian chain of `length` segments with statistical segment
/// length `sigma`; the single-bond correlation is `exp(-k^2 sigma^2 / 6)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    sigma: f64,
    length: f64,
}

impl Gaussian {
    pub fn new(sigma: f64, length: f64) -> Self {
        Self { sigma, length }
    }
}

impl Omega for Gaussian {
    fn calculate(&self, k: &[f64]) -> Vec<f64> {
        k.iter()
            .map(|&k| {
                let bond = (-k * k * self.sigma * self.sigma / 6.0).exp();
                ideal_chain_form_factor(bond, self.length)
            })
            .collect()
    }
}
