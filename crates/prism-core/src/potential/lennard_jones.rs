use super::PairPotential;

/// 12-6 Lennard-Jones interaction with an optional cutoff and shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJones {
    epsilon: f64,
    sigma: f64,
    rcut: Option<f64>,
    shift: bool,
}

impl LennardJones {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self {
            epsilon,
            sigma,
            rcut: None,
            shift: false,
        }
    }

    pub fn with_cutoff(epsilon: f64, sigma: f64, rcut: f64, shift: bool) -> Self {
        Self {
            epsilon,
            sigma,
            rcut: Some(rcut),
            shift,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub(super) fn magnitude(&self, r: f64) -> f64 {
        let ratio = self.sigma / r;
        4.0 * self.epsilon * (ratio.powi(12) - ratio.powi(6))
    }
}

impl PairPotential for LennardJones {
    fn calculate(&self, r: &[f64]) -> Vec<f64> {
        let shift_value = match (self.rcut, self.shift) {
            (Some(rcut), true) => self.magnitude(rcut),
            _ => 0.0,
        };

        r.iter()
            .map(|&r| match self.rcut {
                Some(rcut) if r > rcut => 0.0,
                _ => self.magnitude(r) - shift_value,
            })
            .collect()
    }

    fn sigma(&self) -> Option<f64> {
        Some(self.sigma)
    }
}
