use super::{LennardJones, PairPotential};

/// Weeks-Chandler-Andersen repulsion: the Lennard-Jones potential truncated
/// and shifted at its minimum `2^(1/6) * sigma`, leaving only the repulsive
/// branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeksChandlerAndersen {
    inner: LennardJones,
    sigma: f64,
}

impl WeeksChandlerAndersen {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        let rcut = sigma * 2.0_f64.powf(1.0 / 6.0);
        Self {
            inner: LennardJones::with_cutoff(epsilon, sigma, rcut, true),
            sigma,
        }
    }
}

impl PairPotential for WeeksChandlerAndersen {
    fn calculate(&self, r: &[f64]) -> Vec<f64> {
        self.inner.calculate(r)
    }

    fn sigma(&self) -> Option<f64> {
        Some(self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::WeeksChandlerAndersen;
    use crate::potential::PairPotential;

    #[test]
    fn purely_repulsive_and_zero_beyond_the_minimum() {
        let potential = WeeksChandlerAndersen::new(1.0, 1.0);
        let well = 2.0_f64.powf(1.0 / 6.0);
        let values = potential.calculate(&[0.9, 1.0, well, 1.5]);

        assert!(values[0] > 0.0);
        assert!((values[1] - 1.0).abs() < 1.0e-12, "epsilon at contact");
        assert!(values[2].abs() < 1.0e-12);
        assert_eq!(values[3], 0.0);
    }
}
