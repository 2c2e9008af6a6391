use super::Omega;

/// A precomputed intra-molecular correlation curve, e.g. measured from a
/// simulation trajectory. The stored curve must match the wavenumber grid it
/// is evaluated on.
#[derive(Debug, Clone, PartialEq)]
pub struct FromArray {
    values: Vec<f64>,
}

impl FromArray {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl Omega for FromArray {
    fn calculate(&self, k: &[f64]) -> Vec<f64> {
        assert_eq!(
            k.len(),
            self.values.len(),
            "stored omega curve does not match the wavenumber grid"
        );
        self.values.clone()
    }
}
