mod from_array;
mod freely_jointed_chain;
mod gaussian;
mod no_intra;
mod single_site;

pub use from_array::FromArray;
pub use freely_jointed_chain::FreelyJointedChain;
pub use gaussian::Gaussian;
pub use no_intra::NoIntra;
pub use single_site::SingleSite;

/// An intra-molecular correlation function evaluated on the wavenumber grid.
/// Encodes molecular connectivity and shape; held fixed for the duration of
/// a solve.
pub trait Omega: std::fmt::Debug {
    fn calculate(&self, k: &[f64]) -> Vec<f64>;
}

/// Shared ideal-chain combination used by the Gaussian and freely jointed
/// chain form factors:
///
///   omega(E) = (1 - E^2 - 2E/N + 2E^(N+1)/N) / (1 - E)^2
///
/// where `E` is the single-bond correlation at the given wavenumber.
pub(crate) fn ideal_chain_form_factor(bond_correlation: f64, length: f64) -> f64 {
    let e = bond_correlation;
    let n = length;
    (1.0 - e * e - 2.0 * e / n + 2.0 * e.powf(n + 1.0) / n) / ((1.0 - e) * (1.0 - e))
}
