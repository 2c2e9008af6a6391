use super::CalculateError;
use crate::core::matrix_array::MatrixArray;
use crate::core::prism::Prism;

/// Partial structure factors in Fourier space:
///
///   s(k) = (h(k) * rho_pair + omega(k)) / rho_site
///
/// where `omega` is already site-density scaled. With `normalize` unset the
/// site-density division is skipped.
pub fn structure_factor(prism: &mut Prism, normalize: bool) -> Result<MatrixArray, CalculateError> {
    prism.ensure_total_correlation_fourier()?;

    let weighted = &(prism.total_correlation() * prism.pair_density()) + prism.omega();
    Ok(if normalize {
        &weighted / prism.site_density()
    } else {
        weighted
    })
}
