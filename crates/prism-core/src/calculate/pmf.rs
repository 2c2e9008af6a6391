use super::{pair_correlation, CalculateError};
use crate::core::matrix_array::MatrixArray;
use crate::core::prism::Prism;

/// Potentials of mean force `w(r) = -kT * ln g(r)`. Points where the pair
/// correlation is not positive (deep inside a hard core) come out as NaN or
/// infinity, mirroring the divergence of the true potential there.
pub fn pmf(prism: &mut Prism) -> Result<MatrixArray, CalculateError> {
    let kt = prism.kt();
    let g = pair_correlation(prism)?;

    let mut w = g.clone();
    let rank = w.rank();
    for site1 in 0..rank {
        for site2 in site1..rank {
            let curve: Vec<f64> = g
                .curve_by_index(site1, site2)
                .iter()
                .map(|&g| -kt * g.ln())
                .collect();
            w.set_curve_by_index(site1, site2, &curve);
        }
    }
    Ok(w)
}
