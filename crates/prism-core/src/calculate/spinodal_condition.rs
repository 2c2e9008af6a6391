use super::CalculateError;
use crate::core::prism::Prism;
use crate::core::table::PairTable;
use crate::numerics::quadratic_extrapolate_to_zero;

/// Spinodal stability function of a two-type blend, extrapolated to
/// `k -> 0`: the determinant-like combination of the Fourier-space direct
/// correlations and intra-molecular correlations that vanishes on the
/// spinodal boundary.
pub fn spinodal_condition(prism: &mut Prism) -> Result<PairTable<f64>, CalculateError> {
    if prism.rank() != 2 {
        return Err(CalculateError::RankUnsupported {
            calculation: "spinodal_condition",
            required: 2,
            actual: prism.rank(),
        });
    }

    prism.ensure_direct_correlation_fourier()?;

    let types: Vec<String> = prism.types().to_vec();
    let mut table = PairTable::new(&types, "spinodal_condition");

    let c_aa = prism.direct_correlation().curve_by_index(0, 0);
    let c_ab = prism.direct_correlation().curve_by_index(0, 1);
    let c_bb = prism.direct_correlation().curve_by_index(1, 1);

    let rho_aa = prism.site_density().value_at(0, 0, 0);
    let rho_ab = prism.site_density().value_at(0, 0, 1);
    let rho_bb = prism.site_density().value_at(0, 1, 1);

    // recover the bare intra-molecular correlations from the site-density
    // scaled container
    let omega_aa: Vec<f64> = prism
        .omega()
        .curve_by_index(0, 0)
        .iter()
        .map(|&value| value / rho_aa)
        .collect();
    let omega_ab: Vec<f64> = prism
        .omega()
        .curve_by_index(0, 1)
        .iter()
        .map(|&value| value / rho_ab)
        .collect();
    let omega_bb: Vec<f64> = prism
        .omega()
        .curve_by_index(1, 1)
        .iter()
        .map(|&value| value / rho_bb)
        .collect();

    let length = prism.domain().length();
    let mut curve = vec![0.0; length];
    for index in 0..length {
        let (c_aa, c_ab, c_bb) = (c_aa[index], c_ab[index], c_bb[index]);
        let (w_aa, w_ab, w_bb) = (omega_aa[index], omega_ab[index], omega_bb[index]);

        curve[index] = 1.0
            - c_aa * rho_aa * w_aa
            - 2.0 * c_ab * rho_ab * w_ab
            - c_bb * rho_bb * w_bb
            + c_ab * c_ab * rho_ab * rho_ab * w_ab * w_ab
            - c_aa * c_bb * rho_ab * rho_ab * w_ab * w_ab
            - c_ab * c_ab * rho_aa * rho_bb * w_aa * w_bb
            + c_aa * c_bb * rho_aa * rho_bb * w_aa * w_bb;
    }

    let k = prism.domain().k();
    let value = quadratic_extrapolate_to_zero(&[k[0], k[1], k[2]], &[curve[0], curve[1], curve[2]]);
    table.set(&types[0], &types[1], value)?;

    Ok(table)
}
