use super::CalculateError;
use crate::core::prism::Prism;
use crate::core::table::PairTable;
use crate::numerics::quadratic_extrapolate_to_zero;
use std::f64::consts::PI;

/// Effective interaction (chi) parameters for a two-type system,
/// extrapolated to `k -> 0` from the Fourier-space direct correlations:
///
///   chi(k) = 0.5 * rho_total * (C_AA/R + R*C_BB - 2*C_AB)
///            / (phi_A/sqrt(R) + phi_B*sqrt(R))
///
/// with site volume ratio `R = v_A/v_B` and volume fractions `phi`.
pub fn chi(prism: &mut Prism) -> Result<PairTable<f64>, CalculateError> {
    if prism.rank() != 2 {
        return Err(CalculateError::RankUnsupported {
            calculation: "chi",
            required: 2,
            actual: prism.rank(),
        });
    }

    prism.ensure_direct_correlation_fourier()?;

    let types: Vec<String> = prism.types().to_vec();
    let mut table = PairTable::new(&types, "chi");

    let c_aa = prism.direct_correlation().curve_by_index(0, 0);
    let c_ab = prism.direct_correlation().curve_by_index(0, 1);
    let c_bb = prism.direct_correlation().curve_by_index(1, 1);

    let site_volume = |index: usize| {
        let radius = prism.diameter_by_index(index) / 2.0;
        4.0 / 3.0 * PI * radius.powi(3)
    };
    let rho_a = prism.density_by_index(0);
    let rho_b = prism.density_by_index(1);
    let phi_a = rho_a / (rho_a + rho_b);
    let phi_b = rho_b / (rho_a + rho_b);
    let volume_ratio = site_volume(0) / site_volume(1);

    let prefactor =
        0.5 * prism.total_density() / (phi_a / volume_ratio.sqrt() + phi_b * volume_ratio.sqrt());

    let curve: Vec<f64> = c_aa
        .iter()
        .zip(&c_ab)
        .zip(&c_bb)
        .map(|((&c_aa, &c_ab), &c_bb)| {
            prefactor * (c_aa / volume_ratio + volume_ratio * c_bb - 2.0 * c_ab)
        })
        .collect();

    let k = prism.domain().k();
    let value = quadratic_extrapolate_to_zero(&[k[0], k[1], k[2]], &[curve[0], curve[1], curve[2]]);
    table.set(&types[0], &types[1], value)?;

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::chi;
    use crate::core::testing::{solved_single_site_prism, solved_two_site_prism};

    #[test]
    fn symmetric_hard_sphere_blend_has_near_zero_chi() {
        let mut prism = solved_two_site_prism();
        let table = chi(&mut prism).expect("two-type system");
        let value = *table.get("A", "B").expect("known").expect("set");

        // identical hard spheres: no enthalpic preference between the types
        assert!(value.abs() < 0.05, "chi = {value}");
    }

    #[test]
    fn single_component_systems_are_rejected() {
        let mut prism = solved_single_site_prism();
        assert!(chi(&mut prism).is_err());
    }
}
