use super::CalculateError;
use crate::core::prism::Prism;
use crate::core::table::PairTable;
use crate::numerics::quadratic_extrapolate_to_zero;

/// Second virial coefficients `B2 = -h(k -> 0) / 2` per pair. With
/// `extrapolate` set the `k -> 0` limit comes from a quadratic fit through
/// the three smallest wavenumbers; otherwise the first grid value is used
/// directly.
pub fn second_virial(
    prism: &mut Prism,
    extrapolate: bool,
) -> Result<PairTable<f64>, CalculateError> {
    prism.ensure_total_correlation_fourier()?;

    let k = prism.domain().k();
    let types: Vec<String> = prism.types().to_vec();
    let mut table = PairTable::new(&types, "B2");

    for site1 in 0..prism.rank() {
        for site2 in site1..prism.rank() {
            let curve = prism.total_correlation().curve_by_index(site1, site2);
            let value = if extrapolate {
                let x = [k[0], k[1], k[2]];
                let y = [-0.5 * curve[0], -0.5 * curve[1], -0.5 * curve[2]];
                quadratic_extrapolate_to_zero(&x, &y)
            } else {
                -0.5 * curve[0]
            };
            table.set(&types[site1], &types[site2], value)?;
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::second_virial;
    use crate::core::testing::solved_single_site_prism;

    #[test]
    fn hard_spheres_have_a_positive_second_virial() {
        let mut prism = solved_single_site_prism();

        let extrapolated = second_virial(&mut prism, true).expect("solved system");
        let direct = second_virial(&mut prism, false).expect("solved system");

        let b2 = *extrapolated.get("A", "A").expect("known").expect("set");
        let b2_direct = *direct.get("A", "A").expect("known").expect("set");

        assert!(b2 > 0.0, "repulsive interactions give B2 > 0, got {b2}");
        assert!(
            (b2 - b2_direct).abs() / b2 < 0.05,
            "extrapolated {b2} vs direct {b2_direct}"
        );
    }
}
