use super::CalculateError;
use crate::core::matrix_array::MatrixArray;
use crate::core::prism::Prism;

/// Inter-molecular pair correlation (radial distribution) functions:
/// `g(r) = h(r) + 1`.
pub fn pair_correlation(prism: &mut Prism) -> Result<MatrixArray, CalculateError> {
    prism.ensure_total_correlation_real()?;
    Ok(prism.total_correlation() + 1.0)
}

#[cfg(test)]
mod tests {
    use super::pair_correlation;
    use crate::core::testing::solved_single_site_prism;

    #[test]
    fn shifts_the_total_correlation_by_one() {
        let mut prism = solved_single_site_prism();
        let g = pair_correlation(&mut prism).expect("solved system");
        let h = prism.total_correlation().curve("A", "A");

        for (&g, &h) in g.curve("A", "A").iter().zip(&h) {
            assert!((g - (h + 1.0)).abs() < 1.0e-12);
        }
        // deep inside the hard core the pair correlation vanishes
        assert!(g.curve("A", "A")[0].abs() < 1.0e-4);
    }
}
