use crate::core::matrix_array::MatrixArray;
use crate::core::space::Space;
use crate::core::table::{TableError, ValueTable};

/// Site number densities together with the derived pair and site density
/// matrices consumed by the solver:
///
///   pair[a][b] = rho_a * rho_b
///   site[a][b] = rho_a          (a == b)
///              = rho_a + rho_b  (a != b)
///   total      = sum_a rho_a
///
/// The derived matrices are held as length-1 non-spatial containers so they
/// can broadcast against spatial curves on either grid.
#[derive(Debug, Clone)]
pub struct Density {
    values: ValueTable<f64>,
    total: f64,
    pair: MatrixArray,
    site: MatrixArray,
}

impl Density {
    pub fn new(types: &[String]) -> Self {
        let rank = types.len();
        Self {
            values: ValueTable::new(types, "density"),
            total: 0.0,
            pair: MatrixArray::with_types(1, rank, Space::NonSpatial, types.to_vec()),
            site: MatrixArray::with_types(1, rank, Space::NonSpatial, types.to_vec()),
        }
    }

    pub fn set(&mut self, label: &str, density: f64) -> Result<(), TableError> {
        self.values.set(label, density)?;
        self.rebuild();
        Ok(())
    }

    pub fn get(&self, label: &str) -> Result<Option<f64>, TableError> {
        Ok(self.values.get(label)?.copied())
    }

    pub fn get_by_index(&self, index: usize) -> Option<f64> {
        self.values.get_by_index(index).copied()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn pair(&self) -> &MatrixArray {
        &self.pair
    }

    pub fn site(&self) -> &MatrixArray {
        &self.site
    }

    pub fn check(&self) -> Result<(), TableError> {
        self.values.check()
    }

    fn rebuild(&mut self) {
        self.total = 0.0;
        let entries: Vec<(usize, Option<f64>)> = self
            .values
            .iter()
            .map(|(index, _, value)| (index, value.copied()))
            .collect();

        for &(site1, rho1) in &entries {
            let Some(rho1) = rho1 else { continue };
            self.total += rho1;
            for &(site2, rho2) in &entries {
                let Some(rho2) = rho2 else { continue };
                self.pair.set_curve_by_index(site1, site2, &[rho1 * rho2]);
                let site_density = if site1 == site2 { rho1 } else { rho1 + rho2 };
                self.site.set_curve_by_index(site1, site2, &[site_density]);
            }
        }
    }
}
