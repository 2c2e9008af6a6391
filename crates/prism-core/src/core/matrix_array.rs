use crate::core::space::Space;
use crate::numerics::linalg::{self, DenseMatrix, LuError};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixArrayError {
    #[error("matrix at grid point {grid_point} could not be inverted: {source}")]
    Invert { grid_point: usize, source: LuError },
}

const SPACE_MISMATCH: &str = "attempting matrix array math in non-matching spaces";

/// A stack of symmetric rank-by-rank matrices, one per grid point, stored as
/// a flat `(length, rank, rank)` cube together with the site-type labels that
/// name its rows/columns and the space its contents currently represent.
///
/// The set of values at a fixed matrix index pair across all grid points is
/// called a curve. All mutation of curves goes through symmetric accessors
/// that write both triangle positions.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixArray {
    data: Vec<f64>,
    length: usize,
    rank: usize,
    space: Space,
    types: Vec<String>,
}

impl MatrixArray {
    pub fn zeros(length: usize, rank: usize, space: Space) -> Self {
        Self::with_types(length, rank, space, default_types(rank))
    }

    pub fn with_types(length: usize, rank: usize, space: Space, types: Vec<String>) -> Self {
        assert!(rank > 0, "matrix array rank must be at least 1");
        assert!(length > 0, "matrix array length must be at least 1");
        assert_eq!(
            types.len(),
            rank,
            "matrix array needs exactly one label per site type"
        );
        Self {
            data: vec![0.0; length * rank * rank],
            length,
            rank,
            space,
            types,
        }
    }

    /// A stack of identity matrices; the `I` of `(I - omega*C)^-1`.
    pub fn identity(length: usize, rank: usize, space: Space) -> Self {
        let mut identity = Self::zeros(length, rank, space);
        for point in 0..length {
            for site in 0..rank {
                let index = identity.flat_index(point, site, site);
                identity.data[index] = 1.0;
            }
        }
        identity
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn space(&self) -> Space {
        self.space
    }

    pub fn set_space(&mut self, space: Space) {
        self.space = space;
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn type_index(&self, label: &str) -> usize {
        self.types
            .iter()
            .position(|known| known == label)
            .unwrap_or_else(|| {
                panic!(
                    "matrix array has types {:?}; requested type '{label}'",
                    self.types
                )
            })
    }

    fn flat_index(&self, point: usize, row: usize, col: usize) -> usize {
        (point * self.rank + row) * self.rank + col
    }

    pub fn value_at(&self, point: usize, row: usize, col: usize) -> f64 {
        self.data[self.flat_index(point, row, col)]
    }

    /// Copy of the curve at a type pair; `curve("A", "B")` and
    /// `curve("B", "A")` are identical by the symmetry invariant.
    pub fn curve(&self, type1: &str, type2: &str) -> Vec<f64> {
        self.curve_by_index(self.type_index(type1), self.type_index(type2))
    }

    pub fn curve_by_index(&self, row: usize, col: usize) -> Vec<f64> {
        assert!(row < self.rank && col < self.rank, "site index out of range");
        (0..self.length)
            .map(|point| self.data[self.flat_index(point, row, col)])
            .collect()
    }

    /// Write a curve at a type pair, storing both triangle positions.
    pub fn set_curve(&mut self, type1: &str, type2: &str, values: &[f64]) {
        self.set_curve_by_index(self.type_index(type1), self.type_index(type2), values);
    }

    pub fn set_curve_by_index(&mut self, row: usize, col: usize, values: &[f64]) {
        assert!(row < self.rank && col < self.rank, "site index out of range");
        assert_eq!(
            values.len(),
            self.length,
            "curve length must match matrix array length"
        );
        for (point, &value) in values.iter().enumerate() {
            let upper = self.flat_index(point, row, col);
            self.data[upper] = value;
            if row != col {
                let lower = self.flat_index(point, col, row);
                self.data[lower] = value;
            }
        }
    }

    /// Per-grid-point matrix product: `out[p] = self[p] * other[p]`.
    pub fn dot(&self, other: &MatrixArray) -> MatrixArray {
        let mut out = MatrixArray::with_types(self.length, self.rank, self.space, self.types.clone());
        self.dot_into(other, &mut out);
        out
    }

    pub fn dot_into(&self, other: &MatrixArray, out: &mut MatrixArray) {
        self.check_space(other);
        assert_eq!(self.rank, other.rank, "matrix array rank mismatch");
        assert_eq!(self.length, other.length, "matrix array length mismatch");
        assert_eq!(out.rank, self.rank, "output rank mismatch");
        assert_eq!(out.length, self.length, "output length mismatch");

        let rank = self.rank;
        for point in 0..self.length {
            let base = point * rank * rank;
            for row in 0..rank {
                for col in 0..rank {
                    let mut sum = 0.0;
                    for inner in 0..rank {
                        sum += self.data[base + row * rank + inner]
                            * other.data[base + inner * rank + col];
                    }
                    out.data[base + row * rank + col] = sum;
                }
            }
        }
        out.space = self.space;
    }

    /// Per-grid-point difference written into a pre-allocated output.
    pub fn sub_into(&self, other: &MatrixArray, out: &mut MatrixArray) {
        self.check_space(other);
        assert_eq!(self.rank, other.rank, "matrix array rank mismatch");
        assert_eq!(self.length, other.length, "matrix array length mismatch");
        assert_eq!(out.rank, self.rank, "output rank mismatch");
        assert_eq!(out.length, self.length, "output length mismatch");

        for (index, slot) in out.data.iter_mut().enumerate() {
            *slot = self.data[index] - other.data[index];
        }
        out.space = self.space;
    }

    /// Invert the rank-by-rank matrix at every grid point independently.
    pub fn invert(&self) -> Result<MatrixArray, MatrixArrayError> {
        let mut inverted = self.clone();
        inverted.invert_in_place()?;
        Ok(inverted)
    }

    pub fn invert_in_place(&mut self) -> Result<(), MatrixArrayError> {
        let rank = self.rank;
        let mut scratch = DenseMatrix::zeros(rank, rank);
        for point in 0..self.length {
            let base = point * rank * rank;
            for row in 0..rank {
                for col in 0..rank {
                    scratch[(row, col)] = self.data[base + row * rank + col];
                }
            }

            let inverse = linalg::lu_invert(&scratch).map_err(|source| {
                MatrixArrayError::Invert {
                    grid_point: point,
                    source,
                }
            })?;

            for row in 0..rank {
                for col in 0..rank {
                    self.data[base + row * rank + col] = inverse[(row, col)];
                }
            }
        }
        Ok(())
    }

    /// Matrix-multiply-like contraction where each scalar product is replaced
    /// by a 1-D full discrete convolution of the corresponding curves,
    /// truncated to the grid length and scaled by `dr`.
    pub fn matrix_convolve(&self, other: &MatrixArray, dr: f64) -> MatrixArray {
        self.check_space(other);
        assert_eq!(self.rank, other.rank, "matrix array rank mismatch");
        assert_eq!(self.length, other.length, "matrix array length mismatch");

        let rank = self.rank;
        let length = self.length;
        let mut out = MatrixArray::with_types(length, rank, self.space, self.types.clone());
        for row in 0..rank {
            for col in 0..rank {
                for inner in 0..rank {
                    let lhs = self.curve_by_index(row, inner);
                    let rhs = other.curve_by_index(inner, col);
                    for point in 0..length {
                        let mut sum = 0.0;
                        for shift in 0..=point {
                            sum += lhs[shift] * rhs[point - shift];
                        }
                        let index = out.flat_index(point, row, col);
                        out.data[index] += sum * dr;
                    }
                }
            }
        }
        out
    }

    fn check_space(&self, other: &MatrixArray) {
        assert!(
            self.space.compatible(other.space),
            "{SPACE_MISMATCH} ({} vs {})",
            self.space,
            other.space
        );
    }

    fn zip_with(&self, other: &MatrixArray, op: impl Fn(f64, f64) -> f64) -> MatrixArray {
        self.check_space(other);
        assert_eq!(self.rank, other.rank, "matrix array rank mismatch");

        let mut out = self.clone();
        out.zip_assign(other, |slot, value| *slot = op(*slot, value));
        out
    }

    fn zip_assign(&mut self, other: &MatrixArray, op: impl Fn(&mut f64, f64)) {
        self.check_space(other);
        assert_eq!(self.rank, other.rank, "matrix array rank mismatch");

        let per_point = self.rank * self.rank;
        if other.length == self.length {
            for (slot, &value) in self.data.iter_mut().zip(&other.data) {
                op(slot, value);
            }
        } else if other.length == 1 {
            // length-1 operands (the non-spatial density matrices) broadcast
            // against every grid point
            for (index, slot) in self.data.iter_mut().enumerate() {
                op(slot, other.data[index % per_point]);
            }
        } else {
            panic!(
                "matrix array length mismatch ({} vs {})",
                self.length, other.length
            );
        }
    }

    fn map(&self, op: impl Fn(f64) -> f64) -> MatrixArray {
        let mut out = self.clone();
        for slot in &mut out.data {
            *slot = op(*slot);
        }
        out
    }
}

fn default_types(rank: usize) -> Vec<String> {
    (0..rank)
        .map(|index| {
            if index < 26 {
                char::from(b'A' + index as u8).to_string()
            } else {
                format!("S{index}")
            }
        })
        .collect()
}

impl Add<&MatrixArray> for &MatrixArray {
    type Output = MatrixArray;
    fn add(self, other: &MatrixArray) -> MatrixArray {
        self.zip_with(other, |lhs, rhs| lhs + rhs)
    }
}

impl Sub<&MatrixArray> for &MatrixArray {
    type Output = MatrixArray;
    fn sub(self, other: &MatrixArray) -> MatrixArray {
        self.zip_with(other, |lhs, rhs| lhs - rhs)
    }
}

impl Mul<&MatrixArray> for &MatrixArray {
    type Output = MatrixArray;
    fn mul(self, other: &MatrixArray) -> MatrixArray {
        self.zip_with(other, |lhs, rhs| lhs * rhs)
    }
}

impl Div<&MatrixArray> for &MatrixArray {
    type Output = MatrixArray;
    fn div(self, other: &MatrixArray) -> MatrixArray {
        self.zip_with(other, |lhs, rhs| lhs / rhs)
    }
}

impl Add<f64> for &MatrixArray {
    type Output = MatrixArray;
    fn add(self, scalar: f64) -> MatrixArray {
        self.map(|value| value + scalar)
    }
}

impl Sub<f64> for &MatrixArray {
    type Output = MatrixArray;
    fn sub(self, scalar: f64) -> MatrixArray {
        self.map(|value| value - scalar)
    }
}

impl Mul<f64> for &MatrixArray {
    type Output = MatrixArray;
    fn mul(self, scalar: f64) -> MatrixArray {
        self.map(|value| value * scalar)
    }
}

impl Div<f64> for &MatrixArray {
    type Output = MatrixArray;
    fn div(self, scalar: f64) -> MatrixArray {
        self.map(|value| value / scalar)
    }
}

impl AddAssign<&MatrixArray> for MatrixArray {
    fn add_assign(&mut self, other: &MatrixArray) {
        self.zip_assign(other, |slot, value| *slot += value);
    }
}

impl SubAssign<&MatrixArray> for MatrixArray {
    fn sub_assign(&mut self, other: &MatrixArray) {
        self.zip_assign(other, |slot, value| *slot -= value);
    }
}

impl MulAssign<&MatrixArray> for MatrixArray {
    fn mul_assign(&mut self, other: &MatrixArray) {
        self.zip_assign(other, |slot, value| *slot *= value);
    }
}

impl DivAssign<&MatrixArray> for MatrixArray {
    fn div_assign(&mut self, other: &MatrixArray) {
        self.zip_assign(other, |slot, value| *slot /= value);
    }
}

impl AddAssign<f64> for MatrixArray {
    fn add_assign(&mut self, scalar: f64) {
        for slot in &mut self.data {
            *slot += scalar;
        }
    }
}

impl SubAssign<f64> for MatrixArray {
    fn sub_assign(&mut self, scalar: f64) {
        for slot in &mut self.data {
            *slot -= scalar;
        }
    }
}

impl MulAssign<f64> for MatrixArray {
    fn mul_assign(&mut self, scalar: f64) {
        for slot in &mut self.data {
            *slot *= scalar;
        }
    }
}

impl DivAssign<f64> for MatrixArray {
    fn div_assign(&mut self, scalar: f64) {
        for slot in &mut self.data {
            *slot /= scalar;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MatrixArray, MatrixArrayError};
    use crate::core::space::Space;
    use crate::numerics::linalg::LuError;

    #[test]
    fn symmetric_write_sets_both_triangles_and_nothing_else() {
        let mut marray = MatrixArray::zeros(4, 3, Space::Real);
        let values = [1.0, 2.0, 3.0, 4.0];
        marray.set_curve("A", "B", &values);

        assert_eq!(marray.curve("A", "B"), values.to_vec());
        assert_eq!(marray.curve("B", "A"), values.to_vec());
        assert_eq!(marray.curve("C", "C"), vec![0.0; 4]);
        assert_eq!(marray.curve("A", "A"), vec![0.0; 4]);
    }

    #[test]
    fn default_types_are_successive_letters() {
        let marray = MatrixArray::zeros(1, 3, Space::Real);
        assert_eq!(marray.types(), ["A", "B", "C"]);
    }

    #[test]
    #[should_panic(expected = "non-matching spaces")]
    fn mismatched_spaces_cannot_be_added() {
        let real = MatrixArray::zeros(8, 2, Space::Real);
        let fourier = MatrixArray::zeros(8, 2, Space::Fourier);
        let _ = &real + &fourier;
    }

    #[test]
    #[should_panic(expected = "non-matching spaces")]
    fn mismatched_spaces_cannot_be_dotted() {
        let real = MatrixArray::zeros(8, 2, Space::Real);
        let fourier = MatrixArray::zeros(8, 2, Space::Fourier);
        let _ = real.dot(&fourier);
    }

    #[test]
    fn non_spatial_operand_is_always_compatible() {
        let mut fourier = MatrixArray::zeros(8, 2, Space::Fourier);
        fourier += 1.0;
        let mut scale = MatrixArray::zeros(1, 2, Space::NonSpatial);
        scale.set_curve("A", "A", &[2.0]);
        scale.set_curve("A", "B", &[4.0]);
        scale.set_curve("B", "B", &[8.0]);

        let scaled = &fourier * &scale;
        assert_eq!(scaled.space(), Space::Fourier);
        assert_eq!(scaled.curve("A", "A"), vec![2.0; 8]);
        assert_eq!(scaled.curve("A", "B"), vec![4.0; 8]);
        assert_eq!(scaled.curve("B", "B"), vec![8.0; 8]);
    }

    #[test]
    fn scalar_operations_apply_elementwise() {
        let mut marray = MatrixArray::zeros(4, 1, Space::Real);
        marray.set_curve("A", "A", &[1.0, 2.0, 3.0, 4.0]);

        let shifted = &marray + 1.0;
        assert_eq!(shifted.curve("A", "A"), vec![2.0, 3.0, 4.0, 5.0]);

        let mut halved = marray.clone();
        halved /= 2.0;
        assert_eq!(halved.curve("A", "A"), vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn batched_invert_matches_per_point_inverse() {
        let mut marray = MatrixArray::zeros(3, 2, Space::Fourier);
        // per-point symmetric matrices [[a, b], [b, a + 1]]
        marray.set_curve("A", "A", &[2.0, 3.0, 5.0]);
        marray.set_curve("A", "B", &[1.0, -1.0, 0.5]);
        marray.set_curve("B", "B", &[3.0, 4.0, 6.0]);

        let inverted = marray.invert().expect("invertible stack");
        assert_eq!(inverted.space(), Space::Fourier);

        for point in 0..3 {
            let a = marray.value_at(point, 0, 0);
            let b = marray.value_at(point, 0, 1);
            let d = marray.value_at(point, 1, 1);
            let det = a * d - b * b;

            assert!((inverted.value_at(point, 0, 0) - d / det).abs() < 1.0e-12);
            assert!((inverted.value_at(point, 0, 1) + b / det).abs() < 1.0e-12);
            assert!((inverted.value_at(point, 1, 1) - a / det).abs() < 1.0e-12);
        }
    }

    #[test]
    fn singular_point_reports_its_grid_index() {
        let mut marray = MatrixArray::zeros(2, 2, Space::Fourier);
        marray.set_curve("A", "A", &[1.0, 1.0]);
        marray.set_curve("A", "B", &[0.0, 1.0]);
        marray.set_curve("B", "B", &[1.0, 1.0]);

        let error = marray.invert().expect_err("second point is singular");
        assert_eq!(
            error,
            MatrixArrayError::Invert {
                grid_point: 1,
                source: LuError::SingularMatrix { pivot_index: 1 },
            }
        );
    }

    #[test]
    fn dot_with_identity_is_a_no_op() {
        let mut marray = MatrixArray::zeros(5, 2, Space::Fourier);
        marray.set_curve("A", "A", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        marray.set_curve("A", "B", &[0.5, 0.4, 0.3, 0.2, 0.1]);
        marray.set_curve("B", "B", &[5.0, 4.0, 3.0, 2.0, 1.0]);
        let identity = MatrixArray::identity(5, 2, Space::Fourier);

        let product = marray.dot(&identity);
        assert_eq!(product, marray);
    }

    #[test]
    fn dot_contracts_per_point_matrices() {
        let mut lhs = MatrixArray::zeros(1, 2, Space::Fourier);
        lhs.set_curve("A", "A", &[1.0]);
        lhs.set_curve("A", "B", &[2.0]);
        lhs.set_curve("B", "B", &[3.0]);

        let mut rhs = MatrixArray::zeros(1, 2, Space::Fourier);
        rhs.set_curve("A", "A", &[4.0]);
        rhs.set_curve("A", "B", &[5.0]);
        rhs.set_curve("B", "B", &[6.0]);

        // [[1,2],[2,3]] * [[4,5],[5,6]] = [[14,17],[23,28]]
        let product = lhs.dot(&rhs);
        assert_eq!(product.value_at(0, 0, 0), 14.0);
        assert_eq!(product.value_at(0, 0, 1), 17.0);
        assert_eq!(product.value_at(0, 1, 0), 23.0);
        assert_eq!(product.value_at(0, 1, 1), 28.0);
    }

    #[test]
    fn matrix_convolve_truncates_full_convolution() {
        let mut lhs = MatrixArray::zeros(3, 1, Space::Real);
        lhs.set_curve("A", "A", &[1.0, 2.0, 3.0]);
        let mut rhs = MatrixArray::zeros(3, 1, Space::Real);
        rhs.set_curve("A", "A", &[4.0, 5.0, 6.0]);

        let convolved = lhs.matrix_convolve(&rhs, 0.5);
        assert_eq!(convolved.curve("A", "A"), vec![2.0, 6.5, 14.0]);
    }

    #[test]
    #[should_panic(expected = "requested type")]
    fn unknown_type_labels_are_rejected() {
        let marray = MatrixArray::zeros(2, 2, Space::Real);
        let _ = marray.curve("A", "Z");
    }
}
