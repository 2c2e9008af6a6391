use crate::core::matrix_array::MatrixArray;
use crate::core::space::Space;
use crate::numerics::SineTransformPlan;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("real or Fourier grid spacing must be specified")]
    SpacingUnset,
    #[error("cannot specify both real and Fourier grid spacings independently")]
    SpacingOverSpecified,
    #[error("grid spacing must be finite and > 0, got {value}")]
    InvalidSpacing { value: f64 },
    #[error("grid length must be at least 1")]
    EmptyGrid,
    #[error("matrix array is already in {space} space")]
    AlreadyInSpace { space: Space },
    #[error("matrix array length {actual} does not match grid length {expected}")]
    GridLengthMismatch { expected: usize, actual: usize },
}

/// Discretization of real and Fourier space and the sine-transform pair that
/// moves radial curves between them.
///
/// The continuous radially symmetric 3-D Fourier transform reduces to
/// `k*f_hat(k) = 4*pi*dr * sum_i r*f(r) * sin(...)` under the discretization
/// `r = (i+1)*dr`, `k = (j+1)*dk`, `dk = pi/(dr*length)`, which is exactly a
/// type-II discrete sine transform with coefficients `2*pi*r*dr`; the inverse
/// is the type-III transform with coefficients `k*dk/(4*pi^2)`.
#[derive(Debug, Clone)]
pub struct Domain {
    length: usize,
    dr: f64,
    dk: f64,
    r: Vec<f64>,
    k: Vec<f64>,
    dst_ii_coeffs: Vec<f64>,
    dst_iii_coeffs: Vec<f64>,
    plan: SineTransformPlan,
}

impl Domain {
    pub fn new(length: usize, dr: Option<f64>, dk: Option<f64>) -> Result<Self, DomainError> {
        match (dr, dk) {
            (None, None) => Err(DomainError::SpacingUnset),
            (Some(_), Some(_)) => Err(DomainError::SpacingOverSpecified),
            (Some(dr), None) => Self::from_real_spacing(length, dr),
            (None, Some(dk)) => Self::from_fourier_spacing(length, dk),
        }
    }

    pub fn from_real_spacing(length: usize, dr: f64) -> Result<Self, DomainError> {
        validate_grid_shape(length, dr)?;
        let dk = PI / (dr * length as f64);
        Ok(Self::build(length, dr, dk))
    }

    pub fn from_fourier_spacing(length: usize, dk: f64) -> Result<Self, DomainError> {
        validate_grid_shape(length, dk)?;
        let dr = PI / (dk * length as f64);
        Ok(Self::build(length, dr, dk))
    }

    fn build(length: usize, dr: f64, dk: f64) -> Self {
        let r: Vec<f64> = (0..length).map(|index| (index + 1) as f64 * dr).collect();
        let k: Vec<f64> = (0..length).map(|index| (index + 1) as f64 * dk).collect();
        let dst_ii_coeffs = r.iter().map(|&r| 2.0 * PI * r * dr).collect();
        let dst_iii_coeffs = k.iter().map(|&k| k * dk / (4.0 * PI * PI)).collect();
        let plan = SineTransformPlan::new(length);

        Self {
            length,
            dr,
            dk,
            r,
            k,
            dst_ii_coeffs,
            dst_iii_coeffs,
            plan,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn dr(&self) -> f64 {
        self.dr
    }

    pub fn dk(&self) -> f64 {
        self.dk
    }

    pub fn r(&self) -> &[f64] {
        &self.r
    }

    pub fn k(&self) -> &[f64] {
        &self.k
    }

    /// Change the real-space spacing; every derived array is rebuilt.
    pub fn set_dr(&mut self, dr: f64) -> Result<(), DomainError> {
        *self = Self::from_real_spacing(self.length, dr)?;
        Ok(())
    }

    /// Change the Fourier-space spacing; every derived array is rebuilt.
    pub fn set_dk(&mut self, dk: f64) -> Result<(), DomainError> {
        *self = Self::from_fourier_spacing(self.length, dk)?;
        Ok(())
    }

    /// Change the grid length, preserving the real-space spacing.
    pub fn set_length(&mut self, length: usize) -> Result<(), DomainError> {
        *self = Self::from_real_spacing(length, self.dr)?;
        Ok(())
    }

    /// Forward transform of a single real-space curve into Fourier space.
    pub fn to_fourier(&self, curve: &[f64]) -> Vec<f64> {
        assert_eq!(curve.len(), self.length, "curve length must match grid");
        let weighted: Vec<f64> = curve
            .iter()
            .zip(&self.dst_ii_coeffs)
            .map(|(value, coeff)| value * coeff)
            .collect();
        let mut transformed = self.plan.dst_ii(&weighted);
        for (value, k) in transformed.iter_mut().zip(&self.k) {
            *value /= k;
        }
        transformed
    }

    /// Inverse transform of a single Fourier-space curve into real space.
    pub fn to_real(&self, curve: &[f64]) -> Vec<f64> {
        assert_eq!(curve.len(), self.length, "curve length must match grid");
        let weighted: Vec<f64> = curve
            .iter()
            .zip(&self.dst_iii_coeffs)
            .map(|(value, coeff)| value * coeff)
            .collect();
        let mut transformed = self.plan.dst_iii(&weighted);
        for (value, r) in transformed.iter_mut().zip(&self.r) {
            *value /= r;
        }
        transformed
    }

    /// Transform every independent curve of a matrix array into Fourier
    /// space in place and flip its space tag. Fails if the container is
    /// already Fourier tagged, which would silently double-transform.
    pub fn matrix_array_to_fourier(&self, marray: &mut MatrixArray) -> Result<(), DomainError> {
        self.transform_matrix_array(marray, Space::Fourier)
    }

    /// Inverse companion of [`Domain::matrix_array_to_fourier`].
    pub fn matrix_array_to_real(&self, marray: &mut MatrixArray) -> Result<(), DomainError> {
        self.transform_matrix_array(marray, Space::Real)
    }

    fn transform_matrix_array(
        &self,
        marray: &mut MatrixArray,
        target: Space,
    ) -> Result<(), DomainError> {
        if marray.space() == target {
            return Err(DomainError::AlreadyInSpace { space: target });
        }
        if marray.length() != self.length {
            return Err(DomainError::GridLengthMismatch {
                expected: self.length,
                actual: marray.length(),
            });
        }

        let rank = marray.rank();
        for row in 0..rank {
            for col in row..rank {
                let curve = marray.curve_by_index(row, col);
                let transformed = match target {
                    Space::Fourier => self.to_fourier(&curve),
                    Space::Real => self.to_real(&curve),
                    Space::NonSpatial => unreachable!("never a transform target"),
                };
                marray.set_curve_by_index(row, col, &transformed);
            }
        }
        marray.set_space(target);
        Ok(())
    }
}

fn validate_grid_shape(length: usize, spacing: f64) -> Result<(), DomainError> {
    if length == 0 {
        return Err(DomainError::EmptyGrid);
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(DomainError::InvalidSpacing { value: spacing });
    }
    Ok(())
}
