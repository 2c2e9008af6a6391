use crate::closure::{AtomicClosure, ClosureError};
use crate::core::domain::{Domain, DomainError};
use crate::core::matrix_array::{MatrixArray, MatrixArrayError};
use crate::core::space::Space;
use crate::core::system::{System, SystemError};
use crate::core::table::TableError;
use crate::solver::{self, SolveReport, SolverMethod, SolverOptions};

#[derive(Debug, thiserror::Error)]
pub enum PrismError {
    #[error(transparent)]
    System(#[from] SystemError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Closure(#[from] ClosureError),
    #[error(transparent)]
    MatrixArray(#[from] MatrixArrayError),
    #[error("trial vector length mismatch: expected {expected}, got {actual}")]
    TrialLength { expected: usize, actual: usize },
    #[error("omega curve for pair {pair} has length {actual}, expected {expected}")]
    OmegaLength {
        pair: String,
        expected: usize,
        actual: usize,
    },
}

/// Threshold below `h(r) = -1` past which a converged pair correlation is
/// reported as unphysical.
const PAIR_CORRELATION_TOLERANCE: f64 = 1.0e-5;

/// A fully specified PRISM problem and, after a successful [`Prism::solve`],
/// its solution.
///
/// Construction copies every input out of the [`System`], evaluates the pair
/// potentials onto the closures (reduced by `kT`), evaluates and
/// density-scales the intra-molecular correlation functions, and
/// pre-allocates the whole working set. The residual then overwrites that
/// working set in full on every call; nothing carries over between calls.
#[derive(Debug)]
pub struct Prism {
    domain: Domain,
    types: Vec<String>,
    rank: usize,
    kt: f64,
    densities: Vec<f64>,
    diameters: Vec<f64>,
    density_total: f64,
    pair_density: MatrixArray,
    site_density: MatrixArray,
    closures: Vec<(usize, usize, AtomicClosure)>,
    omega: MatrixArray,
    direct_corr: MatrixArray,
    total_corr: MatrixArray,
    gamma_in: MatrixArray,
    gamma_out: MatrixArray,
    oc: MatrixArray,
    ioc: MatrixArray,
    identity: MatrixArray,
    scratch: MatrixArray,
}

impl Prism {
    pub fn new(system: &System) -> Result<Self, PrismError> {
        system.check()?;

        let domain = system
            .domain()
            .expect("check guarantees a domain")
            .clone();
        let rank = system.rank();
        let length = domain.length();
        let types = system.types().to_vec();

        // evaluate each pair potential onto its closure, reduced by the
        // thermal energy, and hand over the pair contact distance
        let mut closures = Vec::with_capacity(rank * (rank + 1) / 2);
        for (site1, site2, type1, type2, potential) in system.potential.iter_pairs() {
            let potential = potential.expect("check guarantees potentials");
            let mut closure = system
                .closure
                .get_by_indices(site1, site2)
                .expect("check guarantees closures")
                .clone();

            let reduced: Vec<f64> = potential
                .calculate(domain.r())
                .iter()
                .map(|&energy| energy / system.kt())
                .collect();
            closure.set_potential(reduced);

            if let Some(sigma) = system.diameter.sigma(type1, type2)? {
                closure.set_sigma(sigma);
            }
            closures.push((site1, site2, closure));
        }

        // omega is always consumed in Fourier space, scaled by site density
        let mut omega = MatrixArray::with_types(length, rank, Space::Fourier, types.clone());
        for (site1, site2, type1, type2, entry) in system.omega.iter_pairs() {
            let entry = entry.expect("check guarantees omegas");
            let curve = entry.calculate(domain.k());
            if curve.len() != length {
                return Err(PrismError::OmegaLength {
                    pair: format!("{type1}-{type2}"),
                    expected: length,
                    actual: curve.len(),
                });
            }
            omega.set_curve_by_index(site1, site2, &curve);
        }
        omega *= system.density.site();

        let densities: Vec<f64> = (0..rank)
            .map(|index| {
                system
                    .density
                    .get_by_index(index)
                    .expect("check guarantees densities")
            })
            .collect();
        let diameters: Vec<f64> = (0..rank)
            .map(|index| {
                system
                    .diameter
                    .get_by_index(index)
                    .expect("check guarantees diameters")
            })
            .collect();

        let mut identity = MatrixArray::with_types(length, rank, Space::Fourier, types.clone());
        let ones = vec![1.0; length];
        for site in 0..rank {
            identity.set_curve_by_index(site, site, &ones);
        }

        Ok(Self {
            pair_density: system.density.pair().clone(),
            site_density: system.density.site().clone(),
            density_total: system.density.total(),
            densities,
            diameters,
            kt: system.kt(),
            closures,
            omega,
            direct_corr: MatrixArray::with_types(length, rank, Space::Real, types.clone()),
            total_corr: MatrixArray::with_types(length, rank, Space::Fourier, types.clone()),
            gamma_in: MatrixArray::with_types(length, rank, Space::Real, types.clone()),
            gamma_out: MatrixArray::with_types(length, rank, Space::Real, types.clone()),
            oc: MatrixArray::with_types(length, rank, Space::Fourier, types.clone()),
            ioc: MatrixArray::with_types(length, rank, Space::Fourier, types.clone()),
            identity,
            scratch: MatrixArray::with_types(length, rank, Space::Fourier, types.clone()),
            types,
            rank,
            domain,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn kt(&self) -> f64 {
        self.kt
    }

    pub fn density_by_index(&self, index: usize) -> f64 {
        self.densities[index]
    }

    pub fn diameter_by_index(&self, index: usize) -> f64 {
        self.diameters[index]
    }

    pub fn total_density(&self) -> f64 {
        self.density_total
    }

    pub fn pair_density(&self) -> &MatrixArray {
        &self.pair_density
    }

    pub fn site_density(&self) -> &MatrixArray {
        &self.site_density
    }

    /// Density-scaled intra-molecular correlation container (Fourier space).
    pub fn omega(&self) -> &MatrixArray {
        &self.omega
    }

    pub fn total_correlation(&self) -> &MatrixArray {
        &self.total_corr
    }

    pub fn direct_correlation(&self) -> &MatrixArray {
        &self.direct_corr
    }

    pub fn ensure_total_correlation_real(&mut self) -> Result<(), DomainError> {
        let Self {
            domain, total_corr, ..
        } = self;
        if total_corr.space() == Space::Fourier {
            domain.matrix_array_to_real(total_corr)?;
        }
        Ok(())
    }

    pub fn ensure_total_correlation_fourier(&mut self) -> Result<(), DomainError> {
        let Self {
            domain, total_corr, ..
        } = self;
        if total_corr.space() == Space::Real {
            domain.matrix_array_to_fourier(total_corr)?;
        }
        Ok(())
    }

    pub fn ensure_direct_correlation_fourier(&mut self) -> Result<(), DomainError> {
        let Self {
            domain, direct_corr, ..
        } = self;
        if direct_corr.space() == Space::Real {
            domain.matrix_array_to_fourier(direct_corr)?;
        }
        Ok(())
    }

    pub fn ensure_direct_correlation_real(&mut self) -> Result<(), DomainError> {
        let Self {
            domain, direct_corr, ..
        } = self;
        if direct_corr.space() == Space::Fourier {
            domain.matrix_array_to_real(direct_corr)?;
        }
        Ok(())
    }

    fn trial_size(&self) -> usize {
        self.rank * self.rank * self.domain.length()
    }

    /// The residual ("cost") function the root-finder drives to zero.
    ///
    /// The flattened trial vector represents `r * gamma_in(r)`; the change
    /// of variables by `r` keeps the closure relation finite for divergent
    /// potentials, and the output is scaled back by `r` so the residual is
    /// well conditioned:
    ///
    ///   gamma_in(r) = x / r
    ///   C(r)        = closure(gamma_in)            (per pair)
    ///   H(k)        = (I - W C)^-1 W C W / rho_pair
    ///   gamma_out   = H - C, transformed to r
    ///   y           = r * (gamma_out - gamma_in)
    pub fn cost(&mut self, x: &[f64], y: &mut [f64]) -> Result<(), PrismError> {
        let expected = self.trial_size();
        if x.len() != expected {
            return Err(PrismError::TrialLength {
                expected,
                actual: x.len(),
            });
        }
        if y.len() != expected {
            return Err(PrismError::TrialLength {
                expected,
                actual: y.len(),
            });
        }

        let Self {
            domain,
            closures,
            omega,
            pair_density,
            direct_corr,
            total_corr,
            gamma_in,
            gamma_out,
            oc,
            ioc,
            identity,
            scratch,
            ..
        } = self;

        let length = domain.length();
        let rank = direct_corr.rank();
        let per_point = rank * rank;
        let r = domain.r();

        gamma_in.set_space(Space::Real);
        {
            let data = gamma_in.data_mut();
            for point in 0..length {
                let base = point * per_point;
                for offset in 0..per_point {
                    data[base + offset] = x[base + offset] / r[point];
                }
            }
        }

        // the direct correlation is rebuilt in real space every call; the
        // previous call left the container Fourier tagged
        direct_corr.set_space(Space::Real);
        for (site1, site2, closure) in closures.iter() {
            let gamma = gamma_in.curve_by_index(*site1, *site2);
            let curve = closure.calculate(r, &gamma)?;
            direct_corr.set_curve_by_index(*site1, *site2, &curve);
        }

        domain.matrix_array_to_fourier(direct_corr)?;

        omega.dot_into(direct_corr, oc);
        identity.sub_into(oc, ioc);
        ioc.invert_in_place()?;
        ioc.dot_into(oc, scratch);
        scratch.dot_into(omega, total_corr);
        *total_corr /= &*pair_density;

        total_corr.sub_into(direct_corr, gamma_out);
        domain.matrix_array_to_real(gamma_out)?;

        let out_data = gamma_out.data();
        let in_data = gamma_in.data();
        for point in 0..length {
            let base = point * per_point;
            for offset in 0..per_point {
                y[base + offset] = r[point] * (out_data[base + offset] - in_data[base + offset]);
            }
        }

        Ok(())
    }

    /// Hand the residual to the chosen root-finder and sanity-check the
    /// converged solution. The root-finder's report is returned unmodified;
    /// callers must inspect its `success` flag. Unphysical pair correlations
    /// are warned about, never raised.
    pub fn solve(
        &mut self,
        guess: Option<&[f64]>,
        method: SolverMethod,
        options: &SolverOptions,
    ) -> Result<SolveReport, PrismError> {
        let size = self.trial_size();
        let initial = match guess {
            Some(values) => {
                if values.len() != size {
                    return Err(PrismError::TrialLength {
                        expected: size,
                        actual: values.len(),
                    });
                }
                values.to_vec()
            }
            None => vec![0.0; size],
        };

        tracing::info!(
            method = %method,
            rank = self.rank,
            length = self.domain.length(),
            "starting PRISM solve"
        );

        let report = solver::solve(method, |x, y| self.cost(x, y), initial, options)?;

        // leave every container consistent with the reported solution
        let mut final_residual = vec![0.0; size];
        self.cost(&report.solution, &mut final_residual)?;

        self.ensure_total_correlation_real()?;

        for site1 in 0..self.rank {
            for site2 in site1..self.rank {
                let curve = self.total_corr.curve_by_index(site1, site2);
                let minimum = curve.iter().copied().fold(f64::INFINITY, f64::min);
                if minimum < -(1.0 + PAIR_CORRELATION_TOLERANCE) {
                    tracing::warn!(
                        pair = %format!("{}-{}", self.types[site1], self.types[site2]),
                        minimum,
                        "pair correlations are negative for this pair"
                    );
                }
            }
        }

        if report.success {
            tracing::info!(
                iterations = report.iterations,
                residual = report.residual_norm,
                "PRISM solve converged"
            );
        } else {
            tracing::warn!(
                iterations = report.iterations,
                residual = report.residual_norm,
                message = report.message.as_str(),
                "PRISM solve did not converge"
            );
        }

        Ok(report)
    }
}
