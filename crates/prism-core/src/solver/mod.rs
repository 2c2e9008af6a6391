mod mdiis;
mod newton_krylov;
mod picard;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which nonlinear root-finding algorithm drives the residual to zero. The
/// solver core is agnostic to the choice; every method implements the same
/// protocol of repeated residual evaluation until convergence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SolverMethod {
    NewtonKrylov,
    Mdiis,
    Picard,
}

impl SolverMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewtonKrylov => "newton-krylov",
            Self::Mdiis => "mdiis",
            Self::Picard => "picard",
        }
    }
}

impl Display for SolverMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown solver method '{0}'")]
pub struct UnknownMethodError(String);

impl FromStr for SolverMethod {
    type Err = UnknownMethodError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "newton-krylov" | "krylov" => Ok(Self::NewtonKrylov),
            "mdiis" => Ok(Self::Mdiis),
            "picard" => Ok(Self::Picard),
            other => Err(UnknownMethodError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Outer iteration limit; every method stops early on convergence.
    pub max_iterations: usize,
    /// Convergence threshold on the RMS of the residual vector.
    pub tolerance: f64,
    /// Mixing fraction for Picard steps (also the fallback step of the
    /// other methods).
    pub picard_damping: f64,
    /// Number of residual/solution pairs MDIIS extrapolates over.
    pub mdiis_depth: usize,
    /// Mixing fraction applied to the extrapolated MDIIS residual.
    pub mdiis_damping: f64,
    /// GMRES subspace dimension per Newton step.
    pub krylov_subspace_size: usize,
    /// Backtracking halvings attempted per Newton step.
    pub line_search_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1.0e-7,
            picard_damping: 0.25,
            mdiis_depth: 5,
            mdiis_damping: 0.3,
            krylov_subspace_size: 30,
            line_search_steps: 10,
        }
    }
}

/// Outcome of a nonlinear solve. `success` must be checked by the caller;
/// a failed solve is an ordinary value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub solution: Vec<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
    pub success: bool,
    pub message: String,
}

impl SolveReport {
    pub(crate) fn converged(
        solution: Vec<f64>,
        residual_norm: f64,
        iterations: usize,
        method: &str,
    ) -> Self {
        Self {
            solution,
            residual_norm,
            iterations,
            success: true,
            message: format!("{method} converged in {iterations} iterations"),
        }
    }

    pub(crate) fn failed(
        solution: Vec<f64>,
        residual_norm: f64,
        iterations: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            solution,
            residual_norm,
            iterations,
            success: false,
            message: message.into(),
        }
    }
}

/// Drive `residual` to zero starting from `guess`. The residual writes its
/// output into the provided buffer and may fail with the caller's error
/// type, which aborts the solve immediately.
pub fn solve<E>(
    method: SolverMethod,
    residual: impl FnMut(&[f64], &mut [f64]) -> Result<(), E>,
    guess: Vec<f64>,
    options: &SolverOptions,
) -> Result<SolveReport, E> {
    match method {
        SolverMethod::Picard => picard::solve(residual, guess, options),
        SolverMethod::Mdiis => mdiis::solve(residual, guess, options),
        SolverMethod::NewtonKrylov => newton_krylov::solve(residual, guess, options),
    }
}

#[cfg(test)]
mod tests {
    use super::{solve, SolveReport, SolverMethod, SolverOptions};
    use std::convert::Infallible;

    fn quadratic_residual(x: &[f64], y: &mut [f64]) -> Result<(), Infallible> {
        // root at (1, 2): y0 = 1 - x0^2, y1 = 2 - x0*x1
        y[0] = 1.0 - x[0] * x[0];
        y[1] = 2.0 - x[0] * x[1];
        Ok(())
    }

    fn check_converged(report: &SolveReport) {
        assert!(report.success, "{}", report.message);
        assert!((report.solution[0] - 1.0).abs() < 1.0e-5, "{report:?}");
        assert!((report.solution[1] - 2.0).abs() < 1.0e-5, "{report:?}");
    }

    #[test]
    fn every_method_finds_the_root_of_a_small_system() {
        let options = SolverOptions {
            tolerance: 1.0e-9,
            ..SolverOptions::default()
        };

        for method in [
            SolverMethod::Picard,
            SolverMethod::Mdiis,
            SolverMethod::NewtonKrylov,
        ] {
            let report = solve(method, quadratic_residual, vec![0.5, 0.5], &options)
                .expect("residual never fails");
            check_converged(&report);
        }
    }

    #[test]
    fn iteration_limit_reports_failure_not_error() {
        let options = SolverOptions {
            max_iterations: 2,
            tolerance: 1.0e-14,
            ..SolverOptions::default()
        };
        let report = solve(
            SolverMethod::Picard,
            quadratic_residual,
            vec![0.5, 0.5],
            &options,
        )
        .expect("residual never fails");
        assert!(!report.success);
        assert_eq!(report.iterations, 2);
    }

    #[test]
    fn method_names_round_trip() {
        for method in [
            SolverMethod::Picard,
            SolverMethod::Mdiis,
            SolverMethod::NewtonKrylov,
        ] {
            let parsed: SolverMethod = method.as_str().parse().expect("parse");
            assert_eq!(parsed, method);
        }
        assert_eq!(
            "krylov".parse::<SolverMethod>().expect("alias"),
            SolverMethod::NewtonKrylov
        );
        assert!("brent".parse::<SolverMethod>().is_err());
    }
}
