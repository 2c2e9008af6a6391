use super::{SolveReport, SolverOptions};
use crate::numerics::{dot_product, euclidean_norm, rms_norm};

const FORCING_ETA: f64 = 1.0e-3;
const ARMIJO_SLOPE: f64 = 1.0e-4;
const STAGNATION_LIMIT: usize = 8;

/// Jacobian-free Newton-Krylov: each outer step solves `J d = -F` with
/// restarted GMRES, approximating Jacobian-vector products by forward
/// finite differences of the residual, then backtracks along `d` until the
/// residual norm decreases.
pub(super) fn solve<E>(
    mut residual: impl FnMut(&[f64], &mut [f64]) -> Result<(), E>,
    mut x: Vec<f64>,
    options: &SolverOptions,
) -> Result<SolveReport, E> {
    let size = x.len();
    let mut f = vec![0.0; size];
    let mut trial_f = vec![0.0; size];

    residual(&x, &mut f)?;
    let mut norm = rms_norm(&f);
    let mut stagnation = 0_usize;

    for iteration in 1..=options.max_iterations {
        if norm <= options.tolerance {
            return Ok(SolveReport::converged(x, norm, iteration, "newton-krylov"));
        }
        if !norm.is_finite() {
            return Ok(SolveReport::failed(
                x,
                norm,
                iteration,
                "newton-krylov residual diverged to a non-finite value",
            ));
        }

        let direction = gmres(&mut residual, &x, &f, options)?;

        let mut step = 1.0;
        let mut accepted = false;
        for _ in 0..options.line_search_steps.max(1) {
            let trial: Vec<f64> = x
                .iter()
                .zip(&direction)
                .map(|(&value, &delta)| value + step * delta)
                .collect();
            residual(&trial, &mut trial_f)?;
            let trial_norm = rms_norm(&trial_f);

            if trial_norm.is_finite() && trial_norm < (1.0 - ARMIJO_SLOPE * step) * norm {
                x = trial;
                f.copy_from_slice(&trial_f);
                norm = trial_norm;
                accepted = true;
                break;
            }
            step *= 0.5;
        }

        tracing::trace!(
            iteration,
            residual = norm,
            accepted,
            "newton-krylov iteration"
        );

        if accepted {
            stagnation = 0;
            continue;
        }

        // Newton direction gave no descent; fall back to a damped
        // fixed-point step before giving up
        for (slot, &value) in x.iter_mut().zip(&f) {
            *slot += options.picard_damping * value;
        }
        residual(&x, &mut f)?;
        let fallback_norm = rms_norm(&f);
        if fallback_norm >= norm {
            stagnation += 1;
            if stagnation >= STAGNATION_LIMIT {
                return Ok(SolveReport::failed(
                    x,
                    fallback_norm,
                    iteration,
                    "newton-krylov stalled without residual decrease",
                ));
            }
        } else {
            stagnation = 0;
        }
        norm = fallback_norm;
    }

    Ok(SolveReport::failed(
        x,
        norm,
        options.max_iterations,
        format!(
            "newton-krylov reached the iteration limit ({}) at residual {norm:.3e}",
            options.max_iterations
        ),
    ))
}

/// Restarted-free single-cycle GMRES on `J d = -f` with Givens-rotation
/// least squares. The Krylov basis is built with modified Gram-Schmidt;
/// Jacobian action is the forward difference
/// `J v ~ (F(x + eps v) - F(x)) / eps` with unit-norm `v`.
fn gmres<E>(
    residual: &mut impl FnMut(&[f64], &mut [f64]) -> Result<(), E>,
    x: &[f64],
    f: &[f64],
    options: &SolverOptions,
) -> Result<Vec<f64>, E> {
    let size = x.len();
    let subspace = options.krylov_subspace_size.clamp(1, size);
    let rhs_norm = euclidean_norm(f);
    if rhs_norm == 0.0 {
        return Ok(vec![0.0; size]);
    }

    let epsilon = f64::EPSILON.sqrt() * (1.0 + euclidean_norm(x));

    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(subspace + 1);
    basis.push(f.iter().map(|&value| -value / rhs_norm).collect());

    let mut hessenberg: Vec<Vec<f64>> = Vec::with_capacity(subspace);
    let mut cosines: Vec<f64> = Vec::with_capacity(subspace);
    let mut sines: Vec<f64> = Vec::with_capacity(subspace);
    let mut g = vec![0.0; subspace + 1];
    g[0] = rhs_norm;

    let mut work = vec![0.0; size];
    let mut columns_used = 0;

    for column in 0..subspace {
        // Jacobian action on the newest basis vector
        let probe: Vec<f64> = x
            .iter()
            .zip(&basis[column])
            .map(|(&value, &direction)| value + epsilon * direction)
            .collect();
        residual(&probe, &mut work)?;
        let mut candidate: Vec<f64> = work
            .iter()
            .zip(f)
            .map(|(&probed, &base)| (probed - base) / epsilon)
            .collect();

        let mut column_entries = vec![0.0; column + 2];
        for (row, vector) in basis.iter().enumerate() {
            let projection = dot_product(&candidate, vector);
            column_entries[row] = projection;
            for (slot, &component) in candidate.iter_mut().zip(vector) {
                *slot -= projection * component;
            }
        }
        let remainder = euclidean_norm(&candidate);
        column_entries[column + 1] = remainder;

        // previously computed rotations keep the system triangular
        for row in 0..column {
            let upper = cosines[row] * column_entries[row] + sines[row] * column_entries[row + 1];
            let lower = -sines[row] * column_entries[row] + cosines[row] * column_entries[row + 1];
            column_entries[row] = upper;
            column_entries[row + 1] = lower;
        }

        let pivot = (column_entries[column].powi(2) + column_entries[column + 1].powi(2)).sqrt();
        let (cosine, sine) = if pivot == 0.0 {
            (1.0, 0.0)
        } else {
            (
                column_entries[column] / pivot,
                column_entries[column + 1] / pivot,
            )
        };
        column_entries[column] = pivot;
        column_entries[column + 1] = 0.0;
        cosines.push(cosine);
        sines.push(sine);

        g[column + 1] = -sine * g[column];
        g[column] *= cosine;

        hessenberg.push(column_entries);
        columns_used = column + 1;

        let estimate = g[column + 1].abs();
        if estimate <= FORCING_ETA * rhs_norm || remainder <= f64::EPSILON * rhs_norm {
            break;
        }

        basis.push(candidate.iter().map(|&value| value / remainder).collect());
    }

    // back substitution on the triangularized Hessenberg system
    let mut coefficients = vec![0.0; columns_used];
    for row in (0..columns_used).rev() {
        let mut value = g[row];
        for col in (row + 1)..columns_used {
            value -= hessenberg[col][row] * coefficients[col];
        }
        coefficients[row] = value / hessenberg[row][row];
    }

    let mut direction = vec![0.0; size];
    for (column, &coefficient) in coefficients.iter().enumerate() {
        for (slot, &component) in direction.iter_mut().zip(&basis[column]) {
            *slot += coefficient * component;
        }
    }
    Ok(direction)
}
